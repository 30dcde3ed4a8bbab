//! NUL-terminated fixed-width text fields.

use crate::types::str_until_nul;

/// Decode a fixed-width field up to its first NUL.
#[must_use]
pub fn read_text(field: &[u8]) -> String {
    String::from_utf8_lossy(str_until_nul(field)).into_owned()
}

/// Truncate a string to at most `max_len` bytes on a char boundary.
#[must_use]
pub fn truncate_str(value: &str, max_len: usize) -> &str {
    if value.len() <= max_len {
        return value;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Build a `width`-byte field: at most `width - 1` bytes of text, then zeros.
///
/// Returns the field and whether the text had to be truncated.
#[must_use]
pub fn fixed_text(value: &str, width: usize) -> (Vec<u8>, bool) {
    let text = truncate_str(value, width.saturating_sub(1));
    let mut field = vec![0u8; width];
    field[..text.len()].copy_from_slice(text.as_bytes());
    (field, text.len() < value.len())
}
