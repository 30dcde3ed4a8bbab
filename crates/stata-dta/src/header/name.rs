//! Variable name mangling.
//!
//! Names are stored with `_` and shown to the host with `.`. The mapping only
//! round-trips for names that do not contain both characters: `a_b.c` is
//! written as `a_b_c` and read back as `a.b.c`.

/// Maximum significant bytes in a stored name.
pub const NAME_LEN: usize = 8;

/// Stored name to host name (`_` becomes `.`).
#[must_use]
pub fn mangle_name_in(stored: &str) -> String {
    stored.replace('_', ".")
}

/// Host name to stored name (`.` becomes `_`), before truncation.
#[must_use]
pub fn mangle_name_out(name: &str) -> String {
    name.replace('.', "_")
}
