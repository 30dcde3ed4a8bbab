//! Per-cell values.

use std::borrow::Cow;
use std::fmt;

/// A single cell, tagged with its storage type.
///
/// Numeric cells carry `None` for missing. String cells hold the raw bytes as
/// stored, including any zero padding.
#[derive(Debug, Clone, PartialEq)]
pub enum DtaValue {
    Byte(Option<u8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Str(Vec<u8>),
}

impl DtaValue {
    /// Create a string value.
    pub fn string(value: impl Into<Vec<u8>>) -> Self {
        Self::Str(value.into())
    }

    /// Check if this value is missing. String values are never missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Byte(v) => v.is_none(),
            Self::Int16(v) => v.is_none(),
            Self::Int32(v) => v.is_none(),
            Self::Float32(v) => v.is_none(),
            Self::Float64(v) => v.is_none(),
            Self::Str(_) => false,
        }
    }

    /// Numeric value widened to f64, if present.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Byte(v) => v.map(f64::from),
            Self::Int16(v) => v.map(f64::from),
            Self::Int32(v) => v.map(f64::from),
            Self::Float32(v) => v.map(f64::from),
            Self::Float64(v) => *v,
            Self::Str(_) => None,
        }
    }

    /// Raw string bytes, if this is a string value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// String content up to the first NUL, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<Cow<'_, str>> {
        self.as_bytes()
            .map(|bytes| String::from_utf8_lossy(str_until_nul(bytes)))
    }
}

impl fmt::Display for DtaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn num<T: fmt::Display>(f: &mut fmt::Formatter<'_>, v: Option<T>) -> fmt::Result {
            match v {
                Some(v) => write!(f, "{v}"),
                None => write!(f, "."),
            }
        }
        match self {
            Self::Byte(v) => num(f, *v),
            Self::Int16(v) => num(f, *v),
            Self::Int32(v) => num(f, *v),
            Self::Float32(v) => num(f, *v),
            Self::Float64(v) => num(f, *v),
            Self::Str(bytes) => f.write_str(&String::from_utf8_lossy(str_until_nul(bytes))),
        }
    }
}

/// Bytes before the first NUL terminator (all bytes if there is none).
#[must_use]
pub fn str_until_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}
