//! Column definitions and typed column storage.

use std::fmt;

use super::value::{DtaValue, str_until_nul};

/// Storage type of a variable.
///
/// | Code          | Type        | Cell width |
/// |---------------|-------------|------------|
/// | `'b'` (0x62)  | `Byte`      | 1          |
/// | `'i'` (0x69)  | `Int16`     | 2          |
/// | `'l'` (0x6C)  | `Int32`     | 4          |
/// | `'f'` (0x66)  | `Float32`   | 4          |
/// | `'d'` (0x64)  | `Float64`   | 8          |
/// | `0x7F + n`    | `Str(n)`    | n          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtaType {
    Byte,
    Int16,
    Int32,
    Float32,
    Float64,
    /// Fixed-width string of the given byte width.
    Str(u8),
}

impl DtaType {
    /// Offset added to a string width to form its type code.
    pub const STRING_OFFSET: u8 = 0x7F;

    /// Widest string a single type byte can describe.
    pub const MAX_STR_WIDTH: u8 = u8::MAX - Self::STRING_OFFSET;

    /// Decode a type byte.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'b' => Some(Self::Byte),
            b'i' => Some(Self::Int16),
            b'l' => Some(Self::Int32),
            b'f' => Some(Self::Float32),
            b'd' => Some(Self::Float64),
            c if c >= Self::STRING_OFFSET => Some(Self::Str(c - Self::STRING_OFFSET)),
            _ => None,
        }
    }

    /// Encode as a type byte. Strings wider than [`Self::MAX_STR_WIDTH`] have no code.
    #[must_use]
    pub const fn code(self) -> Option<u8> {
        match self {
            Self::Byte => Some(b'b'),
            Self::Int16 => Some(b'i'),
            Self::Int32 => Some(b'l'),
            Self::Float32 => Some(b'f'),
            Self::Float64 => Some(b'd'),
            Self::Str(width) => Self::STRING_OFFSET.checked_add(width),
        }
    }

    /// Bytes occupied by one cell of this type.
    #[must_use]
    pub const fn cell_width(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Float64 => 8,
            Self::Str(width) => width as usize,
        }
    }

    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self, Self::Str(_))
    }
}

impl fmt::Display for DtaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => write!(f, "byte"),
            Self::Int16 => write!(f, "int"),
            Self::Int32 => write!(f, "long"),
            Self::Float32 => write!(f, "float"),
            Self::Float64 => write!(f, "double"),
            Self::Str(width) => write!(f, "str{width}"),
        }
    }
}

/// Cell storage for one column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Byte(Vec<Option<u8>>),
    Int16(Vec<Option<i16>>),
    Int32(Vec<Option<i32>>),
    Float32(Vec<Option<f32>>),
    Float64(Vec<Option<f64>>),
    /// Raw string cells. `width` is the declared on-disk width; cells read from
    /// a file are exactly `width` bytes long.
    Str { width: u8, values: Vec<Vec<u8>> },
}

impl ColumnData {
    /// Create empty storage for the given type.
    #[must_use]
    pub fn with_capacity(dtype: DtaType, capacity: usize) -> Self {
        match dtype {
            DtaType::Byte => Self::Byte(Vec::with_capacity(capacity)),
            DtaType::Int16 => Self::Int16(Vec::with_capacity(capacity)),
            DtaType::Int32 => Self::Int32(Vec::with_capacity(capacity)),
            DtaType::Float32 => Self::Float32(Vec::with_capacity(capacity)),
            DtaType::Float64 => Self::Float64(Vec::with_capacity(capacity)),
            DtaType::Str(width) => Self::Str {
                width,
                values: Vec::with_capacity(capacity),
            },
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Str { values, .. } => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared storage type.
    #[must_use]
    pub fn dtype(&self) -> DtaType {
        match self {
            Self::Byte(_) => DtaType::Byte,
            Self::Int16(_) => DtaType::Int16,
            Self::Int32(_) => DtaType::Int32,
            Self::Float32(_) => DtaType::Float32,
            Self::Float64(_) => DtaType::Float64,
            Self::Str { width, .. } => DtaType::Str(*width),
        }
    }

    /// Cell at `row`.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<DtaValue> {
        Some(match self {
            Self::Byte(v) => DtaValue::Byte(*v.get(row)?),
            Self::Int16(v) => DtaValue::Int16(*v.get(row)?),
            Self::Int32(v) => DtaValue::Int32(*v.get(row)?),
            Self::Float32(v) => DtaValue::Float32(*v.get(row)?),
            Self::Float64(v) => DtaValue::Float64(*v.get(row)?),
            Self::Str { values, .. } => DtaValue::Str(values.get(row)?.clone()),
        })
    }

    /// Append a cell. Returns the value back if its type does not match.
    pub fn push(&mut self, value: DtaValue) -> Result<(), DtaValue> {
        match (self, value) {
            (Self::Byte(v), DtaValue::Byte(x)) => v.push(x),
            (Self::Int16(v), DtaValue::Int16(x)) => v.push(x),
            (Self::Int32(v), DtaValue::Int32(x)) => v.push(x),
            (Self::Float32(v), DtaValue::Float32(x)) => v.push(x),
            (Self::Float64(v), DtaValue::Float64(x)) => v.push(x),
            (Self::Str { values, .. }, DtaValue::Str(x)) => values.push(x),
            (_, other) => return Err(other),
        }
        Ok(())
    }

    /// Length of the longest string cell, counted up to the first NUL.
    ///
    /// Returns `None` for numeric columns.
    #[must_use]
    pub fn max_str_len(&self) -> Option<usize> {
        match self {
            Self::Str { values, .. } => Some(
                values
                    .iter()
                    .map(|v| str_until_nul(v).len())
                    .max()
                    .unwrap_or(0),
            ),
            _ => None,
        }
    }
}

/// A variable: its name, ancillary attributes, and cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DtaColumn {
    /// Variable name (host form, `.` where the file stores `_`).
    pub name: String,
    /// Print format string as decoded (stored, not interpreted).
    pub format: Option<String>,
    /// Variable label as decoded.
    pub label: Option<String>,
    /// Cell storage.
    pub data: ColumnData,
}

impl DtaColumn {
    /// Create a column from existing storage.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            format: None,
            label: None,
            data,
        }
    }

    pub fn byte(name: impl Into<String>, values: Vec<Option<u8>>) -> Self {
        Self::new(name, ColumnData::Byte(values))
    }

    pub fn int16(name: impl Into<String>, values: Vec<Option<i16>>) -> Self {
        Self::new(name, ColumnData::Int16(values))
    }

    pub fn int32(name: impl Into<String>, values: Vec<Option<i32>>) -> Self {
        Self::new(name, ColumnData::Int32(values))
    }

    pub fn float32(name: impl Into<String>, values: Vec<Option<f32>>) -> Self {
        Self::new(name, ColumnData::Float32(values))
    }

    pub fn float64(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float64(values))
    }

    /// Create a string column; the declared width is the longest value.
    pub fn string<S: Into<Vec<u8>>>(name: impl Into<String>, values: Vec<S>) -> Self {
        let values: Vec<Vec<u8>> = values.into_iter().map(Into::into).collect();
        let longest = values.iter().map(Vec::len).max().unwrap_or(0);
        let width = u8::try_from(longest).unwrap_or(u8::MAX);
        Self::new(name, ColumnData::Str { width, values })
    }

    /// Set the variable label.
    ///
    /// Decoded files fill this in. The writer does not read it: the stored
    /// label is always the column name.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the print format string.
    ///
    /// Decoded files fill this in. The writer does not read it: the stored
    /// format is `%Ns` for strings and `%9.0g` otherwise.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Declared storage type.
    #[must_use]
    pub fn dtype(&self) -> DtaType {
        self.data.dtype()
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
