//! Byte order detection and the immutable codec context.
//!
//! The host byte order is derived once from the in-memory layout of `1.0f64`.
//! Each file records its own byte order in the header; multi-byte primitives
//! are swapped whenever the two differ.

use std::ffi::{c_double, c_float, c_int};
use std::mem::size_of;

use crate::error::{DtaError, Result};

/// Byte order of multi-byte primitives, as recorded in the header flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first (flag 1).
    Big,
    /// Least significant byte first (flag 2).
    Little,
}

impl ByteOrder {
    /// Header flag for big-endian files.
    pub const BIG_FLAG: u8 = 1;
    /// Header flag for little-endian files.
    pub const LITTLE_FLAG: u8 = 2;

    /// Parse a header byte-order flag.
    #[must_use]
    pub const fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            Self::BIG_FLAG => Some(Self::Big),
            Self::LITTLE_FLAG => Some(Self::Little),
            _ => None,
        }
    }

    /// Header flag value for this order.
    #[must_use]
    pub const fn flag(self) -> u8 {
        match self {
            Self::Big => Self::BIG_FLAG,
            Self::Little => Self::LITTLE_FLAG,
        }
    }

    /// The other byte order.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Big => Self::Little,
            Self::Little => Self::Big,
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Big => write!(f, "big-endian"),
            Self::Little => write!(f, "little-endian"),
        }
    }
}

/// Process-wide facts about the host, computed once and passed to every codec.
///
/// The context is `Copy` and immutable, so it can be shared freely between
/// independent decode/encode operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecContext {
    host: ByteOrder,
}

impl CodecContext {
    /// Detect the host byte order and verify primitive sizes.
    ///
    /// # Errors
    ///
    /// Returns `PlatformUnsupported` if `int`/`float`/`double` are not 4/4/8
    /// bytes or the byte order of `1.0f64` matches neither layout.
    pub fn detect() -> Result<Self> {
        check_primitive_sizes(size_of::<c_int>(), size_of::<c_float>(), size_of::<c_double>())?;
        let host = order_from_one(1.0f64.to_ne_bytes())?;
        Ok(Self { host })
    }

    /// Build a context for an explicitly known host order.
    #[must_use]
    pub const fn with_host(host: ByteOrder) -> Self {
        Self { host }
    }

    /// Host byte order.
    #[must_use]
    pub const fn host_order(self) -> ByteOrder {
        self.host
    }

    /// Whether a file stored in `file_order` needs 4/8-byte swapping.
    #[must_use]
    pub fn needs_swap(self, file_order: ByteOrder) -> bool {
        self.host != file_order
    }
}

/// Swap settings for one open file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOrder {
    /// Byte order recorded in (or chosen for) the file.
    pub order: ByteOrder,
    /// Whether 4- and 8-byte primitives are swapped relative to the host.
    pub swap: bool,
}

impl FileOrder {
    /// Derive swap settings from the context and the file's byte order.
    #[must_use]
    pub fn new(ctx: CodecContext, order: ByteOrder) -> Self {
        Self {
            order,
            swap: ctx.needs_swap(order),
        }
    }
}

fn check_primitive_sizes(int: usize, float: usize, double: usize) -> Result<()> {
    if (int, float, double) != (4, 4, 8) {
        return Err(DtaError::platform(format!(
            "int/float/double are {int}/{float}/{double} bytes, expected 4/4/8"
        )));
    }
    Ok(())
}

/// Identify a byte order from the native bytes of `1.0f64`.
fn order_from_one(bytes: [u8; 8]) -> Result<ByteOrder> {
    if bytes == 1.0f64.to_be_bytes() {
        Ok(ByteOrder::Big)
    } else if bytes == 1.0f64.to_le_bytes() {
        Ok(ByteOrder::Little)
    } else {
        Err(DtaError::platform("couldn't determine endianness"))
    }
}
