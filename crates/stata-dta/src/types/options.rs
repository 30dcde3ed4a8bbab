//! Format versions and writer options.

use chrono::NaiveDateTime;

use crate::endian::ByteOrder;

/// Dataset label written when neither the options nor the dataset carry one.
pub const DEFAULT_DATA_LABEL: &str = "Written by stata-dta.";

/// DTA format version.
///
/// | Feature          | V5 | V6 |
/// |------------------|----|----|
/// | Release byte     | 0x69 | 0x6C |
/// | Dataset label    | 32 bytes | 81 bytes |
/// | Variable label   | 32 bytes | 81 bytes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DtaVersion {
    /// Version 5.
    V5,
    /// Version 6 (written by this crate).
    #[default]
    V6,
}

impl DtaVersion {
    /// Map a release byte to a version.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x69 => Some(Self::V5),
            0x6C => Some(Self::V6),
            _ => None,
        }
    }

    /// Release byte for this version.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::V5 => 0x69,
            Self::V6 => 0x6C,
        }
    }

    /// Width of the dataset and variable label fields, terminator included.
    #[must_use]
    pub const fn label_len(self) -> usize {
        match self {
            Self::V5 => 32,
            Self::V6 => 81,
        }
    }
}

impl std::fmt::Display for DtaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V5 => write!(f, "5"),
            Self::V6 => write!(f, "6"),
        }
    }
}

/// Options for writing DTA files.
#[derive(Debug, Clone)]
pub struct DtaWriterOptions {
    /// Dataset label (truncated to 80 bytes). Overrides the dataset's own label.
    pub data_label: Option<String>,
    /// Creation timestamp (default: blank).
    pub timestamp: Option<NaiveDateTime>,
    /// Output byte order (default: host order).
    pub byte_order: Option<ByteOrder>,
}

impl Default for DtaWriterOptions {
    fn default() -> Self {
        Self {
            data_label: None,
            timestamp: None,
            byte_order: None,
        }
    }
}

impl DtaWriterOptions {
    /// Create writer options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset label.
    #[must_use]
    pub fn with_data_label(mut self, label: impl Into<String>) -> Self {
        self.data_label = Some(label.into());
        self
    }

    /// Set the creation timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Write multi-byte fields in the given byte order.
    #[must_use]
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    /// Timestamp as stored in the header, empty when unset.
    #[must_use]
    pub fn format_timestamp(&self) -> String {
        self.timestamp
            .map(|ts| ts.format("%d %b %Y %H:%M").to_string())
            .unwrap_or_default()
    }
}
