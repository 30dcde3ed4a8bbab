//! Fixed-width primitive fields with missing-value sentinels.
//!
//! This is the only layer that knows about sentinels: readers hand back
//! `Option<T>` (`None` = missing) and writers turn `None` back into the
//! sentinel bit pattern.
//!
//! | Type    | Width | Sentinel       |
//! |---------|-------|----------------|
//! | byte    | 1     | 127            |
//! | int16   | 2     | 32767          |
//! | int32   | 4     | 2147483647     |
//! | float32 | 4     | 2^127          |
//! | float64 | 8     | 2^1023         |
//!
//! 16-bit fields are assembled directly from the file byte order. 4- and
//! 8-byte fields are read in host order and swapped when the file order differs.

use std::io::{Read, Write};

use crate::endian::{ByteOrder, FileOrder};
use crate::error::{DtaError, Result};

/// Missing sentinel for byte cells.
pub const BYTE_MISSING: u8 = 127;

/// Missing sentinel for 16-bit integer cells.
pub const INT16_MISSING: i16 = i16::MAX;

/// Missing sentinel for 32-bit integer cells.
pub const INT32_MISSING: i32 = i32::MAX;

/// Missing sentinel for 32-bit float cells (2^127).
pub const FLOAT32_MISSING: f32 = f32::from_bits(0x7F00_0000);

/// Missing sentinel for 64-bit float cells (2^1023).
pub const FLOAT64_MISSING: f64 = f64::from_bits(0x7FE0_0000_0000_0000);

/// Reads primitives from a positioned byte stream.
pub struct PrimitiveReader<R: Read> {
    inner: R,
    order: FileOrder,
}

impl<R: Read> PrimitiveReader<R> {
    /// Create a reader with the given swap settings.
    pub fn new(inner: R, order: FileOrder) -> Self {
        Self { inner, order }
    }

    /// Replace the swap settings once the header flag is known.
    pub fn set_order(&mut self, order: FileOrder) {
        self.order = order;
    }

    /// Current swap settings.
    pub fn order(&self) -> FileOrder {
        self.order
    }

    fn fill<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| DtaError::from_read(e, what))?;
        Ok(buf)
    }

    /// Read one byte with no sentinel translation.
    pub fn read_u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.fill::<1>(what)?[0])
    }

    /// Read a byte cell.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let value = self.read_u8("byte cell")?;
        Ok((value != BYTE_MISSING).then_some(value))
    }

    /// Read an unsigned 16-bit count in file byte order.
    pub fn read_u16(&mut self, what: &str) -> Result<u16> {
        let bytes = self.fill::<2>(what)?;
        Ok(match self.order.order {
            ByteOrder::Big => u16::from_be_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
        })
    }

    /// Read a 16-bit integer cell.
    pub fn read_int16(&mut self) -> Result<Option<i16>> {
        let bytes = self.fill::<2>("int16 cell")?;
        let value = match self.order.order {
            ByteOrder::Big => i16::from_be_bytes(bytes),
            ByteOrder::Little => i16::from_le_bytes(bytes),
        };
        Ok((value != INT16_MISSING).then_some(value))
    }

    /// Read a 32-bit integer with no sentinel translation.
    pub fn read_i32(&mut self, what: &str) -> Result<i32> {
        let value = i32::from_ne_bytes(self.fill::<4>(what)?);
        Ok(if self.order.swap {
            value.swap_bytes()
        } else {
            value
        })
    }

    /// Read a 32-bit integer cell.
    pub fn read_int32(&mut self) -> Result<Option<i32>> {
        let value = self.read_i32("int32 cell")?;
        Ok((value != INT32_MISSING).then_some(value))
    }

    /// Read a 32-bit float cell.
    pub fn read_float32(&mut self) -> Result<Option<f32>> {
        let mut bits = u32::from_ne_bytes(self.fill::<4>("float32 cell")?);
        if self.order.swap {
            bits = bits.swap_bytes();
        }
        Ok((bits != FLOAT32_MISSING.to_bits()).then(|| f32::from_bits(bits)))
    }

    /// Read a 64-bit float cell.
    pub fn read_float64(&mut self) -> Result<Option<f64>> {
        let mut bits = u64::from_ne_bytes(self.fill::<8>("float64 cell")?);
        if self.order.swap {
            bits = bits.swap_bytes();
        }
        Ok((bits != FLOAT64_MISSING.to_bits()).then(|| f64::from_bits(bits)))
    }

    /// Read exactly `width` raw bytes.
    pub fn read_bytes(&mut self, width: usize, what: &str) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; width];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| DtaError::from_read(e, what))?;
        Ok(buf)
    }

    /// Read and discard `len` bytes.
    pub fn skip(&mut self, len: u64, what: &str) -> Result<()> {
        let copied = std::io::copy(&mut (&mut self.inner).take(len), &mut std::io::sink())?;
        if copied != len {
            return Err(DtaError::corrupt(format!(
                "unexpected end of file while reading {what}"
            )));
        }
        Ok(())
    }
}

/// Writes primitives to a byte stream.
pub struct PrimitiveWriter<W: Write> {
    inner: W,
    order: FileOrder,
}

impl<W: Write> PrimitiveWriter<W> {
    /// Create a writer with the given swap settings.
    pub fn new(inner: W, order: FileOrder) -> Self {
        Self { inner, order }
    }

    /// Current swap settings.
    pub fn order(&self) -> FileOrder {
        self.order
    }

    /// Write one raw byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    /// Write a byte cell.
    pub fn write_byte(&mut self, value: Option<u8>) -> Result<()> {
        self.write_u8(value.unwrap_or(BYTE_MISSING))
    }

    /// Write an unsigned 16-bit count in file byte order.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let bytes = match self.order.order {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Write a 16-bit integer cell.
    pub fn write_int16(&mut self, value: Option<i16>) -> Result<()> {
        let value = value.unwrap_or(INT16_MISSING);
        let bytes = match self.order.order {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Write a 32-bit integer with no sentinel translation.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let value = if self.order.swap {
            value.swap_bytes()
        } else {
            value
        };
        self.inner.write_all(&value.to_ne_bytes())?;
        Ok(())
    }

    /// Write a 32-bit integer cell.
    pub fn write_int32(&mut self, value: Option<i32>) -> Result<()> {
        self.write_i32(value.unwrap_or(INT32_MISSING))
    }

    /// Write a 32-bit float cell. Non-finite values are written as missing.
    pub fn write_float32(&mut self, value: Option<f32>) -> Result<()> {
        let value = value.filter(|v| v.is_finite()).unwrap_or(FLOAT32_MISSING);
        let mut bits = value.to_bits();
        if self.order.swap {
            bits = bits.swap_bytes();
        }
        self.inner.write_all(&bits.to_ne_bytes())?;
        Ok(())
    }

    /// Write a 64-bit float cell. Non-finite values are written as missing.
    pub fn write_float64(&mut self, value: Option<f64>) -> Result<()> {
        let value = value.filter(|v| v.is_finite()).unwrap_or(FLOAT64_MISSING);
        let mut bits = value.to_bits();
        if self.order.swap {
            bits = bits.swap_bytes();
        }
        self.inner.write_all(&bits.to_ne_bytes())?;
        Ok(())
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Write `len` zero bytes.
    pub fn write_zeros(&mut self, len: usize) -> Result<()> {
        std::io::copy(&mut std::io::repeat(0).take(len as u64), &mut self.inner)?;
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
