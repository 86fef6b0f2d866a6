#![doc = r#"
A byte cursor for SMF data.

[`Reader`] walks a borrowed slice and reports every failure with the
position it happened at. Positions are absolute within the original input,
even when a reader is opened over a sub-slice (a track body, say) with
[`Reader::from_byte_slice_at`].
"#]

mod error;
pub use error::*;

use crate::vlq;

/// A forward-only cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    cursor: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    /// Read from the start of `data`.
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self::from_byte_slice_at(data, 0)
    }

    /// Read `data`, which sits at `base` in some larger input.
    pub const fn from_byte_slice_at(data: &'a [u8], base: usize) -> Self {
        Self {
            data,
            cursor: 0,
            base,
        }
    }

    /// Absolute position of the next byte
    pub const fn buffer_position(&self) -> usize {
        self.base + self.cursor
    }

    /// Bytes left to read
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// True once every byte has been consumed
    pub const fn is_at_end(&self) -> bool {
        self.cursor >= self.data.len()
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.data
            .get(self.cursor)
            .copied()
            .ok_or_else(|| ReaderError::oob(self.buffer_position()))
    }

    /// Consume one byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek_u8()?;
        self.cursor += 1;
        Ok(byte)
    }

    /// Consume `len` bytes.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        let end = self
            .cursor
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| ReaderError::oob(self.buffer_position()))?;
        let slice = &self.data[self.cursor..end];
        self.cursor = end;
        Ok(slice)
    }

    /// Consume exactly `N` bytes.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    /// Consume a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Consume a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Consume a variable-length quantity.
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let (value, consumed) = vlq::decode(self.data, self.cursor).map_err(|e| {
            let position = self.buffer_position();
            match e {
                crate::VlqError::Truncated => ReaderError::oob(position),
                e => ReaderError::invalid(position, e),
            }
        })?;
        self.cursor += consumed;
        Ok(value)
    }

    /// Consume a VLQ length followed by that many bytes.
    pub fn read_varlen_slice(&mut self) -> ReadResult<&'a [u8]> {
        let len = self.read_vlq()? as usize;
        self.read_slice(len)
    }
}

#[test]
fn positions_are_absolute() {
    let data = [0x81, 0x00, 0x02, 0xAA, 0xBB];
    let mut reader = Reader::from_byte_slice_at(&data, 100);
    assert_eq!(reader.read_vlq().unwrap(), 128);
    assert_eq!(reader.buffer_position(), 102);
    assert_eq!(reader.read_varlen_slice().unwrap(), &[0xAA, 0xBB]);
    assert!(reader.is_at_end());

    let err = reader.read_u8().unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 105);
}

#[test]
fn slice_past_end_is_out_of_bounds() {
    let data = [0x05, 0x01, 0x02];
    let mut reader = Reader::from_byte_slice(&data);
    let err = reader.read_varlen_slice().unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(reader.read_u16_be().unwrap(), 0x0102);
}
