use crate::{
    HeaderError,
    file::{FormatType, Timing},
    reader::{ReadResult, Reader, inv_data},
};
use alloc::vec::Vec;

#[doc = r#"
The `MThd` chunk.

```text
4D 54 68 64   "MThd"
00 00 00 06   length
ff ff         format (0, 1 or 2)
nn nn         number of track chunks
dd dd         division
```

The division is either ticks per quarter note (leading bit clear) or a
negative SMPTE frame rate in the high byte and ticks per frame in the low
byte. See [`Timing`].
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: FormatType,
    track_count: u16,
    timing: Timing,
}

impl Header {
    /// The chunk tag
    pub const TAG: [u8; 4] = *b"MThd";

    /// Length of the chunk body this codec writes
    pub const LEN: u32 = 6;

    /// A header with the given fields
    pub const fn new(format: FormatType, track_count: u16, timing: Timing) -> Self {
        Self {
            format,
            track_count,
            timing,
        }
    }

    /// How tracks relate to each other
    pub const fn format(&self) -> FormatType {
        self.format
    }

    /// Change the format
    pub fn set_format(&mut self, format: FormatType) {
        self.format = format;
    }

    /// The declared number of track chunks
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    pub(crate) fn set_track_count(&mut self, track_count: u16) {
        self.track_count = track_count;
    }

    /// What a tick means
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Change the division
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    /// The complete chunk, tag and length included.
    pub fn pack(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(14);
        out.extend_from_slice(&Self::TAG);
        out.extend_from_slice(&Self::LEN.to_be_bytes());
        out.extend_from_slice(&u16::from(self.format).to_be_bytes());
        out.extend_from_slice(&self.track_count.to_be_bytes());
        out.extend_from_slice(&self.timing.to_bytes());
        out
    }

    /// Parse a header body (the bytes after tag and length).
    ///
    /// Bodies longer than six bytes are accepted; the excess is ignored.
    pub fn parse_body(body: &[u8], base: usize) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice_at(body, base);
        if body.len() < Self::LEN as usize {
            return Err(inv_data(&reader, HeaderError::Length(body.len() as u32)));
        }

        let raw_format = reader.read_u16_be()?;
        let format = FormatType::try_from(raw_format)
            .map_err(|e| inv_data(&reader, HeaderError::InvalidFormat(e.number)))?;
        let track_count = reader.read_u16_be()?;
        let timing = Timing::from_bytes(reader.read_exact_size()?)
            .map_err(|e| inv_data(&reader, e))?;

        #[cfg(feature = "tracing")]
        if !reader.is_at_end() {
            tracing::debug!(extra = reader.remaining(), "ignoring bytes past the header fields");
        }

        Ok(Self::new(format, track_count, timing))
    }
}

#[test]
fn header_bytes() {
    use pretty_assertions::assert_eq;

    let header = Header::new(FormatType::Simultaneous, 3, Timing::new_ticks_per_quarter_note(480));
    let bytes = header.pack();
    assert_eq!(
        bytes,
        [0x4D, 0x54, 0x68, 0x64, 0, 0, 0, 6, 0, 1, 0, 3, 0x01, 0xE0]
    );
    assert_eq!(Header::parse_body(&bytes[8..], 8).unwrap(), header);
}

#[test]
fn header_errors() {
    use crate::ParseError;

    let err = Header::parse_body(&[0, 1, 0, 1], 8).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Header(HeaderError::Length(4)))
    );

    let err = Header::parse_body(&[0, 3, 0, 1, 0, 96], 8).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Header(HeaderError::InvalidFormat(3)))
    );
}
