#![doc = r#"
Chunk framing

A MIDI file is a sequence of chunks, each a 4-character ASCII tag, a
big-endian 32-bit length and that many bytes of data:

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
[Unknown Chunk: "XFIH"]
...
[Track Chunk N: "MTrk"]
```

Only `MThd` and `MTrk` are defined. Anything else is an [`UnknownChunk`],
which readers skip by its declared length.
"#]

use crate::{
    file::{Header, Track},
    reader::{ReadResult, Reader},
};

/// One chunk of a file
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkEvent<'a> {
    /// A decoded `MThd` chunk
    Header(Header),
    /// An `MTrk` chunk, not yet parsed
    Track(RawTrackChunk<'a>),
    /// Any other tag
    Unknown(UnknownChunk<'a>),
}

/// The body of an `MTrk` chunk and where it sits in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTrackChunk<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> RawTrackChunk<'a> {
    /// The chunk tag
    pub const TAG: [u8; 4] = *b"MTrk";

    /// The event bytes
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Position of the body in the file
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Parse the events of this chunk. Errors carry file positions.
    pub fn parse(&self) -> ReadResult<Track> {
        Track::parse_events_at(self.data, self.offset)
    }
}

/// A chunk this codec does not interpret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownChunk<'a> {
    tag: [u8; 4],
    data: &'a [u8],
}

impl<'a> UnknownChunk<'a> {
    /// The four tag bytes
    pub const fn tag(&self) -> [u8; 4] {
        self.tag
    }

    /// The chunk body
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> Reader<'a> {
    /// Read the next chunk, or `None` at the end of input.
    ///
    /// A chunk whose declared length runs past the input is an out of bounds
    /// error.
    pub fn read_chunk(&mut self) -> ReadResult<Option<ChunkEvent<'a>>> {
        if self.is_at_end() {
            return Ok(None);
        }
        let tag: [u8; 4] = self.read_exact_size()?;
        let len = self.read_u32_be()? as usize;
        let offset = self.buffer_position();
        let data = self.read_slice(len)?;

        let chunk = match &tag {
            b"MThd" => ChunkEvent::Header(Header::parse_body(data, offset)?),
            b"MTrk" => ChunkEvent::Track(RawTrackChunk { data, offset }),
            _ => ChunkEvent::Unknown(UnknownChunk { tag, data }),
        };
        Ok(Some(chunk))
    }
}

#[test]
fn chunks_split_by_length() {
    use pretty_assertions::assert_eq;

    let mut bytes = Header::default().pack();
    bytes.extend_from_slice(b"XFIH");
    bytes.extend_from_slice(&[0, 0, 0, 2, 0xAB, 0xCD]);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00]);

    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(
        reader.read_chunk().unwrap(),
        Some(ChunkEvent::Header(Header::default()))
    );
    assert_eq!(
        reader.read_chunk().unwrap(),
        Some(ChunkEvent::Unknown(UnknownChunk {
            tag: *b"XFIH",
            data: &[0xAB, 0xCD]
        }))
    );
    let Some(ChunkEvent::Track(track)) = reader.read_chunk().unwrap() else {
        panic!("expected a track chunk");
    };
    assert_eq!(track.offset(), 32);
    assert_eq!(track.data(), &[0x00, 0xFF, 0x2F, 0x00]);
    assert_eq!(reader.read_chunk().unwrap(), None);
}

#[test]
fn chunk_length_past_end() {
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert!(reader.read_chunk().unwrap_err().is_out_of_bounds());
}
