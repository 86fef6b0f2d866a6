use crate::reader::ReaderError;
use alloc::string::String;
use thiserror::Error;

/// A structural problem found while decoding bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Variable-length quantities
    #[error("VLQ: {0}")]
    Vlq(#[from] VlqError),
    /// Chunk framing
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// The `MThd` chunk
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// Events inside an `MTrk` chunk
    #[error("Track: {0}")]
    Track(#[from] TrackError),
    /// Meta events
    #[error("Meta event: {0}")]
    Meta(#[from] MetaError),
    /// SMPTE division or offset
    #[error("SMPTE: {0}")]
    Smpte(#[from] SmpteError),
    /// File assembly
    #[error("File: {0}")]
    File(#[from] FileError),
    /// A data byte with its leading bit set
    #[error("Invalid data byte {0:#04X}: leading bit is set")]
    InvalidDataByte(u8),
    /// A channel outside 0-15
    #[error("Invalid channel {0}: expected 0-15")]
    InvalidChannel(u8),
}

/// Variable-length quantity errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VlqError {
    /// The value needs more than 28 bits
    #[error("{0} does not fit in 28 bits")]
    Overflow(u32),
    /// More than four bytes carried the continuation bit
    #[error("quantity is longer than four bytes")]
    TooLong,
    /// The input ended before a terminating byte
    #[error("input ended inside a quantity")]
    Truncated,
}

/// Chunk framing errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// A second `MThd` chunk
    #[error("Found a second header chunk")]
    DuplicateHeader,
    /// A chunk tag other than the one expected
    #[error("Expected a {expected:?} chunk, found tag {found:?}")]
    UnexpectedTag {
        /// The tag that was required
        expected: [u8; 4],
        /// The tag that was read
        found: [u8; 4],
    },
}

/// Header chunk errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// The header chunk is shorter than six bytes
    #[error("Header chunk is {0} bytes long, expected at least 6")]
    Length(u32),
    /// A format other than 0, 1 or 2
    #[error("Invalid format {0}")]
    InvalidFormat(u16),
}

/// Errors inside a track chunk
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
    /// A status byte that names no known event
    #[error("Unknown status byte {0:#04X}")]
    UnknownStatus(u8),
    /// A data byte arrived before any channel status
    #[error("Data byte {0:#04X} with no running status in effect")]
    MissingRunningStatus(u8),
}

/// Meta event errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MetaError {
    /// A meta event type this codec does not know
    #[error("Unknown meta event type {0:#04X}")]
    UnknownType(u8),
    /// A fixed-size meta event with the wrong length
    #[error("Meta event {kind:#04X} has length {found}, expected {expected}")]
    Length {
        /// Meta type byte
        kind: u8,
        /// Size required by the format
        expected: usize,
        /// Size declared in the file
        found: usize,
    },
}

/// SMPTE errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SmpteError {
    /// The header division named an unsupported frame rate
    #[error("Invalid frame rate {0} in header division")]
    HeaderFrameTime(i8),
    /// An offset event was not five bytes long
    #[error("SMPTE offset must be 5 bytes, found {0}")]
    Length(usize),
    /// The frame type bits of an offset were out of range
    #[error("Invalid frame type {0} in SMPTE offset")]
    TrackFrame(u8),
    /// Hours past 23
    #[error("Invalid hour offset {0}")]
    HourOffset(u8),
    /// Minutes past 59
    #[error("Invalid minute offset {0}")]
    MinuteOffset(u8),
    /// Seconds past 59
    #[error("Invalid second offset {0}")]
    SecondOffset(u8),
    /// Subframes past 99
    #[error("Invalid subframe offset {0}")]
    Subframe(u8),
}

/// Errors operating on a [`MidiFile`](crate::file::MidiFile)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileError {
    /// No `MThd` chunk was found
    #[error("The file has no header chunk")]
    NoHeader,
    /// Track names are lookup keys and must be unique
    #[error("A track named {0:?} already exists")]
    DuplicateTrackName(String),
    /// No track at this index
    #[error("Track {index} does not exist ({count} tracks)")]
    TrackIndex {
        /// Requested index
        index: usize,
        /// Number of tracks
        count: usize,
    },
    /// Time signature denominators are stored as a power of two
    #[error("Time signature denominator {0} is not a power of two")]
    InvalidDenominator(u8),
}

/// Errors producing bytes
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// A delta-time or length past 28 bits
    #[error("VLQ: {0}")]
    Vlq(#[from] VlqError),
    /// The track does not hold exactly one end-of-track event
    #[error("Track holds {0} end-of-track events, expected exactly one")]
    TrackEndCount(usize),
    /// The end-of-track event is not the last event in time
    #[error("End of track at tick {end} is followed by an event at tick {at}")]
    TrackEndNotLast {
        /// Tick of the end-of-track event
        end: u32,
        /// Tick of the last event
        at: u32,
    },
    /// More tracks than the header can count
    #[error("{0} tracks do not fit in a header")]
    TooManyTracks(usize),
    /// A track body larger than a chunk length can describe
    #[error("Track body of {0} bytes is too large for a chunk")]
    ChunkTooLarge(usize),
}

/// Any error from reading or writing a file.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem errors
    #[cfg(feature = "std")]
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    /// Decoding errors
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// Encoding errors
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// File operation errors
    #[error(transparent)]
    File(#[from] FileError),
}
