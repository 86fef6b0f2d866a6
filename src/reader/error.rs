use super::Reader;
use crate::ParseError;
use thiserror::Error;

/// Why a read failed, and the absolute byte offset it failed at.
///
/// Offsets count from the start of the buffer handed to
/// [`MidiFile::parse`](crate::file::MidiFile::parse), so an error inside the
/// third track still points into the whole file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("at byte {position}: {kind}")]
pub struct ReaderError {
    position: usize,
    kind: ReaderErrorKind,
}

/// The two ways a read goes wrong
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// The bytes are there but do not make sense
    #[error("{0}")]
    Invalid(#[from] ParseError),
    /// The input stopped before the structure did
    #[error("unexpected end of input")]
    OutOfBounds,
}

impl ReaderError {
    /// An error of `kind` at `position`
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Truncated input at `position`
    pub const fn oob(position: usize) -> Self {
        Self::new(position, ReaderErrorKind::OutOfBounds)
    }

    /// Malformed input at `position`
    pub fn invalid(position: usize, err: impl Into<ParseError>) -> Self {
        Self::new(position, ReaderErrorKind::Invalid(err.into()))
    }

    /// Absolute byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// What went wrong
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// True if the input ended early
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }

    /// The underlying [`ParseError`], unless the input was merely cut short.
    pub fn parse_error(&self) -> Option<&ParseError> {
        let ReaderErrorKind::Invalid(e) = &self.kind else {
            return None;
        };
        Some(e)
    }
}

/// Result of any [`Reader`] operation
pub type ReadResult<T> = Result<T, ReaderError>;

/// Malformed input at the reader's cursor
pub(crate) fn inv_data(reader: &Reader<'_>, v: impl Into<ParseError>) -> ReaderError {
    ReaderError::invalid(reader.buffer_position(), v)
}

#[test]
fn display_names_the_offset() {
    use alloc::string::ToString;
    let err = ReaderError::oob(17);
    assert_eq!(err.to_string(), "at byte 17: unexpected end of input");
    assert!(err.parse_error().is_none());
}
