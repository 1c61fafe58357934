use std::io;

use crate::{ChunkError, EventError, ParseError};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading a MIDI source.

Every error carries the absolute byte offset where reading failed, and the
track index when the failure happened while fetching a track.
"#]
#[derive(Debug, Error)]
#[error("Reading at position {position}{}, {kind}", track_context(.track))]
pub struct ReaderError {
    position: u64,
    track: Option<u16>,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// The source does not exist
    #[error("Not found: {0}")]
    NotFound(io::Error),
    /// The source could not be read or seeked
    #[error("I/O failure: {0}")]
    Io(io::Error),
    /// Fewer bytes were available than a declared length requires
    #[error("Truncated: ran out of bytes")]
    Truncated,
    /// Parsing errors
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
}

impl ReaderErrorKind {
    pub(crate) const fn chunk(chunk_err: ChunkError) -> Self {
        Self::ParseError(ParseError::Chunk(chunk_err))
    }
    pub(crate) const fn event(event_err: EventError) -> Self {
        Self::ParseError(ParseError::Event(event_err))
    }
}

impl From<io::Error> for ReaderErrorKind {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::Truncated,
            io::ErrorKind::NotFound => Self::NotFound(err),
            _ => Self::Io(err),
        }
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: u64, kind: ReaderErrorKind) -> Self {
        Self {
            position,
            track: None,
            kind,
        }
    }
    /// Create a new truncation error
    pub const fn truncated(position: u64) -> Self {
        Self::new(position, ReaderErrorKind::Truncated)
    }

    /// True if the source ran out of bytes
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Truncated)
    }
    /// True if the source does not exist
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::NotFound(_))
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the parse error, if this is one.
    pub fn parse(&self) -> Option<ParseError> {
        match self.kind {
            ReaderErrorKind::ParseError(e) => Some(e),
            _ => None,
        }
    }
    /// Returns the absolute byte offset where the read error occurred.
    pub fn position(&self) -> u64 {
        self.position
    }
    /// Returns the index of the track being read, if any.
    pub fn track(&self) -> Option<u16> {
        self.track
    }

    /// Tags the error with the track it happened in
    pub(crate) fn in_track(mut self, index: u16) -> Self {
        self.track.get_or_insert(index);
        self
    }

    /// Rebases a position measured inside a buffer onto the source
    pub(crate) fn offset_by(mut self, base: u64) -> Self {
        self.position += base;
        self
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

fn track_context(track: &Option<u16>) -> String {
    match track {
        Some(index) => format!(" in track {index}"),
        None => String::new(),
    }
}

#[test]
fn display_carries_track_and_position() {
    let err = ReaderError::new(42, ReaderErrorKind::event(EventError::NoRunningStatus(0x3C))).in_track(2);
    assert_eq!(
        err.to_string(),
        "Reading at position 42 in track 2, Parsing Event: Data byte 0x3C with no running status established"
    );
}

#[test]
fn eof_maps_to_truncated() {
    let kind = ReaderErrorKind::from(io::Error::from(io::ErrorKind::UnexpectedEof));
    assert!(matches!(kind, ReaderErrorKind::Truncated));
    let kind = ReaderErrorKind::from(io::Error::from(io::ErrorKind::NotFound));
    assert!(matches!(kind, ReaderErrorKind::NotFound(_)));
}
