use thiserror::Error;

#[doc = r#"
The set of ways a MIDI byte stream can be malformed.

Positional context (byte offset, track index) is carried by the
[`ReaderError`](crate::reader::ReaderError) wrapping this value.
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The file header carried an unexpected value
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// A chunk was malformed
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// A track event was malformed
    #[error("Event: {0}")]
    Event(#[from] EventError),
}

/// Errors from the `MThd` payload
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// The SMPTE frame code in the division is not one of -24, -25, -29 or -30.
    ///
    /// This is recoverable: the file stays readable and its resolution
    /// defaults to zero ticks.
    #[error("Unsupported SMPTE frame code {0} in division")]
    UnsupportedDivision(i8),
}

/// Errors in the chunk framing of a file
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// The 4-byte chunk tag did not match
    #[error("Expected chunk tag {}, found {}", tag(.expected), tag(.found))]
    BadMagic {
        /// The tag that was required here
        expected: [u8; 4],
        /// The tag that was read
        found: [u8; 4],
    },
    /// The header chunk declared fewer than the 6 bytes it must hold
    #[error("Header chunk declares {0} bytes, at least 6 are required")]
    ShortHeader(u32),
    /// An event ran past the declared end of its track
    #[error("Event at track byte {overrun_at} runs past the declared track length of {declared}")]
    Framing {
        /// The length the `MTrk` chunk declared
        declared: u32,
        /// Offset of the overrunning event, relative to the track data
        overrun_at: u64,
    },
}

/// Errors decoding a single track event
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    /// A data byte appeared where a status byte was expected and no
    /// channel command had been seen yet in this track
    #[error("Data byte {0:#04X} with no running status established")]
    NoRunningStatus(u8),
    /// A system common or realtime status byte, which cannot appear in a file
    #[error("Status byte {0:#04X} is not valid in a track")]
    UnsupportedStatus(u8),
}

fn tag(bytes: &[u8; 4]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn bad_magic_is_readable() {
    let err = ChunkError::BadMagic {
        expected: *b"MTrk",
        found: *b"RIFF",
    };
    assert_eq!(err.to_string(), "Expected chunk tag MTrk, found RIFF");
}
