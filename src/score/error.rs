use std::io;

use thiserror::Error;

use crate::reader::ReaderError;

/// Errors converting, writing or parsing a score
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The MIDI source could not be read
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// Writing the score failed
    #[error("Writing score: {0}")]
    Io(#[from] io::Error),
    /// The MIDI header announces no tracks
    #[error("The midi file has no tracks")]
    NoTracks,
    /// The note count does not fit the 16-bit size field
    #[error("{0} notes do not fit in a score, the maximum is 65535")]
    TooManyNotes(usize),
    /// A score file did not start with `MSSC`
    #[error("Not a score file, found magic {0:02X?}")]
    BadMagic([u8; 4]),
    /// A score file is shorter than its header or note count requires
    #[error("Score needs {expected} bytes, found {found}")]
    Truncated {
        /// Bytes required
        expected: usize,
        /// Bytes available
        found: usize,
    },
}
