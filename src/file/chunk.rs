#![doc = r#"
Chunk framing for MIDI files

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data.

```text
[Header Chunk: "MThd" <length=6> <format> <tracks> <division>]
[Track Chunk 1: "MTrk" <length> <delta_time> <event> ...]
[Track Chunk 2: "MTrk" <length> <delta_time> <event> ...]
...
[Track Chunk N: "MTrk" <length> <delta_time> <event> ...]
```

The header chunk must be the first chunk in a MIDI file. Track chunks follow
it; the number of track chunks should match the track count in the header.
"#]

use std::io::{Read, Seek};

use crate::{
    ChunkError,
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
};

/// Tag of the header chunk
pub const HEADER_MAGIC: [u8; 4] = *b"MThd";
/// Tag of a track chunk
pub const TRACK_MAGIC: [u8; 4] = *b"MTrk";

/// The 8 bytes introducing every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    magic: [u8; 4],
    length: u32,
}

impl ChunkHeader {
    /// Read a chunk header and check its tag.
    ///
    /// # Errors
    /// - [`ChunkError::BadMagic`] if the tag is not `expected`
    /// - [`ReaderErrorKind::Truncated`] if fewer than 8 bytes remain
    pub fn read<R: Read + Seek>(reader: &mut Reader<R>, expected: [u8; 4]) -> ReadResult<Self> {
        let position = reader.buffer_position();
        let magic: [u8; 4] = reader.read_exact_size()?;
        if magic != expected {
            return Err(ReaderError::new(
                position,
                ReaderErrorKind::chunk(ChunkError::BadMagic {
                    expected,
                    found: magic,
                }),
            ));
        }
        let length = reader.read_u32()?;
        Ok(Self { magic, length })
    }

    /// The chunk tag
    pub const fn magic(&self) -> [u8; 4] {
        self.magic
    }

    /// The number of data bytes following this header
    pub const fn length(&self) -> u32 {
        self.length
    }
}

#[test]
fn reads_track_chunk_header() {
    let mut reader = Reader::from_byte_slice(b"MTrk\x00\x00\x01\x00");
    let header = ChunkHeader::read(&mut reader, TRACK_MAGIC).unwrap();
    assert_eq!(header.length(), 256);
    assert_eq!(reader.buffer_position(), 8);
}

#[test]
fn rejects_wrong_tag() {
    let mut reader = Reader::from_byte_slice(b"XXXX\x00\x00\x00\x06");
    let err = ChunkHeader::read(&mut reader, HEADER_MAGIC).unwrap_err();
    assert_eq!(
        err.parse(),
        Some(
            ChunkError::BadMagic {
                expected: *b"MThd",
                found: *b"XXXX"
            }
            .into()
        )
    );
    assert_eq!(err.position(), 0);
}
