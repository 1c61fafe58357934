#![doc = r#"
Reading a [`MidiFile`] from disk or memory

```rust
# use midiscore::prelude::*;
let bytes = [
    b"MThd".as_slice(), &[0, 0, 0, 6, 0, 0, 0, 1, 0, 96],
    b"MTrk".as_slice(), &[0, 0, 0, 4, 0, 0xFF, 0x2F, 0],
]
.concat();

let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
assert_eq!(file.header().resolution(), 96);

let track = file.track(0).unwrap();
assert_eq!(track.len(), 1);
```
"#]

mod chunk;
pub use chunk::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use std::{
    fs::File,
    io::{BufReader, Cursor, Read, Seek},
    path::Path,
};

use crate::reader::{ReadResult, Reader};

#[doc = r#"
An open MIDI source.

The header is read when the file is opened. Tracks are decoded on request
with [`MidiFile::track`]. The handle remembers where the next unfetched track
starts, so asking for tracks in increasing order never rereads a chunk; asking
for an earlier track walks the chunk headers again from the first track.

Dropping the handle releases the underlying source.
"#]
pub struct MidiFile<R> {
    reader: Reader<R>,
    header: MidiFileHeader,
    first_track: u64,
    next_track: (u16, u64),
}

impl MidiFile<BufReader<File>> {
    /// Open and read the header of the file at `path`
    pub fn open(path: impl AsRef<Path>) -> ReadResult<Self> {
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.as_ref().display(), "Opening midi file");
        Self::from_reader(Reader::open(path)?)
    }
}

impl<'slc> MidiFile<Cursor<&'slc [u8]>> {
    /// Read a file held in memory
    pub fn from_byte_slice(bytes: &'slc [u8]) -> ReadResult<Self> {
        Self::from_reader(Reader::from_byte_slice(bytes))
    }
}

impl<R: Read + Seek> MidiFile<R> {
    /// Read the header from a reader positioned at the start of the file
    pub fn from_reader(mut reader: Reader<R>) -> ReadResult<Self> {
        let header = MidiFileHeader::read(&mut reader)?;
        let first_track = reader.buffer_position();

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                format = header.format(),
                tracks = header.num_tracks(),
                division = header.division(),
                "Read midi header"
            );
            if let Err(e) = header.timing() {
                tracing::warn!("{e}, delta-times will have a resolution of 0");
            }
        }

        Ok(Self {
            reader,
            header,
            first_track,
            next_track: (0, first_track),
        })
    }

    /// The header read on open
    pub const fn header(&self) -> &MidiFileHeader {
        &self.header
    }

    #[doc = r#"
Decode track `index` (0-based).

The chunks before it are skipped by their declared length without decoding
their events.

# Errors
- [`ChunkError::BadMagic`](crate::ChunkError::BadMagic) if a chunk on the way is not `MTrk`
- [`ReaderErrorKind::Truncated`](crate::reader::ReaderErrorKind::Truncated)
  if the source ends before the track's declared length
- [`ChunkError::Framing`](crate::ChunkError::Framing) if the events overrun
  the declared length
- any event decoding error, with the track index and absolute byte offset
"#]
    pub fn track(&mut self, index: u16) -> ReadResult<Track> {
        let (mut current, position) = if index >= self.next_track.0 {
            self.next_track
        } else {
            (0, self.first_track)
        };
        self.reader.seek_to(position)?;

        while current < index {
            let chunk = ChunkHeader::read(&mut self.reader, TRACK_MAGIC)
                .map_err(|e| e.in_track(current))?;
            #[cfg(feature = "tracing")]
            tracing::trace!(track = current, length = chunk.length(), "Skipping track");
            self.reader
                .skip(u64::from(chunk.length()))
                .map_err(|e| e.in_track(current))?;
            current += 1;
        }

        let chunk =
            ChunkHeader::read(&mut self.reader, TRACK_MAGIC).map_err(|e| e.in_track(index))?;
        let data_start = self.reader.buffer_position();
        let data = self
            .reader
            .read_vec(chunk.length() as usize)
            .map_err(|e| e.in_track(index))?;
        let track = Track::decode(index, chunk.length(), &data)
            .map_err(|e| e.offset_by(data_start).in_track(index))?;

        self.next_track = (index.saturating_add(1), self.reader.buffer_position());

        #[cfg(feature = "tracing")]
        tracing::debug!(track = index, events = track.len(), "Decoded track");

        Ok(track)
    }

    /// Decode every track the header announces, in order
    pub fn tracks(&mut self) -> ReadResult<Vec<Track>> {
        (0..self.header.num_tracks())
            .map(|index| self.track(index))
            .collect()
    }

    /// Release the handle, returning the underlying source
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}
