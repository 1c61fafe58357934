#![doc = r#"
Sequential, seekable byte reading for MIDI sources

[`Reader`] wraps any `Read + Seek` source and keeps track of the absolute
byte offset, so every failure can be reported precisely. The same type
decodes the file-level chunks from a [`File`](std::fs::File) and the events
of a single track from an in-memory buffer.

All multi-byte integers in a Standard MIDI File are big-endian.
"#]

mod error;
pub use error::*;

mod event;

mod vlq;
pub use vlq::*;

use std::{
    fs::File,
    io::{BufReader, Cursor, Read, Seek, SeekFrom},
    path::Path,
};

/// A byte source with big-endian integer extraction and position tracking.
pub struct Reader<R> {
    inner: R,
    position: u64,
}

impl<'slc> Reader<Cursor<&'slc [u8]>> {
    /// Read from an in-memory byte slice
    pub fn from_byte_slice(bytes: &'slc [u8]) -> Self {
        Self::new(Cursor::new(bytes))
    }
}

impl Reader<BufReader<File>> {
    /// Open a file on disk.
    ///
    /// The file handle is released when the reader is dropped.
    pub fn open(path: impl AsRef<Path>) -> ReadResult<Self> {
        let file = File::open(path).map_err(|e| ReaderError::new(0, e.into()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Wrap a source positioned at its first byte
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// The absolute offset of the next byte to be read
    #[inline]
    pub const fn buffer_position(&self) -> u64 {
        self.position
    }

    /// Read exactly `N` bytes
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut bytes = [0; N];
        self.fill(&mut bytes)?;
        Ok(bytes)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let [byte] = self.read_exact_size()?;
        Ok(byte)
    }

    /// Read a big-endian `u16`
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian `u32`
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Read `len` bytes into an owned buffer.
    ///
    /// The buffer grows with the bytes actually read, so a declared length
    /// larger than the source is [`ReaderErrorKind::Truncated`] without
    /// allocating it first.
    pub fn read_vec(&mut self, len: usize) -> ReadResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let read = self
            .inner
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| ReaderError::new(self.position, e.into()))?;
        if read < len {
            return Err(ReaderError::truncated(self.position));
        }
        self.position += read as u64;
        Ok(bytes)
    }

    /// Move to an absolute offset
    pub fn seek_to(&mut self, position: u64) -> ReadResult<()> {
        self.inner
            .seek(SeekFrom::Start(position))
            .map_err(|e| ReaderError::new(self.position, e.into()))?;
        self.position = position;
        Ok(())
    }

    /// Skip `len` bytes without reading them.
    ///
    /// Seeking past the end succeeds on files and cursors, so the target is
    /// checked against the source length and a short source is
    /// [`ReaderErrorKind::Truncated`] at the current offset.
    pub fn skip(&mut self, len: u64) -> ReadResult<()> {
        let start = self.position;
        let end = self
            .inner
            .seek(SeekFrom::End(0))
            .map_err(|e| ReaderError::new(start, e.into()))?;
        let target = start.saturating_add(len);
        if target > end {
            self.seek_to(start)?;
            return Err(ReaderError::truncated(start));
        }
        self.seek_to(target)
    }

    /// Unwraps the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        self.inner
            .read_exact(buf)
            .map_err(|e| ReaderError::new(self.position, e.into()))?;
        self.position += buf.len() as u64;
        Ok(())
    }
}

#[test]
fn reads_big_endian() {
    let mut reader = Reader::from_byte_slice(&[0x01, 0xE0, 0x00, 0x00, 0x00, 0x06, 0xFF]);
    assert_eq!(reader.read_u16().unwrap(), 480);
    assert_eq!(reader.read_u32().unwrap(), 6);
    assert_eq!(reader.buffer_position(), 6);
    assert_eq!(reader.read_u8().unwrap(), 0xFF);
}

#[test]
fn short_read_is_truncated_at_its_start() {
    let mut reader = Reader::from_byte_slice(&[0x00, 0x01, 0x02]);
    reader.read_u8().unwrap();
    let err = reader.read_u32().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 1);
}

#[test]
fn skip_moves_the_cursor() {
    let mut reader = Reader::from_byte_slice(&[0, 1, 2, 3, 4]);
    reader.skip(3).unwrap();
    assert_eq!(reader.read_u8().unwrap(), 3);
    reader.seek_to(1).unwrap();
    assert_eq!(reader.read_u8().unwrap(), 1);
}

#[test]
fn skip_past_the_end_is_truncated() {
    let mut reader = Reader::from_byte_slice(&[0, 1, 2, 3, 4]);
    reader.read_u8().unwrap();
    let err = reader.skip(10).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 1);
    assert_eq!(reader.read_u8().unwrap(), 1);

    reader.skip(3).unwrap();
    assert_eq!(reader.buffer_position(), 5);
}

#[test]
fn oversized_length_is_truncated() {
    let mut reader = Reader::from_byte_slice(&[0xF0, 1, 2]);
    reader.read_u8().unwrap();
    let err = reader.read_vec(0xFFFF_FFF0).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 1);

    let mut reader = Reader::from_byte_slice(&[1, 2, 3]);
    assert_eq!(reader.read_vec(2).unwrap(), vec![1, 2]);
    assert_eq!(reader.buffer_position(), 2);
}
