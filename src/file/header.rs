use core::fmt;
use std::io::{Read, Seek};

use super::{ChunkHeader, FormatType, HEADER_MAGIC, Timing};
use crate::{
    ChunkError, HeaderError,
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
};

#[doc = r#"
The `MThd` chunk: file format, number of tracks and the timing division.

```text
"MThd" <length: u32> <format: u16> <tracks: u16> <division: u16> [padding]
```

The division is kept raw; [`timing`](Self::timing) and
[`resolution`](Self::resolution) interpret it.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFileHeader {
    format: u16,
    num_tracks: u16,
    division: u16,
}

impl MidiFileHeader {
    /// Create a header from its three raw fields
    pub const fn new(format: u16, num_tracks: u16, division: u16) -> Self {
        Self {
            format,
            num_tracks,
            division,
        }
    }

    /// Read the header chunk, leaving the reader at the first byte after it.
    ///
    /// A length above 6 is padding and is skipped.
    pub fn read<R: Read + Seek>(reader: &mut Reader<R>) -> ReadResult<Self> {
        let start = reader.buffer_position();
        let chunk = ChunkHeader::read(reader, HEADER_MAGIC)?;
        if chunk.length() < 6 {
            return Err(ReaderError::new(
                start,
                ReaderErrorKind::chunk(ChunkError::ShortHeader(chunk.length())),
            ));
        }
        let format = reader.read_u16()?;
        let num_tracks = reader.read_u16()?;
        let division = reader.read_u16()?;
        reader.skip(u64::from(chunk.length() - 6))?;

        Ok(Self::new(format, num_tracks, division))
    }

    /// The raw `<format>` field
    pub const fn format(&self) -> u16 {
        self.format
    }

    /// The format, if it is one of 0, 1 or 2
    pub fn format_type(&self) -> Option<FormatType> {
        FormatType::try_from(self.format).ok()
    }

    /// The number of track chunks the header announces
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// The raw `<division>` field
    pub const fn division(&self) -> u16 {
        self.division
    }

    /// Decode the division.
    ///
    /// # Errors
    /// [`HeaderError::UnsupportedDivision`] for an unknown SMPTE frame code.
    /// The file remains readable in that case.
    pub const fn timing(&self) -> Result<Timing, HeaderError> {
        Timing::from_division(self.division)
    }

    /// Ticks per quarter note, or ticks per second for SMPTE timing.
    ///
    /// Zero when the division is unsupported.
    pub const fn resolution(&self) -> u16 {
        match self.timing() {
            Ok(timing) => timing.resolution(),
            Err(_) => 0,
        }
    }
}

impl fmt::Display for MidiFileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "format: {}, tracks: {}, division: {:#06x}",
            self.format, self.num_tracks, self.division
        )?;
        match self.timing() {
            Ok(Timing::TicksPerQuarterNote(ppq)) => write!(f, " ({ppq} ticks per quarter note)"),
            Ok(Timing::Smpte(smpte)) => write!(
                f,
                " ({} fps, {} ticks per frame)",
                smpte.fps().as_f64(),
                smpte.ticks_per_frame()
            ),
            Err(e) => write!(f, " ({e})"),
        }
    }
}

#[test]
fn reads_header() {
    let mut reader = Reader::from_byte_slice(b"MThd\x00\x00\x00\x06\x00\x01\x00\x02\x01\xE0");
    let header = MidiFileHeader::read(&mut reader).unwrap();
    assert_eq!(header, MidiFileHeader::new(1, 2, 480));
    assert_eq!(header.format_type(), Some(FormatType::Simultaneous));
    assert_eq!(header.resolution(), 480);
    assert_eq!(reader.buffer_position(), 14);
}

#[test]
fn skips_header_padding() {
    let mut reader =
        Reader::from_byte_slice(b"MThd\x00\x00\x00\x08\x00\x00\x00\x01\x00\x60\xAA\xBB\xCC");
    let header = MidiFileHeader::read(&mut reader).unwrap();
    assert_eq!(header.num_tracks(), 1);
    assert_eq!(reader.buffer_position(), 16);
    assert_eq!(reader.read_u8().unwrap(), 0xCC);
}

#[test]
fn short_header_is_rejected() {
    let mut reader = Reader::from_byte_slice(b"MThd\x00\x00\x00\x04\x00\x00\x00\x01");
    let err = MidiFileHeader::read(&mut reader).unwrap_err();
    assert_eq!(err.parse(), Some(ChunkError::ShortHeader(4).into()));
}

#[test]
fn unsupported_division_is_recoverable() {
    let header = MidiFileHeader::new(0, 1, 0xE028);
    assert_eq!(header.timing(), Err(HeaderError::UnsupportedDivision(-32)));
    assert_eq!(header.resolution(), 0);
    assert_eq!(
        header.to_string(),
        "format: 0, tracks: 1, division: 0xe028 (Unsupported SMPTE frame code -32 in division)"
    );
}
