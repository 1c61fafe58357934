#![doc = r#"
Score files: a short header and one [`NoteSimplified`] byte per note.

```text
Byte    0           1           2           3
     +-----------+-----------+-----------+-----------+
   0 |    'M'    |    'S'    |    'S'    |    'C'    |
     +-----------+-----------+-----------+-----------+
   4 | Clef      | Key Sign  | Time Sign | Reserved  |
     +-----------+-----------+-----------+-----------+
   8 | Size(MSB) | Size(LSB) | Reserved  | Reserved  |
     +-----------+-----------+-----------+-----------+
  12 | Note 1    | Note 2    | Note 3    | ...       |
     +-----------+-----------+-----------+-----------+
```

Bytes after the last note are ignored when parsing.
"#]

mod convert;
pub use convert::*;

mod error;
pub use error::*;

use std::io::Write;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    event::{KeySignature, TimeSignature},
    note::NoteSimplified,
};

/// Tag of a score file
pub const SCORE_MAGIC: [u8; 4] = *b"MSSC";

/// Offset of the first note
pub const SCORE_HEADER_LEN: usize = 12;

/// The clef families
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ClefKind {
    /// Treble or French violin
    G = 0,
    /// Alto, tenor, baritone, mezzo-soprano or soprano
    C = 1,
    /// Bass, baritone or sub-bass
    F = 2,
}

#[doc = r#"
The clef byte.

```text
| rfu:2 | sub:3 | kind:3 |
```

`sub` selects the variant within the family, e.g. 0 is treble for
[`ClefKind::G`] and bass for [`ClefKind::F`].
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clef {
    kind: u8,
    sub: u8,
}

impl Clef {
    /// Treble clef
    pub const TREBLE: Self = Self::new(ClefKind::G, 0);

    /// Create a clef
    pub const fn new(kind: ClefKind, sub: u8) -> Self {
        Self {
            kind: kind as u8,
            sub: sub & 0x07,
        }
    }

    /// The family, if it is a known one
    pub fn kind(&self) -> Option<ClefKind> {
        ClefKind::try_from(self.kind).ok()
    }

    /// The variant within the family
    pub const fn sub(&self) -> u8 {
        self.sub
    }

    /// Unpack the header byte
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            kind: byte & 0x07,
            sub: (byte >> 3) & 0x07,
        }
    }

    /// Pack the header byte
    pub const fn to_byte(&self) -> u8 {
        self.kind | self.sub << 3
    }
}

#[doc = r#"
The key signature byte.

```text
| unused:2 | signature:3 | scale:3 |
```

`scale` is 0 for major and 1 for minor. `signature` counts sharps, so with
a major scale 0 is C, 1 is G and 7 is C#.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreKeySignature {
    scale: u8,
    signature: u8,
}

impl ScoreKeySignature {
    /// Create a key signature
    pub const fn new(minor: bool, sharps: u8) -> Self {
        Self {
            scale: minor as u8,
            signature: sharps & 0x07,
        }
    }

    /// Take the sharps and mode of a key signature meta event.
    ///
    /// Flats cannot be stored, they map to no accidentals.
    pub fn from_midi(key: KeySignature) -> Self {
        let sharps = u8::try_from(key.accidentals).unwrap_or_else(|_| {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                flats = key.accidentals.unsigned_abs(),
                "Score key signatures hold sharps only, using none"
            );
            0
        });
        Self::new(key.minor, sharps)
    }

    /// True for a minor scale
    pub const fn is_minor(&self) -> bool {
        self.scale == 1
    }

    /// The number of sharps
    pub const fn sharps(&self) -> u8 {
        self.signature
    }

    /// Unpack the header byte
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            scale: byte & 0x07,
            signature: (byte >> 3) & 0x07,
        }
    }

    /// Pack the header byte
    pub const fn to_byte(&self) -> u8 {
        self.scale | self.signature << 3
    }
}

#[doc = r#"
The time signature byte.

```text
| unused:2 | lower:2 | upper:4 |
```

`lower` is the beat unit as a power of two: 1 is x/2, 2 is x/4 and 3 is x/8.
Defaults to 4/4.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreTimeSignature {
    upper: u8,
    lower: u8,
}

impl Default for ScoreTimeSignature {
    fn default() -> Self {
        Self::new(4, 2)
    }
}

impl ScoreTimeSignature {
    /// Create a time signature, `lower` being a power of two
    pub const fn new(upper: u8, lower: u8) -> Self {
        Self {
            upper: upper & 0x0F,
            lower: lower & 0x03,
        }
    }

    /// Take the numerator and denominator of a time signature meta event
    pub fn from_midi(time: TimeSignature) -> Self {
        if time.numerator > 0x0F || time.denominator > 3 {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Time signature {}/{} does not fit a score, it will be truncated",
                time.numerator,
                time.beat_unit()
            );
        }
        Self::new(time.numerator, time.denominator)
    }

    /// Beats per bar
    pub const fn upper(&self) -> u8 {
        self.upper
    }

    /// The beat unit, e.g. 4 for x/4
    pub const fn beat_unit(&self) -> u8 {
        1 << self.lower
    }

    /// Unpack the header byte
    pub const fn from_byte(byte: u8) -> Self {
        Self::new(byte, byte >> 4)
    }

    /// Pack the header byte
    pub const fn to_byte(&self) -> u8 {
        self.upper | self.lower << 4
    }
}

/// A numbered notation score
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// The clef
    pub clef: Clef,
    /// The key signature
    pub key_signature: ScoreKeySignature,
    /// The time signature
    pub time_signature: ScoreTimeSignature,
    /// The notes in order
    pub notes: Vec<NoteSimplified>,
}

impl Score {
    /// Encode the score file.
    ///
    /// # Errors
    /// [`ScoreError::TooManyNotes`] if there are more than 65535 notes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ScoreError> {
        let count =
            u16::try_from(self.notes.len()).map_err(|_| ScoreError::TooManyNotes(self.notes.len()))?;

        let mut bytes = Vec::with_capacity(SCORE_HEADER_LEN + self.notes.len());
        bytes.extend_from_slice(&SCORE_MAGIC);
        bytes.extend_from_slice(&[
            self.clef.to_byte(),
            self.key_signature.to_byte(),
            self.time_signature.to_byte(),
            0,
        ]);
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend(self.notes.iter().map(NoteSimplified::to_byte));
        Ok(bytes)
    }

    /// Encode the score file into `writer`
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ScoreError> {
        writer.write_all(&self.to_bytes()?)?;
        writer.flush()?;
        Ok(())
    }

    /// Decode a score file
    pub fn parse(bytes: &[u8]) -> Result<Self, ScoreError> {
        let Some((header, rest)) = bytes.split_first_chunk::<SCORE_HEADER_LEN>() else {
            return Err(ScoreError::Truncated {
                expected: SCORE_HEADER_LEN,
                found: bytes.len(),
            });
        };
        let magic = [header[0], header[1], header[2], header[3]];
        if magic != SCORE_MAGIC {
            return Err(ScoreError::BadMagic(magic));
        }

        let count = u16::from_be_bytes([header[8], header[9]]) as usize;
        let Some(notes) = rest.get(..count) else {
            return Err(ScoreError::Truncated {
                expected: SCORE_HEADER_LEN + count,
                found: bytes.len(),
            });
        };

        Ok(Self {
            clef: Clef::from_byte(header[4]),
            key_signature: ScoreKeySignature::from_byte(header[5]),
            time_signature: ScoreTimeSignature::from_byte(header[6]),
            notes: notes.iter().copied().map(NoteSimplified::from_byte).collect(),
        })
    }
}

#[test]
fn encodes_header_and_notes() {
    use crate::note::NoteLength;
    use pretty_assertions::assert_eq;

    let score = Score {
        clef: Clef::new(ClefKind::F, 1),
        key_signature: ScoreKeySignature::new(true, 2),
        time_signature: ScoreTimeSignature::new(3, 3),
        notes: vec![
            NoteSimplified::from_key(60, NoteLength::Quarter),
            NoteSimplified::from_key(62, NoteLength::Half),
        ],
    };
    assert_eq!(
        score.to_bytes().unwrap(),
        vec![
            b'M', b'S', b'S', b'C', //
            0b0000_1010, 0b0001_0001, 0b0011_0011, 0, //
            0, 2, 0, 0, //
            0b0001_0001, 0b0000_0010,
        ]
    );
}

#[test]
fn parse_ignores_padding() {
    use pretty_assertions::assert_eq;

    let mut bytes = Score {
        notes: vec![NoteSimplified::from_byte(0x15)],
        ..Default::default()
    }
    .to_bytes()
    .unwrap();
    bytes.resize(512, 0);

    let score = Score::parse(&bytes).unwrap();
    assert_eq!(score.notes, vec![NoteSimplified::from_byte(0x15)]);
    assert_eq!(score.time_signature.upper(), 4);
    assert_eq!(score.time_signature.beat_unit(), 4);
    assert_eq!(score.clef.kind(), Some(ClefKind::G));
}

#[test]
fn parse_rejects_bad_input() {
    assert!(matches!(
        Score::parse(b"MSSC\x00\x00"),
        Err(ScoreError::Truncated {
            expected: 12,
            found: 6
        })
    ));
    assert!(matches!(
        Score::parse(b"MThd\x00\x00\x00\x06\x00\x00\x00\x01"),
        Err(ScoreError::BadMagic(m)) if &m == b"MThd"
    ));
    assert!(matches!(
        Score::parse(b"MSSC\x00\x00\x42\x00\x00\x03\x00\x00\x11"),
        Err(ScoreError::Truncated {
            expected: 15,
            found: 13
        })
    ));
}

#[test]
fn too_many_notes() {
    let score = Score {
        notes: vec![NoteSimplified::REST; 70_000],
        ..Default::default()
    };
    assert!(matches!(score.to_bytes(), Err(ScoreError::TooManyNotes(70_000))));
}

#[test]
fn signatures_from_midi() {
    let key = ScoreKeySignature::from_midi(KeySignature {
        accidentals: 3,
        minor: false,
    });
    assert_eq!((key.sharps(), key.is_minor()), (3, false));

    let flats = ScoreKeySignature::from_midi(KeySignature {
        accidentals: -2,
        minor: true,
    });
    assert_eq!((flats.sharps(), flats.is_minor()), (0, true));

    let time = ScoreTimeSignature::from_midi(TimeSignature {
        numerator: 6,
        denominator: 3,
        clocks_per_click: 24,
        notated_32nds_per_quarter: 8,
    });
    assert_eq!((time.upper(), time.beat_unit()), (6, 8));
}
