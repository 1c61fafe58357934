mod smpte;
pub use smpte::*;

use crate::HeaderError;

#[doc = r#"
The header timing type, decoded from the `<division>` field.

```text
+------------+----+----------------+-------------+
| Bit:       | 15 | 14 ......... 8 | 7 ....... 0 |
+------------+----+----------------+-------------+
| <division> |  0 | ticks per quarter note       |
+------------+----+----------------+-------------+
|            |  1 | -frames/second | ticks/frame |
+------------+----+----------------+-------------+
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(u16),

    /// The midi file's delta times are defined using an SMPTE and MIDI Time Code
    Smpte(SmpteHeader),
}

impl Timing {
    /// Decode the raw division.
    ///
    /// # Errors
    /// [`HeaderError::UnsupportedDivision`] if bit 15 is set and the frame code
    /// is not -24, -25, -29 or -30.
    pub const fn from_division(division: u16) -> Result<Self, HeaderError> {
        let [hi, lo] = division.to_be_bytes();
        if hi >> 7 == 0 {
            return Ok(Self::TicksPerQuarterNote(division & 0x7FFF));
        }
        match SmpteHeader::new(hi as i8, lo) {
            Ok(smpte) => Ok(Self::Smpte(smpte)),
            Err(e) => Err(e),
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }

    #[doc = r#"
The time resolution of delta-times.

Ticks per quarter note for metrical timing. For SMPTE timing this is ticks
per second: frames per second times ticks per frame, with both 29.97 and 30
fps counting as 30.
"#]
    pub const fn resolution(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(t) => *t,
            Self::Smpte(s) => s.fps().as_division() as u16 * s.ticks_per_frame() as u16,
        }
    }
}

#[test]
fn metrical_division() {
    assert_eq!(Timing::from_division(480), Ok(Timing::TicksPerQuarterNote(480)));
    assert_eq!(Timing::from_division(960).unwrap().resolution(), 960);
}

#[test]
fn smpte_division() {
    // 25 fps, 40 ticks per frame: millisecond resolution
    let timing = Timing::from_division(0xE728).unwrap();
    let Timing::Smpte(smpte) = timing else {
        panic!("expected smpte timing");
    };
    assert_eq!(smpte.fps(), SmpteFps::TwentyFive);
    assert_eq!(smpte.ticks_per_frame(), 40);
    assert_eq!(timing.resolution(), 1000);

    // drop frame counts as 30
    assert_eq!(Timing::from_division(0xE304).unwrap().resolution(), 120);
}

#[test]
fn unsupported_frame_code() {
    assert_eq!(
        Timing::from_division(0xE028),
        Err(HeaderError::UnsupportedDivision(-32))
    );
}
