#![doc = r#"
SMPTE timing for files whose delta-times count frames rather than beats.

A negative high byte in the division selects one of four frame rates, and
the low byte gives the number of ticks in each frame:

```text
-24  film
-25  PAL/SECAM video
-29  NTSC color video, 29.97 fps "drop frame"
-30  NTSC black & white video
```
"#]

use crate::HeaderError;

/// The frame rate of an SMPTE division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second
    TwentyFour,
    /// 25 frames per second
    TwentyFive,
    /// 29.97 frames per second
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// The nominal frame rate used when converting ticks.
    ///
    /// Drop frame counts as 30.
    ///
    /// # Example
    /// ```rust
    /// # use midiscore::prelude::*;
    /// assert_eq!(SmpteFps::TwentyNine.as_division(), 30); // Not 29!
    /// ```
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 30,
            Self::Thirty => 30,
        }
    }
    /// The exact frame rate, 30000/1001 for drop frame
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// Header timing for SMPTE-based files
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    fps: SmpteFps,
    ticks_per_frame: u8,
}

impl SmpteHeader {
    /// Bits 14 thru 8 of the division hold one of -24, -25, -29 or -30,
    /// the low byte holds the ticks per frame.
    pub(crate) const fn new(frame_code: i8, ticks_per_frame: u8) -> Result<Self, HeaderError> {
        let fps = match frame_code {
            -24 => SmpteFps::TwentyFour,
            -25 => SmpteFps::TwentyFive,
            //drop frame (29.97)
            -29 => SmpteFps::TwentyNine,
            -30 => SmpteFps::Thirty,
            _ => return Err(HeaderError::UnsupportedDivision(frame_code)),
        };
        Ok(Self {
            fps,
            ticks_per_frame,
        })
    }

    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

const DROP_FRAME: f64 = 30_000. / 1001.;

#[test]
fn drop_frame_rate() {
    assert!((SmpteFps::TwentyNine.as_f64() - 29.97).abs() < 0.01);
    assert_eq!(SmpteHeader::new(-29, 4).unwrap().fps(), SmpteFps::TwentyNine);
}
