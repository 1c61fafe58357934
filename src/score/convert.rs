use std::{
    io::{Read, Seek},
    path::Path,
};

use super::{Score, ScoreError, ScoreKeySignature, ScoreTimeSignature};
use crate::{
    event::{MetaType, Tempo},
    file::{MidiFile, Track},
    note::{NoteLength, NoteSimplified},
};

/// Fraction of a length class a note may fall short of and still count as it
pub const DEFAULT_TOLERANCE: f64 = 0.40;

#[doc = r#"
Turns a melody held in a MIDI file into a [`Score`].

With two or more tracks, the first one supplies tempo, time signature and
key signature and the second one supplies the notes. A single track file
supplies only notes.

The melody is expected to be monophonic: every Note-On is closed by a
Note-Off (or a Note-On with velocity 0) before the next one starts. A note
lasts from the previous event to its Note-Off, so a rest before it is
counted into its length.

# Example
```rust
# use midiscore::prelude::*;
let converter = ScoreConverter::default();
assert_eq!(converter.length_from_ticks(480, 480), NoteLength::Quarter);
assert_eq!(converter.length_from_ticks(400, 480), NoteLength::Eighth);
assert_eq!(converter.length_from_ticks(1900, 480), NoteLength::Whole);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreConverter {
    tolerance: f64,
}

impl Default for ScoreConverter {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

/// The result of [`ScoreConverter::convert`]
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The tempo from the first track, 120 bpm if there was none
    pub tempo: Tempo,
    /// The ticks per quarter note used to size the notes
    pub resolution: u16,
    /// The converted score
    pub score: Score,
}

impl ScoreConverter {
    /// Create a converter with the given length tolerance
    pub const fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// The length tolerance
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[doc = r#"
Classify a duration of `ticks` at `resolution` ticks per quarter note.

With tolerance `t`, a duration of `f` quarter notes is

```text
whole      f >= 4 - t
half       f >= 2 - t/2
quarter    f >= 1 - t/4
eighth     f >= 1/2 - t/8
sixteenth  otherwise
```

A zero duration or resolution is a quarter.
"#]
    pub fn length_from_ticks(&self, ticks: u32, resolution: u16) -> NoteLength {
        if ticks == 0 || resolution == 0 {
            return NoteLength::Quarter;
        }
        let fraction = f64::from(ticks) / f64::from(resolution);
        let t = self.tolerance;

        if fraction >= 4. - t {
            NoteLength::Whole
        } else if fraction >= 2. - t / 2. {
            NoteLength::Half
        } else if fraction >= 1. - t / 4. {
            NoteLength::Quarter
        } else if fraction >= 0.5 - t / 8. {
            NoteLength::Eighth
        } else {
            NoteLength::Sixteenth
        }
    }

    /// Open and convert the MIDI file at `path`
    pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<Conversion, ScoreError> {
        let mut file = MidiFile::open(path)?;
        self.convert(&mut file)
    }

    /// Convert an open MIDI file
    pub fn convert<R: Read + Seek>(&self, file: &mut MidiFile<R>) -> Result<Conversion, ScoreError> {
        let num_tracks = file.header().num_tracks();
        if num_tracks == 0 {
            return Err(ScoreError::NoTracks);
        }
        let resolution = file.header().resolution();

        let mut score = Score::default();
        let mut tempo = Tempo::default();

        let melody = if num_tracks >= 2 {
            let conductor = file.track(0)?;
            self.read_signatures(&conductor, &mut score, &mut tempo);
            1
        } else {
            0
        };

        let track = file.track(melody)?;
        score.notes = self.read_notes(&track, resolution);

        #[cfg(feature = "tracing")]
        tracing::debug!(track = melody, notes = score.notes.len(), "Converted melody");

        Ok(Conversion {
            tempo,
            resolution,
            score,
        })
    }

    fn read_signatures(&self, track: &Track, score: &mut Score, tempo: &mut Tempo) {
        for meta in track.iter().filter_map(|event| event.meta()) {
            match meta.kind() {
                Some(MetaType::Tempo) => {
                    if let Some(t) = meta.tempo() {
                        #[cfg(feature = "tracing")]
                        tracing::info!("Tempo: {} us per quarter note", t.micros_per_quarter_note());
                        *tempo = t;
                    }
                }
                Some(MetaType::TimeSignature) => {
                    if let Some(ts) = meta.time_signature() {
                        #[cfg(feature = "tracing")]
                        tracing::info!("Time signature: {}/{}", ts.numerator, ts.beat_unit());
                        score.time_signature = ScoreTimeSignature::from_midi(ts);
                    }
                }
                Some(MetaType::KeySignature) => {
                    if let Some(ks) = meta.key_signature() {
                        #[cfg(feature = "tracing")]
                        tracing::info!(
                            accidentals = ks.accidentals,
                            minor = ks.minor,
                            "Key signature"
                        );
                        score.key_signature = ScoreKeySignature::from_midi(ks);
                    }
                }
                _ => {}
            }
        }
    }

    fn read_notes(&self, track: &Track, resolution: u16) -> Vec<NoteSimplified> {
        let mut ticks = 0u32;
        let mut notes = Vec::new();

        for event in track {
            if let Some(key) = event.note_off_key() {
                ticks = ticks.saturating_add(event.delta_time());
                let note = NoteSimplified::from_key(key, self.length_from_ticks(ticks, resolution));
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    degree = note.degree(),
                    sharp = note.is_sharp(),
                    length = ?note.length(),
                    octave = note.octave(),
                    "Note"
                );
                notes.push(note);
            } else if event.note_on_key().is_some() {
                ticks = event.delta_time();
            }
        }
        notes
    }
}

#[test]
fn length_ladder() {
    let converter = ScoreConverter::default();
    let cases = [
        (0, NoteLength::Quarter),
        (1920, NoteLength::Whole),
        (1740, NoteLength::Whole),
        (1700, NoteLength::Half),
        (960, NoteLength::Half),
        (900, NoteLength::Half),
        (800, NoteLength::Quarter),
        (480, NoteLength::Quarter),
        (440, NoteLength::Quarter),
        (400, NoteLength::Eighth),
        (240, NoteLength::Eighth),
        (220, NoteLength::Eighth),
        (200, NoteLength::Sixteenth),
        (120, NoteLength::Sixteenth),
    ];
    for (ticks, expected) in cases {
        assert_eq!(converter.length_from_ticks(ticks, 480), expected, "{ticks} ticks");
    }
    assert_eq!(converter.length_from_ticks(480, 0), NoteLength::Quarter);
}

#[test]
fn zero_tolerance_is_strict() {
    let converter = ScoreConverter::new(0.);
    assert_eq!(converter.length_from_ticks(479, 480), NoteLength::Eighth);
    assert_eq!(converter.length_from_ticks(480, 480), NoteLength::Quarter);
}
