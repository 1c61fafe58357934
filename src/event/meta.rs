use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The standard meta event types (`FF <type> <len> <data>`)
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaType {
    SequenceNumber = 0x00,
    Text = 0x01,
    CopyrightNotice = 0x02,
    SequenceName = 0x03,
    InstrumentName = 0x04,
    Lyrics = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ChannelPrefix = 0x20,
    EndOfTrack = 0x2F,
    Tempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

impl MetaType {
    /// True for the types whose payload is text
    pub const fn is_text(self) -> bool {
        (self as u8) >= 0x01 && (self as u8) <= 0x07
    }
}

/// A meta event: a type byte and its verbatim payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent {
    meta_type: u8,
    data: Vec<u8>,
}

impl MetaEvent {
    /// Create a meta event from its type byte and payload
    pub fn new(meta_type: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            meta_type,
            data: data.into(),
        }
    }
    /// The raw type byte
    pub const fn type_byte(&self) -> u8 {
        self.meta_type
    }
    /// The standard meta type, if known
    pub fn kind(&self) -> Option<MetaType> {
        MetaType::try_from(self.meta_type).ok()
    }
    /// The payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// True for `FF 2F 00`
    pub fn is_end_of_track(&self) -> bool {
        self.kind() == Some(MetaType::EndOfTrack)
    }

    /// `FF 51 03 tttttt`
    pub fn tempo(&self) -> Option<Tempo> {
        match (self.kind(), self.data.as_slice()) {
            (Some(MetaType::Tempo), &[a, b, c]) => Some(Tempo::new_from_bytes([a, b, c])),
            _ => None,
        }
    }

    /// `FF 58 04 nn dd cc bb`
    pub fn time_signature(&self) -> Option<TimeSignature> {
        match (self.kind(), self.data.as_slice()) {
            (Some(MetaType::TimeSignature), &[numerator, denominator, clocks, notated]) => {
                Some(TimeSignature {
                    numerator,
                    denominator,
                    clocks_per_click: clocks,
                    notated_32nds_per_quarter: notated,
                })
            }
            _ => None,
        }
    }

    /// `FF 59 02 sf mi`
    pub fn key_signature(&self) -> Option<KeySignature> {
        match (self.kind(), self.data.as_slice()) {
            (Some(MetaType::KeySignature), &[sf, mi]) => Some(KeySignature {
                accidentals: sf as i8,
                minor: mi != 0,
            }),
            _ => None,
        }
    }

    /// The payload of a text-like event, decoded lossily
    pub fn text(&self) -> Option<String> {
        self.kind()
            .filter(|kind| kind.is_text())
            .map(|_| String::from_utf8_lossy(&self.data).into_owned())
    }
}

#[doc = r#"
Tempo in microseconds per quarter note. Defaults to 500000 (120 bpm).
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    fn default() -> Self {
        Self(500_000)
    }
}

impl Tempo {
    /// Create a tempo from microseconds per quarter note
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note & 0x00FF_FFFF)
    }
    /// Create a tempo from the 3 payload bytes of a tempo meta event
    pub const fn new_from_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }
    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }
    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        if self.0 == 0 {
            return 0.;
        }
        60_000_000. / self.0 as f64
    }
}

/// Time signature as stored in the meta event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// Beat unit as a power of two (2 means x/4)
    pub denominator: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes per MIDI quarter note
    pub notated_32nds_per_quarter: u8,
}

impl TimeSignature {
    /// The beat unit, e.g. 4 for x/4. Saturates at 128.
    pub const fn beat_unit(&self) -> u8 {
        if self.denominator > 7 {
            return 128;
        }
        1 << self.denominator
    }
}

/// Key signature as stored in the meta event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Negative for flats, positive for sharps, `-7..=7`
    pub accidentals: i8,
    /// Minor when set, major otherwise
    pub minor: bool,
}

impl fmt::Display for MetaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tempo) = self.tempo() {
            return write!(f, "Tempo: {} us per quarter note", tempo.micros_per_quarter_note());
        }
        if let Some(ts) = self.time_signature() {
            return write!(f, "Time Signature: {}/{}", ts.numerator, ts.beat_unit());
        }
        if let Some(ks) = self.key_signature() {
            let scale = if ks.minor { "minor" } else { "major" };
            return write!(f, "Key Signature: {} {}", ks.accidentals, scale);
        }
        if let Some(text) = self.text() {
            return write!(f, "{:?}: {:?}", self.kind().unwrap_or(MetaType::Text), text);
        }
        match self.kind() {
            Some(kind) => write!(f, "{kind:?}")?,
            None => write!(f, "Meta {:#04x}", self.meta_type)?,
        }
        for byte in &self.data {
            write!(f, " {byte:02x}")?;
        }
        Ok(())
    }
}

#[test]
fn tempo_from_meta_payload() {
    let event = MetaEvent::new(0x51, [0x07, 0xA1, 0x20]);
    assert_eq!(event.tempo(), Some(Tempo::new(500_000)));
    assert_eq!(event.tempo().unwrap().bpm(), 120.);
}

#[test]
fn wrong_payload_size_is_not_a_tempo() {
    let event = MetaEvent::new(0x51, [0x07, 0xA1]);
    assert_eq!(event.tempo(), None);
}

#[test]
fn time_and_key_signatures() {
    use pretty_assertions::assert_eq;
    let ts = MetaEvent::new(0x58, [6, 3, 24, 8]).time_signature().unwrap();
    assert_eq!(ts.numerator, 6);
    assert_eq!(ts.beat_unit(), 8);

    let ks = MetaEvent::new(0x59, [0xFD, 1]).key_signature().unwrap();
    assert_eq!(
        ks,
        KeySignature {
            accidentals: -3,
            minor: true
        }
    );
}

#[test]
fn text_events_display() {
    let event = MetaEvent::new(0x03, *b"Piano");
    assert_eq!(event.text().as_deref(), Some("Piano"));
    assert_eq!(event.to_string(), "SequenceName: \"Piano\"");
    assert_eq!(MetaEvent::new(0x2F, Vec::new()).to_string(), "EndOfTrack");
}
