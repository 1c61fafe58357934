#![doc = r#"
Numbered musical notation

Scale degrees 1 to 7 stand for do, re, mi, fa, sol, la, si, and 0 is a rest.
A MIDI key is mapped to a degree, a sharp flag and an octave offset
relative to the octave of middle C (key 60).

Two packed encodings are provided:

```text
Note (2 bytes)
byte 0: | octaves:2 | length:2 | sharp:1 | degree:3 |
byte 1: | dynamics:2 | expression:2 | rfu:1 | dot:1 | len2:1 | oct2:1 |

NoteSimplified (1 byte)
byte 0: | octaves:2 | length:2 | sharp:1 | degree:3 |
```

[`Note`] spans eight octaves (keys 24 to 107) and supports whole and dotted
notes. [`NoteSimplified`] spans four octaves (keys 48 to 95).

# Example
```rust
# use midiscore::prelude::*;
let note = Note::from_key(61, NoteLength::Eighth, true);
assert_eq!(note.degree(), 1);
assert!(note.is_sharp());
assert_eq!(note.octave(), 0);
assert_eq!(note.key(), 61);

let low = NoteSimplified::from_key(50, NoteLength::Quarter);
assert_eq!(low.octave(), -1);
assert_eq!(low.to_byte(), 0b0101_0010);
```
"#]

use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Key of middle C, the reference octave for degree encoding
pub const MIDDLE_C: u8 = 60;

const DEGREE_OFFSETS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[doc = r#"
The pitch class of a MIDI key.

# Example
```rust
# use midiscore::prelude::*;
let key = Key::from_key_number(63);
assert_eq!(key, Key::DSharp);
assert_eq!(key.scale_degree(), (2, true));
```
"#]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    /// Returns an array beginning with [`Key::C`] to [`Key::B`]
    pub const fn all() -> [Key; 12] {
        use Key::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    }

    /// Identify the pitch class of a key number
    #[inline]
    pub const fn from_key_number(key: u8) -> Self {
        Self::all()[(key % 12) as usize]
    }

    /// Returns true if the key is a black key
    #[inline]
    pub const fn is_sharp(&self) -> bool {
        use Key::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }

    /// The scale degree (1 to 7) and sharp flag in C major
    pub const fn scale_degree(&self) -> (u8, bool) {
        use Key::*;
        let degree = match self {
            C | CSharp => 1,
            D | DSharp => 2,
            E => 3,
            F | FSharp => 4,
            G | GSharp => 5,
            A | ASharp => 6,
            B => 7,
        };
        (degree, self.is_sharp())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Key::*;
        let name = match self {
            C => "C",
            CSharp => "C#/Db",
            D => "D",
            DSharp => "D#/Eb",
            E => "E",
            F => "F",
            FSharp => "F#/Gb",
            G => "G",
            GSharp => "G#/Ab",
            A => "A",
            ASharp => "A#/Bb",
            B => "B",
        };
        f.pad(name)
    }
}

#[doc = r#"
The length class of a note.

The first four fit the 2-bit length field. [`NoteLength::Whole`] needs the
`len2` bit of the full [`Note`]; a [`NoteSimplified`] stores it as a half.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NoteLength {
    /// 1/2
    Half = 0,
    /// 1/4
    Quarter = 1,
    /// 1/8
    Eighth = 2,
    /// 1/16
    Sixteenth = 3,
    /// 1/1
    Whole = 4,
}

impl NoteLength {
    const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Half,
            1 => Self::Quarter,
            2 => Self::Eighth,
            _ => Self::Sixteenth,
        }
    }

    const fn bits(self) -> u8 {
        self as u8 & 0x03
    }
}

// (oct2, octaves) for octave offsets -3..=4
const OCTAVE_CODES: [(bool, u8); 8] = [
    (true, 3),
    (true, 2),
    (false, 1),
    (false, 0),
    (false, 3),
    (false, 2),
    (true, 1),
    (true, 0),
];

// octaves for offsets -1..=2
const SIMPLIFIED_OCTAVE_CODES: [u8; 4] = [1, 0, 3, 2];

const fn full_octave_offset(oct2: bool, octaves: u8) -> i8 {
    match (oct2, octaves & 0x03) {
        (false, 0) => 0,
        (false, 1) => -1,
        (false, 2) => 2,
        (false, 3) => 1,
        (true, 0) => 4,
        (true, 1) => 3,
        (true, 2) => -2,
        _ => -3,
    }
}

const fn simplified_octave_offset(octaves: u8) -> i8 {
    let octaves = (octaves & 0x03) as i8;
    if octaves & 0x02 != 0 {
        4 - octaves
    } else {
        -octaves
    }
}

const fn key_from_parts(degree: u8, sharp: bool, octave: i8) -> u8 {
    if degree == 0 || degree > 7 {
        return 0;
    }
    let key = MIDDLE_C as i16
        + DEGREE_OFFSETS[(degree - 1) as usize] as i16
        + sharp as i16
        + octave as i16 * 12;
    key as u8
}

// degree, sharp, length, octaves
const fn pack_low(degree: u8, sharp: bool, length: u8, octaves: u8) -> u8 {
    (degree & 0x07) | (sharp as u8) << 3 | (length & 0x03) << 4 | (octaves & 0x03) << 6
}

#[doc = r#"
A note in the full, two byte numbered notation encoding.

Keys 24 to 107 are representable. Anything else encodes as a rest with all
fields zero. The expression and dynamics fields are carried through
untouched but never set by the codec.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note([u8; 2]);

impl Note {
    /// Lowest representable key
    pub const MIN_KEY: u8 = 24;
    /// One past the highest representable key
    pub const MAX_KEY: u8 = 108;

    /// A rest
    pub const REST: Self = Self([0; 2]);

    /// Encode a MIDI key
    pub const fn from_key(key: u8, length: NoteLength, dot: bool) -> Self {
        if key < Self::MIN_KEY || key >= Self::MAX_KEY {
            return Self::REST;
        }
        let (degree, sharp) = Key::from_key_number(key).scale_degree();
        let (oct2, octaves) = OCTAVE_CODES[((key - Self::MIN_KEY) / 12) as usize];
        let len2 = matches!(length, NoteLength::Whole);

        Self([
            pack_low(degree, sharp, length.bits(), octaves),
            oct2 as u8 | (len2 as u8) << 1 | (dot as u8) << 2,
        ])
    }

    /// The MIDI key this note stands for, 0 for a rest
    pub const fn key(&self) -> u8 {
        key_from_parts(self.degree(), self.is_sharp(), self.octave())
    }

    /// Unpack from the on-disk bytes
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// The on-disk bytes
    pub const fn to_bytes(&self) -> [u8; 2] {
        self.0
    }

    /// Scale degree 1 to 7, or 0 for a rest
    pub const fn degree(&self) -> u8 {
        self.0[0] & 0x07
    }

    /// True for a rest
    pub const fn is_rest(&self) -> bool {
        self.degree() == 0
    }

    /// The sharp flag
    pub const fn is_sharp(&self) -> bool {
        self.0[0] & 0x08 != 0
    }

    /// The length class
    pub const fn length(&self) -> NoteLength {
        if self.0[1] & 0x02 != 0 {
            NoteLength::Whole
        } else {
            NoteLength::from_bits(self.0[0] >> 4)
        }
    }

    /// Octaves above (positive) or below (negative) the octave of middle C
    pub const fn octave(&self) -> i8 {
        full_octave_offset(self.0[1] & 0x01 != 0, self.0[0] >> 6)
    }

    /// The dot flag, lengthening the note by half
    pub const fn is_dotted(&self) -> bool {
        self.0[1] & 0x04 != 0
    }

    /// The 2-bit expression mark
    pub const fn expression(&self) -> u8 {
        (self.0[1] >> 4) & 0x03
    }

    /// The 2-bit dynamics mark
    pub const fn dynamics(&self) -> u8 {
        self.0[1] >> 6
    }

    /// Drop the fields a [`NoteSimplified`] cannot hold.
    ///
    /// Notes outside the four simplified octaves become rests.
    pub const fn simplify(&self) -> NoteSimplified {
        NoteSimplified::from_key(self.key(), self.length())
    }
}

#[doc = r#"
A note in the one byte numbered notation encoding used by score files.

Keys 48 to 95 are representable. There is no dot, and a whole note is
stored as a half.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteSimplified(u8);

impl NoteSimplified {
    /// Lowest representable key
    pub const MIN_KEY: u8 = 48;
    /// One past the highest representable key
    pub const MAX_KEY: u8 = 96;

    /// A rest
    pub const REST: Self = Self(0);

    /// Encode a MIDI key
    pub const fn from_key(key: u8, length: NoteLength) -> Self {
        if key < Self::MIN_KEY || key >= Self::MAX_KEY {
            return Self::REST;
        }
        let (degree, sharp) = Key::from_key_number(key).scale_degree();
        let octaves = SIMPLIFIED_OCTAVE_CODES[((key - Self::MIN_KEY) / 12) as usize];
        Self(pack_low(degree, sharp, length.bits(), octaves))
    }

    /// The MIDI key this note stands for, 0 for a rest
    pub const fn key(&self) -> u8 {
        key_from_parts(self.degree(), self.is_sharp(), self.octave())
    }

    /// Unpack from the on-disk byte
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// The on-disk byte
    pub const fn to_byte(&self) -> u8 {
        self.0
    }

    /// Scale degree 1 to 7, or 0 for a rest
    pub const fn degree(&self) -> u8 {
        self.0 & 0x07
    }

    /// True for a rest
    pub const fn is_rest(&self) -> bool {
        self.degree() == 0
    }

    /// The sharp flag
    pub const fn is_sharp(&self) -> bool {
        self.0 & 0x08 != 0
    }

    /// The length class, never [`NoteLength::Whole`]
    pub const fn length(&self) -> NoteLength {
        NoteLength::from_bits(self.0 >> 4)
    }

    /// Octaves above (positive) or below (negative) the octave of middle C
    pub const fn octave(&self) -> i8 {
        simplified_octave_offset(self.0 >> 6)
    }
}

impl From<NoteSimplified> for Note {
    fn from(value: NoteSimplified) -> Self {
        Self([value.0, 0])
    }
}

fn write_numbered(
    f: &mut fmt::Formatter<'_>,
    degree: u8,
    sharp: bool,
    octave: i8,
    length: NoteLength,
) -> fmt::Result {
    if sharp {
        f.write_str("#")?;
    }
    write!(f, "{degree}")?;
    let mark = if octave > 0 { "'" } else { "," };
    for _ in 0..octave.unsigned_abs() {
        f.write_str(mark)?;
    }
    let denominator = match length {
        NoteLength::Whole => 1,
        NoteLength::Half => 2,
        NoteLength::Quarter => 4,
        NoteLength::Eighth => 8,
        NoteLength::Sixteenth => 16,
    };
    write!(f, "/{denominator}")
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_numbered(f, self.degree(), self.is_sharp(), self.octave(), self.length())?;
        if self.is_dotted() {
            f.write_str(".")?;
        }
        Ok(())
    }
}

impl fmt::Display for NoteSimplified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_numbered(f, self.degree(), self.is_sharp(), self.octave(), self.length())
    }
}

#[cfg(test)]
const ALL_LENGTHS: [NoteLength; 5] = [
    NoteLength::Half,
    NoteLength::Quarter,
    NoteLength::Eighth,
    NoteLength::Sixteenth,
    NoteLength::Whole,
];

#[test]
fn full_round_trip() {
    for key in Note::MIN_KEY..Note::MAX_KEY {
        for length in ALL_LENGTHS {
            for dot in [false, true] {
                let note = Note::from_key(key, length, dot);
                assert_eq!(note.key(), key, "key {key} {length:?} dot {dot}");
                assert_eq!(note.length(), length);
                assert_eq!(note.is_dotted(), dot);
            }
        }
    }
}

#[test]
fn simplified_round_trip() {
    for key in NoteSimplified::MIN_KEY..NoteSimplified::MAX_KEY {
        for length in ALL_LENGTHS {
            let note = NoteSimplified::from_key(key, length);
            assert_eq!(note.key(), key, "key {key} {length:?}");
        }
    }
}

#[test]
fn out_of_range_is_rest() {
    for key in (0..Note::MIN_KEY).chain(Note::MAX_KEY..=127) {
        let note = Note::from_key(key, NoteLength::Quarter, true);
        assert_eq!(note, Note::REST);
        assert_eq!(note.key(), 0);
    }
    for key in (0..NoteSimplified::MIN_KEY).chain(NoteSimplified::MAX_KEY..=127) {
        let note = NoteSimplified::from_key(key, NoteLength::Quarter);
        assert!(note.is_rest());
        assert_eq!(note.key(), 0);
    }
}

#[test]
fn octave_codes() {
    // (key, oct2, octaves) at the octave boundaries of the full encoding
    let expected = [
        (24, true, 3),
        (36, true, 2),
        (48, false, 1),
        (60, false, 0),
        (72, false, 3),
        (84, false, 2),
        (96, true, 1),
        (107, true, 1),
    ];
    for (key, oct2, octaves) in expected {
        let [low, high] = Note::from_key(key, NoteLength::Half, false).to_bytes();
        assert_eq!(low >> 6, octaves, "key {key}");
        assert_eq!(high & 0x01 != 0, oct2, "key {key}");
    }
    // +4 only decodes
    assert_eq!(Note::from_bytes([0x01, 0x01]).key(), 108);
}

#[test]
fn bit_layout() {
    // G#5, eighth, dotted: degree 5, sharp, octave +1
    let note = Note::from_key(80, NoteLength::Eighth, true);
    assert_eq!(note.to_bytes(), [0b1110_1101, 0b0000_0100]);

    let whole = Note::from_key(60, NoteLength::Whole, false);
    assert_eq!(whole.to_bytes(), [0b0000_0001, 0b0000_0010]);
    assert_eq!(whole.simplify().length(), NoteLength::Half);

    assert_eq!(NoteSimplified::from_key(95, NoteLength::Sixteenth).to_byte(), 0b1011_0111);
}

#[test]
fn marks_are_preserved() {
    let note = Note::from_bytes([0x01, 0b1011_0000]);
    assert_eq!(note.expression(), 0b11);
    assert_eq!(note.dynamics(), 0b10);
    assert_eq!(note.key(), 60);
}

#[test]
fn numbered_display() {
    assert_eq!(Note::from_key(61, NoteLength::Quarter, true).to_string(), "#1/4.");
    assert_eq!(Note::from_key(26, NoteLength::Whole, false).to_string(), "2,,,/1");
    assert_eq!(NoteSimplified::from_key(88, NoteLength::Eighth).to_string(), "3''/8");
    assert_eq!(Key::GSharp.to_string(), "G#/Ab");
}
