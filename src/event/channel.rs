use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The command nibble of a channel event status byte.

```text
|------|-----------------|------------|
| Cmd  | Event           | Data bytes |
|------|-----------------|------------|
| 0x8  | Note Off        | key, vel   |
| 0x9  | Note On         | key, vel   |
| 0xA  | After Touch     | key, value |
| 0xB  | Control Change  | ctrl, value|
| 0xC  | Program Change  | program    |
| 0xD  | Channel Pressure| value      |
| 0xE  | Pitch Wheel     | lsb, msb   |
|------|-----------------|------------|
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ChannelCommand {
    /// Key released
    NoteOff = 0x8,
    /// Key pressed
    NoteOn = 0x9,
    /// Polyphonic key pressure
    AfterTouch = 0xA,
    /// Controller value change
    ControlChange = 0xB,
    /// Instrument change
    ProgramChange = 0xC,
    /// Pressure applied to the whole channel
    ChannelPressure = 0xD,
    /// Pitch bend
    PitchWheel = 0xE,
}

impl ChannelCommand {
    /// Extract the command from a status byte.
    ///
    /// Returns `None` for data bytes and for `0xF_` system statuses.
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status >> 4).ok()
    }

    /// How many data bytes follow the status byte
    pub const fn data_len(self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }

    /// The short name used in textual dumps
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoteOff => "NoteOff",
            Self::NoteOn => "NoteOn",
            Self::AfterTouch => "AfterTouch",
            Self::ControlChange => "ControlChange",
            Self::ProgramChange => "ProgramChange",
            Self::ChannelPressure => "ChannelPressure",
            Self::PitchWheel => "PitchWheel",
        }
    }
}

impl fmt::Display for ChannelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A decoded channel (voice) event.
///
/// Holds one or two data bytes depending on its [`ChannelCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    command: ChannelCommand,
    channel: u8,
    data: [u8; 2],
}

impl ChannelEvent {
    /// Create a channel event. Bytes past the command's data length are ignored.
    pub const fn new(command: ChannelCommand, channel: u8, data: [u8; 2]) -> Self {
        let data = match command.data_len() {
            1 => [data[0], 0],
            _ => data,
        };
        Self {
            command,
            channel: channel & 0x0F,
            data,
        }
    }
    /// The command nibble
    pub const fn command(&self) -> ChannelCommand {
        self.command
    }
    /// The channel, `0..16`
    pub const fn channel(&self) -> u8 {
        self.channel
    }
    /// The data bytes actually carried by this event
    pub fn data(&self) -> &[u8] {
        &self.data[..self.command.data_len()]
    }
    /// The status byte that would introduce this event
    pub fn status(&self) -> u8 {
        (u8::from(self.command) << 4) | self.channel
    }
    /// The key of a note or after touch event
    pub const fn key(&self) -> Option<u8> {
        match self.command {
            ChannelCommand::NoteOff | ChannelCommand::NoteOn | ChannelCommand::AfterTouch => {
                Some(self.data[0])
            }
            _ => None,
        }
    }
    /// The velocity of a note event
    pub const fn velocity(&self) -> Option<u8> {
        match self.command {
            ChannelCommand::NoteOff | ChannelCommand::NoteOn => Some(self.data[1]),
            _ => None,
        }
    }
    /// True for a Note-Off, or a Note-On with zero velocity
    pub const fn is_note_off(&self) -> bool {
        match self.command {
            ChannelCommand::NoteOff => true,
            ChannelCommand::NoteOn => self.data[1] == 0,
            _ => false,
        }
    }
    /// True for a Note-On with non-zero velocity
    pub const fn is_note_on(&self) -> bool {
        matches!(self.command, ChannelCommand::NoteOn) && self.data[1] != 0
    }
}

#[test]
fn command_from_status() {
    assert_eq!(ChannelCommand::from_status(0x93), Some(ChannelCommand::NoteOn));
    assert_eq!(ChannelCommand::from_status(0xEF), Some(ChannelCommand::PitchWheel));
    assert_eq!(ChannelCommand::from_status(0x3C), None);
    assert_eq!(ChannelCommand::from_status(0xF0), None);
}

#[test]
fn single_byte_commands_drop_the_second_byte() {
    let event = ChannelEvent::new(ChannelCommand::ProgramChange, 0x12, [5, 99]);
    assert_eq!(event.data(), &[5]);
    assert_eq!(event.channel(), 2);
    assert_eq!(event.status(), 0xC2);
}

#[test]
fn zero_velocity_note_on_is_a_note_off() {
    let event = ChannelEvent::new(ChannelCommand::NoteOn, 0, [60, 0]);
    assert!(event.is_note_off());
    assert!(!event.is_note_on());
}
