#![doc = r#"
Events decoded from a track chunk

# Layout

Every event in an `MTrk` chunk is a variable-length delta-time followed by
one of:

```text
|-------------------|-----------------------------------------------|
| Channel event     | status (0x8n..0xEn) data1 [data2]             |
| Running status    | data1 [data2]   (status of the previous event)|
| Meta event        | 0xFF type length data...                      |
| SysEx event       | 0xF0|0xF7 vlq-length data...                  |
|-------------------|-----------------------------------------------|
```
"#]

mod channel;
pub use channel::*;

mod meta;
pub use meta::*;

mod running_status;
pub use running_status::*;

use core::fmt;

#[doc = r#"
A single event in a track, with the ticks elapsed since the previous one.

Events are immutable once decoded and belong to the track that produced them.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_time: u32,
    len: u32,
    message: TrackMessage,
}

/// The payload of a [`TrackEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// A channel voice event
    Channel(ChannelEvent),
    /// A meta event (`0xFF`)
    Meta(MetaEvent),
    /// A system exclusive event (`0xF0` or `0xF7`)
    SysEx(SysExEvent),
}

/// A system exclusive event and its verbatim payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExEvent {
    /// `0xF0` for a complete message, `0xF7` for an escape/continuation
    pub status: u8,
    /// The bytes following the length
    pub data: Vec<u8>,
}

impl TrackEvent {
    /// Create an event. `len` is the number of bytes it occupied in the track,
    /// delta-time included.
    pub fn new(delta_time: u32, len: u32, message: impl Into<TrackMessage>) -> Self {
        Self {
            delta_time,
            len,
            message: message.into(),
        }
    }
    /// Ticks since the previous event in the same track
    pub const fn delta_time(&self) -> u32 {
        self.delta_time
    }
    /// The encoded size of this event in bytes
    pub const fn encoded_len(&self) -> u32 {
        self.len
    }
    /// The decoded payload
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }
    /// Returns the channel event, if this is one
    pub const fn channel(&self) -> Option<&ChannelEvent> {
        match &self.message {
            TrackMessage::Channel(c) => Some(c),
            _ => None,
        }
    }
    /// Returns the meta event, if this is one
    pub const fn meta(&self) -> Option<&MetaEvent> {
        match &self.message {
            TrackMessage::Meta(m) => Some(m),
            _ => None,
        }
    }
    /// The key of a sounding Note-On
    pub fn note_on_key(&self) -> Option<u8> {
        self.channel().filter(|c| c.is_note_on()).and_then(ChannelEvent::key)
    }
    /// The key of a Note-Off, or of a Note-On with zero velocity
    pub fn note_off_key(&self) -> Option<u8> {
        self.channel().filter(|c| c.is_note_off()).and_then(ChannelEvent::key)
    }
}

impl From<ChannelEvent> for TrackMessage {
    fn from(value: ChannelEvent) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaEvent> for TrackMessage {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

impl From<SysExEvent> for TrackMessage {
    fn from(value: SysExEvent) -> Self {
        Self::SysEx(value)
    }
}

impl fmt::Display for ChannelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<15} chan: {:2}, data:", self.command(), self.channel())?;
        for byte in self.data() {
            write!(f, " {byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TrackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delta_time: {:5}, ", self.delta_time)?;
        match &self.message {
            TrackMessage::Channel(c) => write!(f, "{c}"),
            TrackMessage::Meta(m) => write!(f, "{m}"),
            TrackMessage::SysEx(s) => write!(f, "SysEx {:#04x}, {} bytes", s.status, s.data.len()),
        }
    }
}

#[test]
fn dump_lines() {
    let note = TrackEvent::new(
        96,
        4,
        ChannelEvent::new(ChannelCommand::NoteOn, 1, [0x3C, 0x40]),
    );
    assert_eq!(
        note.to_string(),
        "delta_time:    96, NoteOn          chan:  1, data: 3c 40"
    );
    assert_eq!(note.note_on_key(), Some(60));
    assert_eq!(note.note_off_key(), None);

    let tempo = TrackEvent::new(0, 7, MetaEvent::new(0x51, [0x07, 0xA1, 0x20]));
    assert_eq!(
        tempo.to_string(),
        "delta_time:     0, Tempo: 500000 us per quarter note"
    );
}
