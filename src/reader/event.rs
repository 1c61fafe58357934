use std::io::{Read, Seek};

use super::{ReadResult, Reader, ReaderError, ReaderErrorKind};
use crate::{
    EventError,
    event::{ChannelCommand, ChannelEvent, MetaEvent, RunningStatus, SysExEvent, TrackEvent, TrackMessage},
};

impl<R: Read + Seek> Reader<R> {
    #[doc = r#"
Decode the next event of a track.

`status` is the running status of the track being decoded. A channel
command byte updates it before its data bytes are read, so a truncated
event still leaves the command established. A data byte in status position
reuses the stored command and channel and counts as the first data byte.

The returned event records how many bytes it occupied, delta-time included.
"#]
    pub fn read_event(&mut self, status: &mut RunningStatus) -> ReadResult<TrackEvent> {
        let start = self.buffer_position();
        let (delta_time, _) = self.read_vlq()?;

        let status_position = self.buffer_position();
        let status_byte = self.read_u8()?;

        let message = match status_byte {
            0xFF => {
                let meta_type = self.read_u8()?;
                let len = self.read_u8()?;
                let data = self.read_vec(len as usize)?;
                TrackMessage::Meta(MetaEvent::new(meta_type, data))
            }
            0xF0 | 0xF7 => {
                let (len, _) = self.read_vlq()?;
                let data = self.read_vec(len as usize)?;
                TrackMessage::SysEx(SysExEvent {
                    status: status_byte,
                    data,
                })
            }
            0xF1..=0xFE => {
                return Err(ReaderError::new(
                    status_position,
                    ReaderErrorKind::event(EventError::UnsupportedStatus(status_byte)),
                ));
            }
            _ => {
                let (command, channel, mut data, first_unread) =
                    match ChannelCommand::from_status(status_byte) {
                        Some(command) => {
                            let channel = status_byte & 0x0F;
                            status.set(command, channel);
                            (command, channel, [0; 2], 0)
                        }
                        None => match status.get() {
                            Some((command, channel)) => (command, channel, [status_byte, 0], 1),
                            None => {
                                return Err(ReaderError::new(
                                    status_position,
                                    ReaderErrorKind::event(EventError::NoRunningStatus(status_byte)),
                                ));
                            }
                        },
                    };
                for byte in data.iter_mut().take(command.data_len()).skip(first_unread) {
                    *byte = self.read_u8()?;
                }
                TrackMessage::Channel(ChannelEvent::new(command, channel, data))
            }
        };

        let len = (self.buffer_position() - start) as u32;
        Ok(TrackEvent::new(delta_time, len, message))
    }
}

#[cfg(test)]
fn decode_all(bytes: &[u8]) -> ReadResult<Vec<TrackEvent>> {
    let mut reader = Reader::from_byte_slice(bytes);
    let mut status = RunningStatus::default();
    let mut events = Vec::new();
    while reader.buffer_position() < bytes.len() as u64 {
        events.push(reader.read_event(&mut status)?);
    }
    Ok(events)
}

#[test]
fn running_status_reuses_command_and_channel() {
    use pretty_assertions::assert_eq;
    let events = decode_all(&[0x00, 0x90, 0x3C, 0x40, 0x10, 0x3E, 0x50]).unwrap();

    assert_eq!(
        events,
        vec![
            TrackEvent::new(0, 4, ChannelEvent::new(ChannelCommand::NoteOn, 0, [0x3C, 0x40])),
            TrackEvent::new(16, 3, ChannelEvent::new(ChannelCommand::NoteOn, 0, [0x3E, 0x50])),
        ]
    );
}

#[test]
fn running_status_single_data_byte() {
    let events = decode_all(&[0x00, 0xC5, 0x07, 0x00, 0x09]).unwrap();
    let second = events[1].channel().unwrap();
    assert_eq!(second.command(), ChannelCommand::ProgramChange);
    assert_eq!(second.channel(), 5);
    assert_eq!(second.data(), &[0x09]);
    assert_eq!(events[1].encoded_len(), 2);
}

#[test]
fn data_byte_without_running_status() {
    let err = decode_all(&[0x00, 0x3C, 0x40]).unwrap_err();
    assert_eq!(err.position(), 1);
    assert_eq!(
        err.parse(),
        Some(EventError::NoRunningStatus(0x3C).into())
    );
}

#[test]
fn meta_does_not_touch_running_status() {
    let events = decode_all(&[
        0x00, 0x91, 0x3C, 0x40, // note on, channel 1
        0x00, 0xFF, 0x06, 0x01, b'A', // marker
        0x60, 0x3C, 0x00, // running status note on, velocity 0
    ])
    .unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].meta().unwrap().text().as_deref(), Some("A"));
    assert_eq!(events[2].note_off_key(), Some(0x3C));
    assert_eq!(events[2].channel().unwrap().channel(), 1);
}

#[test]
fn command_sets_status_even_when_truncated() {
    let mut reader = Reader::from_byte_slice(&[0x00, 0x92, 0x3C]);
    let mut status = RunningStatus::default();
    let err = reader.read_event(&mut status).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(status.get(), Some((ChannelCommand::NoteOn, 2)));
}

#[test]
fn tempo_meta_event() {
    let events = decode_all(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]).unwrap();
    let tempo = events[0].meta().unwrap().tempo().unwrap();
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
    assert_eq!(events[0].encoded_len(), 7);
}

#[test]
fn sysex_uses_vlq_length() {
    let events = decode_all(&[0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7]).unwrap();
    let TrackMessage::SysEx(sysex) = events[0].message() else {
        panic!("expected sysex");
    };
    assert_eq!(sysex.data, vec![0x43, 0x12, 0xF7]);
}

#[test]
fn system_common_status_is_rejected() {
    let err = decode_all(&[0x00, 0xF2, 0x00, 0x00]).unwrap_err();
    assert_eq!(err.parse(), Some(EventError::UnsupportedStatus(0xF2).into()));
}
