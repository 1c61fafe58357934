use super::ChannelCommand;

#[doc = r#"
The running status of one track decode.

MIDI allows consecutive channel events with the same command and channel
to omit the status byte. The last fully specified command and channel is
remembered here, scoped to a single track: every track starts with a fresh
value, and meta or SysEx events leave it untouched.
"#]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunningStatus(Option<(ChannelCommand, u8)>);

impl RunningStatus {
    /// The last command and channel, if one was established
    pub const fn get(&self) -> Option<(ChannelCommand, u8)> {
        self.0
    }
    /// Establish a new running status
    pub fn set(&mut self, command: ChannelCommand, channel: u8) {
        self.0 = Some((command, channel & 0x0F));
    }
}
