use crate::{
    ChunkError,
    event::{RunningStatus, TrackEvent},
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
};

#[doc = r#"
One decoded `MTrk` chunk.

The events are owned by the track in file order. Iterate them with
[`Track::iter`], which can be restarted for another pass without touching
the source again.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    index: u16,
    length: u32,
    events: Vec<TrackEvent>,
}

impl Track {
    #[doc = r#"
Decode the data of a track chunk.

`data` must hold exactly the `length` bytes the chunk declared. Events are
decoded until they account for every one of those bytes. An event that
needs bytes past the end is a [`ChunkError::Framing`] error. Running status
starts out empty for every track.

Error positions are relative to the start of `data`.
"#]
    pub fn decode(index: u16, length: u32, data: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(data);
        let mut status = RunningStatus::default();
        let mut events = Vec::new();

        while reader.buffer_position() < u64::from(length) {
            let start = reader.buffer_position();
            let event = reader.read_event(&mut status).map_err(|e| {
                if e.is_truncated() {
                    ReaderError::new(
                        start,
                        ReaderErrorKind::chunk(ChunkError::Framing {
                            declared: length,
                            overrun_at: start,
                        }),
                    )
                } else {
                    e
                }
            })?;
            events.push(event);
        }

        Ok(Self {
            index,
            length,
            events,
        })
    }

    /// The 0-based position of this track in the file
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// The byte length declared by the chunk header
    pub const fn declared_len(&self) -> u32 {
        self.length
    }

    /// The events in file order
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Number of events in the track
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the chunk held no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// A restartable iterator over the events
    pub fn iter(&self) -> TrackEvents<'_> {
        TrackEvents::new(&self.events)
    }

    /// Take ownership of the events
    pub fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a TrackEvent;
    type IntoIter = TrackEvents<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A forward iterator over a track's events that can be rewound to the first event
#[derive(Debug, Clone)]
pub struct TrackEvents<'a> {
    events: &'a [TrackEvent],
    cursor: usize,
}

impl<'a> TrackEvents<'a> {
    fn new(events: &'a [TrackEvent]) -> Self {
        Self { events, cursor: 0 }
    }

    /// True if [`next`](Iterator::next) would yield an event
    pub fn has_next(&self) -> bool {
        self.cursor < self.events.len()
    }

    /// Go back to the first event
    pub fn restart(&mut self) {
        self.cursor = 0;
    }
}

impl<'a> Iterator for TrackEvents<'a> {
    type Item = &'a TrackEvent;
    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.get(self.cursor)?;
        self.cursor += 1;
        Some(event)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.events.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrackEvents<'_> {}

#[test]
fn decodes_to_declared_length() {
    let data = [
        0x00, 0x90, 0x3C, 0x40, // note on
        0x60, 0x80, 0x3C, 0x00, // note off
        0x00, 0xFF, 0x2F, 0x00, // end of track
    ];
    let track = Track::decode(0, data.len() as u32, &data).unwrap();
    assert_eq!(track.len(), 3);
    assert!(track.events()[2].meta().unwrap().is_end_of_track());
    let consumed: u32 = track.iter().map(TrackEvent::encoded_len).sum();
    assert_eq!(consumed, track.declared_len());
}

#[test]
fn overrun_is_a_framing_error() {
    let data = [0x00, 0x90, 0x3C, 0x40, 0x60, 0x80, 0x3C];
    let err = Track::decode(3, data.len() as u32, &data).unwrap_err();
    assert_eq!(
        err.parse(),
        Some(
            ChunkError::Framing {
                declared: 7,
                overrun_at: 4
            }
            .into()
        )
    );
    assert_eq!(err.position(), 4);
}

#[test]
fn empty_track() {
    let track = Track::decode(1, 0, &[]).unwrap();
    assert!(track.is_empty());
    assert!(!track.iter().has_next());
}

#[test]
fn iterator_restarts() {
    let data = [0x00, 0xC0, 0x05, 0x10, 0x06];
    let track = Track::decode(0, data.len() as u32, &data).unwrap();
    let mut iter = track.iter();
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.by_ref().count(), 2);
    assert!(!iter.has_next());

    iter.restart();
    assert!(iter.has_next());
    assert_eq!(iter.next().map(TrackEvent::delta_time), Some(0));
    assert_eq!(iter.next().map(TrackEvent::delta_time), Some(0x10));
}
