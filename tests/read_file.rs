use midiscore::prelude::*;
use pretty_assertions::assert_eq;

/// Header chunk with 6 bytes of data
fn header(format: u16, tracks: u16, division: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

/// Track chunk whose declared length matches `events`
fn track(events: &[u8]) -> Vec<u8> {
    track_declaring(events.len() as u32, events)
}

fn track_declaring(length: u32, events: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&length.to_be_bytes());
    bytes.extend_from_slice(events);
    bytes
}

/// A track holding a single marker with `text`, then end of track
fn marker_track(text: &str) -> Vec<u8> {
    let mut events = vec![0x00, 0xFF, 0x06, text.len() as u8];
    events.extend_from_slice(text.as_bytes());
    events.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    track(&events)
}

fn marker(track: &Track) -> String {
    track.events()[0].meta().and_then(MetaEvent::text).unwrap_or_default()
}

fn three_track_file() -> Vec<u8> {
    [
        header(1, 3, 480),
        marker_track("zero"),
        marker_track("one"),
        marker_track("two"),
    ]
    .concat()
}

#[test]
fn parses_header() {
    let bytes = [header(1, 2, 480), marker_track("a"), marker_track("b")].concat();
    let file = MidiFile::from_byte_slice(&bytes).unwrap();

    let header = file.header();
    assert_eq!(header.format(), 1);
    assert_eq!(header.num_tracks(), 2);
    assert_eq!(header.resolution(), 480);
    assert_eq!(header.timing(), Ok(Timing::TicksPerQuarterNote(480)));
}

#[test]
fn header_padding_is_skipped() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0, 0, 0, 10]);
    bytes.extend_from_slice(&[0, 0, 0, 1, 0, 96]);
    bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    bytes.extend(marker_track("only"));

    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    assert_eq!(marker(&file.track(0).unwrap()), "only");
}

#[test]
fn smpte_file_stays_readable() {
    // -32 is not a frame rate
    let bytes = [header(0, 1, 0xE028), marker_track("x")].concat();
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    assert_eq!(
        file.header().timing(),
        Err(HeaderError::UnsupportedDivision(-32))
    );
    assert_eq!(file.header().resolution(), 0);
    assert_eq!(file.track(0).unwrap().len(), 2);
}

#[test]
fn tracks_in_any_order() {
    let bytes = three_track_file();
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();

    assert_eq!(marker(&file.track(2).unwrap()), "two");
    assert_eq!(marker(&file.track(0).unwrap()), "zero");
    assert_eq!(marker(&file.track(1).unwrap()), "one");
    assert_eq!(marker(&file.track(1).unwrap()), "one");
    assert_eq!(marker(&file.track(2).unwrap()), "two");

    let all: Vec<String> = file.tracks().unwrap().iter().map(marker).collect();
    assert_eq!(all, vec!["zero", "one", "two"]);
}

#[test]
fn declared_length_too_short_is_framing() {
    let events = [0x00, 0x90, 0x3C, 0x40, 0x60, 0x80, 0x3C, 0x00];
    let bytes = [header(0, 1, 96), track_declaring(6, &events)].concat();
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();

    let err = file.track(0).unwrap_err();
    assert_eq!(
        err.parse(),
        Some(ParseError::Chunk(ChunkError::Framing {
            declared: 6,
            overrun_at: 4
        }))
    );
    assert_eq!(err.track(), Some(0));
    // 14 header bytes, 8 chunk header bytes, 4 bytes of the first event
    assert_eq!(err.position(), 26);
}

#[test]
fn missing_track_data_is_truncated() {
    let bytes = [header(0, 1, 96), track_declaring(40, &[0x00, 0xFF, 0x2F, 0x00])].concat();
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();

    let err = file.track(0).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.track(), Some(0));
}

#[test]
fn skipping_a_short_track_is_truncated() {
    let bytes = [header(1, 2, 96), track_declaring(100, &[0x00, 0xFF, 0x2F, 0x00])].concat();
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();

    let err = file.track(1).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.track(), Some(0));
    // data of track 0 starts after the 14 header bytes and its chunk header
    assert_eq!(err.position(), 22);
}

#[test]
fn huge_declared_length_is_truncated() {
    let bytes = [header(0, 1, 96), track_declaring(0xFFFF_FFF0, &[0x00, 0xFF, 0x2F, 0x00])].concat();
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();

    let err = file.track(0).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.track(), Some(0));
    assert_eq!(err.position(), 22);
}

#[test]
fn truncated_header() {
    let err = MidiFile::from_byte_slice(b"MThd\x00\x00").err().unwrap();
    assert!(err.is_truncated());
}

#[test]
fn bad_track_magic() {
    let mut bytes = [header(1, 2, 96), marker_track("fine")].concat();
    bytes.extend_from_slice(b"XTrk\x00\x00\x00\x00");
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();

    assert_eq!(marker(&file.track(0).unwrap()), "fine");
    let err = file.track(1).unwrap_err();
    assert_eq!(
        err.parse(),
        Some(ParseError::Chunk(ChunkError::BadMagic {
            expected: *b"MTrk",
            found: *b"XTrk"
        }))
    );
    assert_eq!(err.track(), Some(1));
}

#[test]
fn bad_header_magic() {
    let bytes = [b"RIFF".as_slice(), &[0, 0, 0, 6, 0, 0, 0, 1, 0, 96]].concat();
    let err = MidiFile::from_byte_slice(&bytes).err().unwrap();
    assert_eq!(err.position(), 0);
    assert_eq!(err.track(), None);
    assert!(matches!(
        err.parse(),
        Some(ParseError::Chunk(ChunkError::BadMagic { .. }))
    ));
}

#[test]
fn running_status_does_not_cross_tracks() {
    let first = track(&[0x00, 0x90, 0x3C, 0x40, 0x00, 0xFF, 0x2F, 0x00]);
    let second = track(&[0x00, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00]);
    let bytes = [header(1, 2, 96), first, second].concat();
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();

    file.track(0).unwrap();
    let err = file.track(1).unwrap_err();
    assert_eq!(
        err.parse(),
        Some(ParseError::Event(EventError::NoRunningStatus(0x3C)))
    );
    assert_eq!(err.track(), Some(1));
}

#[test]
fn event_stream_restarts() {
    let events = [
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo
        0x00, 0x90, 0x3C, 0x40, // note on
        0x60, 0x3C, 0x00, // running status, velocity 0
        0x00, 0xFF, 0x2F, 0x00, // end of track
    ];
    let bytes = [header(0, 1, 96), track(&events)].concat();
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    let track = file.track(0).unwrap();

    let mut iter = track.iter();
    let first_pass: Vec<u32> = iter.by_ref().map(TrackEvent::delta_time).collect();
    assert!(!iter.has_next());
    iter.restart();
    let second_pass: Vec<u32> = iter.map(TrackEvent::delta_time).collect();

    assert_eq!(first_pass, vec![0, 0, 0x60, 0]);
    assert_eq!(first_pass, second_pass);
    assert_eq!(
        track.events()[0].meta().and_then(MetaEvent::tempo),
        Some(Tempo::new(500_000))
    );
    assert_eq!(track.events()[2].note_off_key(), Some(0x3C));
}

#[test]
fn open_from_disk() {
    let path = std::env::temp_dir().join(format!("midiscore-open-{}.mid", std::process::id()));
    std::fs::write(&path, three_track_file()).unwrap();

    let mut file = MidiFile::open(&path).unwrap();
    assert_eq!(file.header().num_tracks(), 3);
    assert_eq!(marker(&file.track(1).unwrap()), "one");
    drop(file);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_not_found() {
    let path = std::env::temp_dir().join("midiscore-does-not-exist.mid");
    let err = MidiFile::open(path).err().unwrap();
    assert!(err.is_not_found());
}
