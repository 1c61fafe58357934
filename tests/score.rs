use midiscore::prelude::*;
use midiscore::reader::encode_vlq;
use pretty_assertions::assert_eq;

fn chunk(magic: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(magic);
    bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
    bytes.extend_from_slice(data);
    bytes
}

fn midi(format: u16, division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut header = Vec::new();
    header.extend_from_slice(&format.to_be_bytes());
    header.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    header.extend_from_slice(&division.to_be_bytes());

    let mut bytes = chunk(b"MThd", &header);
    for events in tracks {
        bytes.extend(chunk(b"MTrk", events));
    }
    bytes
}

/// Note on, then note off after `ticks` (as a one or two byte delta-time)
fn note(events: &mut Vec<u8>, key: u8, ticks: u32) {
    events.extend_from_slice(&[0x00, 0x90, key, 0x50]);
    events.extend(encode_vlq(ticks));
    events.extend_from_slice(&[0x80, key, 0x00]);
}

fn end_of_track(events: &mut Vec<u8>) {
    events.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
}

fn conductor() -> Vec<u8> {
    let mut events = vec![
        0x00, 0xFF, 0x51, 0x03, 0x09, 0x27, 0xC0, // 600000 us per quarter
        0x00, 0xFF, 0x58, 0x04, 0x03, 0x02, 0x18, 0x08, // 3/4
        0x00, 0xFF, 0x59, 0x02, 0x01, 0x00, // G major
    ];
    end_of_track(&mut events);
    events
}

#[test]
fn two_track_conversion() {
    let mut melody = Vec::new();
    note(&mut melody, 60, 480);
    note(&mut melody, 62, 240);
    note(&mut melody, 67, 960);
    note(&mut melody, 73, 1920);
    end_of_track(&mut melody);

    let bytes = midi(1, 480, &[conductor(), melody]);
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    let conversion = ScoreConverter::default().convert(&mut file).unwrap();

    assert_eq!(conversion.tempo.micros_per_quarter_note(), 600_000);
    assert_eq!(conversion.resolution, 480);

    let score = &conversion.score;
    assert_eq!(score.time_signature, ScoreTimeSignature::new(3, 2));
    assert_eq!(score.key_signature, ScoreKeySignature::new(false, 1));
    assert_eq!(
        score.notes,
        vec![
            NoteSimplified::from_key(60, NoteLength::Quarter),
            NoteSimplified::from_key(62, NoteLength::Eighth),
            NoteSimplified::from_key(67, NoteLength::Half),
            // whole notes are stored as halves
            NoteSimplified::from_key(73, NoteLength::Half),
        ]
    );
    let keys: Vec<u8> = score.notes.iter().map(NoteSimplified::key).collect();
    assert_eq!(keys, vec![60, 62, 67, 73]);
}

#[test]
fn single_track_has_no_signatures() {
    let mut melody = vec![0x00, 0xFF, 0x51, 0x03, 0x09, 0x27, 0xC0];
    note(&mut melody, 72, 120);
    end_of_track(&mut melody);

    let bytes = midi(0, 480, &[melody]);
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    let conversion = ScoreConverter::default().convert(&mut file).unwrap();

    assert_eq!(conversion.tempo, Tempo::default());
    assert_eq!(conversion.score.time_signature, ScoreTimeSignature::default());
    assert_eq!(
        conversion.score.notes,
        vec![NoteSimplified::from_key(72, NoteLength::Sixteenth)]
    );
}

#[test]
fn leading_rest_counts_into_the_note() {
    // note on after a quarter rest, note off after another quarter
    let mut melody = vec![0x83, 0x60, 0x90, 0x40, 0x50, 0x83, 0x60, 0x90, 0x40, 0x00];
    end_of_track(&mut melody);

    let bytes = midi(0, 480, &[melody]);
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    let conversion = ScoreConverter::default().convert(&mut file).unwrap();

    assert_eq!(
        conversion.score.notes,
        vec![NoteSimplified::from_key(64, NoteLength::Half)]
    );
}

#[test]
fn out_of_range_keys_become_rests() {
    let mut melody = Vec::new();
    note(&mut melody, 30, 480);
    note(&mut melody, 100, 480);
    end_of_track(&mut melody);

    let bytes = midi(0, 480, &[melody]);
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    let notes = ScoreConverter::default().convert(&mut file).unwrap().score.notes;

    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(NoteSimplified::is_rest));
}

#[test]
fn no_tracks() {
    let bytes = midi(0, 480, &[]);
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    assert!(matches!(
        ScoreConverter::default().convert(&mut file),
        Err(ScoreError::NoTracks)
    ));
}

#[test]
fn broken_melody_track_is_a_read_error() {
    let bytes = midi(1, 480, &[conductor(), vec![0x00, 0x40, 0x40]]);
    let mut file = MidiFile::from_byte_slice(&bytes).unwrap();
    let Err(ScoreError::Read(err)) = ScoreConverter::default().convert(&mut file) else {
        panic!("expected a read error");
    };
    assert_eq!(err.track(), Some(1));
    assert_eq!(
        err.parse(),
        Some(ParseError::Event(EventError::NoRunningStatus(0x40)))
    );
}

#[test]
fn score_file_round_trip_on_disk() {
    let mut melody = Vec::new();
    note(&mut melody, 65, 480);
    note(&mut melody, 66, 960);
    end_of_track(&mut melody);

    let dir = std::env::temp_dir();
    let mid_path = dir.join(format!("midiscore-score-{}.mid", std::process::id()));
    let ssc_path = dir.join(format!("midiscore-score-{}.mid.ssc", std::process::id()));
    std::fs::write(&mid_path, midi(1, 480, &[conductor(), melody])).unwrap();

    let conversion = ScoreConverter::default().convert_file(&mid_path).unwrap();
    conversion
        .score
        .write_to(std::fs::File::create(&ssc_path).unwrap())
        .unwrap();

    let written = std::fs::read(&ssc_path).unwrap();
    assert_eq!(&written[..4], b"MSSC");
    assert_eq!(&written[8..10], &[0, 2]);
    assert_eq!(written.len(), 14);
    assert_eq!(Score::parse(&written).unwrap(), conversion.score);

    std::fs::remove_file(&mid_path).unwrap();
    std::fs::remove_file(&ssc_path).unwrap();
}
