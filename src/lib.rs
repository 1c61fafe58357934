#![warn(missing_docs)]
#![doc = r#"
Standard MIDI File reading and a numbered-notation note codec.

`midiscore` reads the chunked structure of a Standard MIDI File (SMF), decodes
each track into an ordered list of [`TrackEvent`](crate::event::TrackEvent)s
(delta-times, running status, meta and SysEx payloads), and maps MIDI key
numbers to and from the bit-packed scale-degree notes used by the
[`score`] file format.

# Example
```rust
# use midiscore::prelude::*;
# fn run(bytes: &[u8]) -> ReadResult<()> {
let mut file = MidiFile::from_byte_slice(bytes)?;
let tracks = file.header().num_tracks();

for index in 0..tracks {
    let track = file.track(index)?;
    for event in track.iter() {
        if let Some(key) = event.note_on_key() {
            let note = NoteSimplified::from_key(key, NoteLength::Quarter);
            println!("{} -> {:?}", key, note);
        }
    }
}
# Ok(())
# }
```

# Reference
- <http://www.somascape.org/midi/tech/mfile.html>
- <https://en.wikipedia.org/wiki/Numbered_musical_notation>
"#]

mod error;
pub use error::*;

pub mod event;
pub mod file;
pub mod note;
pub mod reader;
pub mod score;

#[doc = r#"
Commonly used types
"#]
pub mod prelude {
    pub use crate::{
        ChunkError, EventError, HeaderError, ParseError,
        event::*,
        file::*,
        note::*,
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        score::*,
    };
}
