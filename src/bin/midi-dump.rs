//! Print the header and the events of a MIDI file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use midiscore::prelude::*;

#[derive(Parser)]
#[command(version, about = "Dump the header and events of a Standard MIDI File")]
struct Args {
    /// The .mid file to read
    mid_path: PathBuf,
    /// Only dump this track (0-based)
    #[arg(short, long)]
    track: Option<u16>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut file = MidiFile::open(&args.mid_path)
        .with_context(|| format!("Failed to open {}", args.mid_path.display()))?;
    println!("{}", file.header());

    let tracks = match args.track {
        Some(index) => index..index.saturating_add(1),
        None => 0..file.header().num_tracks(),
    };
    for index in tracks {
        let track = file
            .track(index)
            .with_context(|| format!("Failed to read track {index}"))?;
        dump_track(&track);
    }
    Ok(())
}

fn dump_track(track: &Track) {
    println!(
        "== track {} ({} bytes, {} events) ==",
        track.index(),
        track.declared_len(),
        track.len()
    );
    for event in track {
        println!("{event}");
    }
}
