//! Convert the melody of a MIDI file into a numbered notation score file

use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use midiscore::prelude::*;

#[derive(Parser)]
#[command(version, about = "Convert a MIDI melody into a numbered notation score")]
struct Args {
    /// The .mid file to convert
    mid_path: PathBuf,
    /// Where to write the score, `<mid_path>.ssc` by default
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// How far short of a length class a note may fall and still count as it
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let conversion = ScoreConverter::new(args.tolerance)
        .convert_file(&args.mid_path)
        .with_context(|| format!("Failed to convert {}", args.mid_path.display()))?;
    let score = &conversion.score;

    println!(
        "Tempo: {} us per quarter note ({:.1} bpm)",
        conversion.tempo.micros_per_quarter_note(),
        conversion.tempo.bpm()
    );
    println!(
        "Time Signature: {}/{}",
        score.time_signature.upper(),
        score.time_signature.beat_unit()
    );
    for note in &score.notes {
        println!(
            "Note {note}, degree: {}, sharp: {}, length: {:?}, octave: {:+}",
            note.degree(),
            u8::from(note.is_sharp()),
            note.length(),
            note.octave()
        );
    }
    println!("Total count of notes: {}", score.notes.len());

    let output = args.output.unwrap_or_else(|| {
        let mut path = args.mid_path.clone().into_os_string();
        path.push(".ssc");
        path.into()
    });
    let writer = BufWriter::new(
        File::create(&output).with_context(|| format!("Failed to create {}", output.display()))?,
    );
    score
        .write_to(writer)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
