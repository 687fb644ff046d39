//! Demo: index a directory of WAV files, then identify a query clip
//!
//! Usage:
//!   cargo run --release --bin identify -- [--json] <library_dir> <query.wav>
//!
//! Notes:
//! - Recordings are indexed in parallel (batch-level rayon pool).
//! - The store is in-memory and rebuilt per run; this binary is a demo of
//!   the engine, not a catalog service.

use std::env;
use std::process;
use std::sync::Arc;

use waveprint::{EngineConfig, Indexer, MatchOutcome, Matcher, MemoryStore, SampleBuffer};

/// Load a WAV file as a mono sample buffer
fn load_wav(path: &str) -> Result<SampleBuffer, Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels as usize;
    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok(SampleBuffer::new(mono, spec.sample_rate)?)
}

fn song_id_from_path(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn main() {
    env_logger::init();

    let mut json = false;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => positional.push(arg),
        }
    }

    if positional.len() != 2 {
        eprintln!("Usage: identify [--json] <library_dir> <query.wav>");
        process::exit(2);
    }
    let (library_dir, query_path) = (&positional[0], &positional[1]);

    let config = EngineConfig::default();
    let store = Arc::new(MemoryStore::new());
    let indexer = Indexer::new(store.clone(), config.clone());

    let mut recordings = Vec::new();
    let entries = match std::fs::read_dir(library_dir) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("Cannot read {}: {}", library_dir, err);
            process::exit(1);
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("wav") {
            continue;
        }
        match load_wav(&path.to_string_lossy()) {
            Ok(buffer) => recordings.push((song_id_from_path(&path), buffer)),
            Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
        }
    }

    if recordings.is_empty() {
        eprintln!("No WAV files found in {}", library_dir);
        process::exit(1);
    }

    let mut total_fingerprints = 0usize;
    for result in indexer.index_batch(&recordings) {
        match result {
            Ok(summary) => {
                total_fingerprints += summary.fingerprints;
                eprintln!(
                    "indexed {}: {} peaks, {} fingerprints",
                    summary.song_id, summary.peaks, summary.fingerprints
                );
            }
            Err(err) => eprintln!("indexing failed: {}", err),
        }
    }
    eprintln!(
        "library ready: {} recordings, {} fingerprints",
        recordings.len(),
        total_fingerprints
    );

    let query = match load_wav(query_path) {
        Ok(buffer) => buffer,
        Err(err) => {
            eprintln!("Cannot load query {}: {}", query_path, err);
            process::exit(1);
        }
    };

    let matcher = Matcher::new(store, config);
    let outcome = match matcher.match_samples(&query) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("Match failed: {}", err);
            process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
        return;
    }

    match outcome {
        MatchOutcome::Matches(results) => {
            for (rank, result) in results.iter().enumerate() {
                println!(
                    "{}. {} (score {}, alignment {}{})",
                    rank + 1,
                    result.song_id,
                    result.score,
                    result.alignment_offset,
                    if result.truncated { ", truncated" } else { "" }
                );
            }
        }
        MatchOutcome::NoConfidentMatch { truncated } => {
            println!(
                "no confident match{}",
                if truncated { " (truncated scan)" } else { "" }
            );
        }
    }
}
