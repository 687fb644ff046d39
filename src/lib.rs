//! # Waveprint
//!
//! An audio content-identification engine: finds the reference recording
//! (and the time offset within it) that matches a short audio query, by
//! content rather than metadata.
//!
//! ## Features
//!
//! - **Spectral fingerprinting**: log-power spectrogram → morphological
//!   peak picking → combinatorial 80-bit pair hashes
//! - **Offset-consistent matching**: per-song offset histograms with mode
//!   voting separate true matches from spurious hash collisions
//! - **Pluggable storage**: the fingerprint index is an injected
//!   [`FingerprintStore`] trait object with bounded retry and backoff
//! - **Batch indexing**: recordings fingerprint independently across a
//!   rayon worker pool with per-recording failure isolation
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use waveprint::{EngineConfig, Indexer, Matcher, MemoryStore, SampleBuffer};
//!
//! let config = EngineConfig::default();
//! let store = Arc::new(MemoryStore::new());
//!
//! // Index a reference recording (mono samples from a decoding collaborator)
//! let reference = SampleBuffer::new(vec![0.0f32; 44100 * 30], 44100)?;
//! let indexer = Indexer::new(store.clone(), config.clone());
//! indexer.index_recording("my-song", &reference)?;
//!
//! // Identify a query clip
//! let clip = SampleBuffer::new(vec![0.0f32; 44100 * 5], 44100)?;
//! let matcher = Matcher::new(store, config);
//! match matcher.match_samples(&clip)? {
//!     waveprint::MatchOutcome::Matches(results) => {
//!         println!("{} at offset {}", results[0].song_id, results[0].alignment_offset);
//!     }
//!     waveprint::MatchOutcome::NoConfidentMatch { .. } => println!("no confident match"),
//! }
//! # Ok::<(), waveprint::EngineError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Samples → Spectrogram → Peaks → Fingerprints → Store.insert   (indexing)
//!                                             ↘ Matcher.match → ranked result
//! ```
//!
//! Audio decoding, capture and store persistence are external
//! collaborators; the engine consumes mono sample buffers and a
//! [`FingerprintStore`] handle.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod indexing;
pub mod io;
pub mod matching;
pub mod peaks;
pub mod spectral;
pub mod store;

// Re-export main types
pub use config::EngineConfig;
pub use error::EngineError;
pub use fingerprint::Fingerprint;
pub use indexing::{IndexSummary, Indexer};
pub use io::SampleBuffer;
pub use matching::{CancellationToken, MatchOutcome, MatchResult, Matcher};
pub use peaks::Peak;
pub use spectral::Spectrogram;
pub use store::{FingerprintStore, MemoryStore, RetryPolicy, StoreError, StoredRecord};

/// Run the fingerprint pipeline on a query buffer
///
/// Computes the spectrogram, extracts peaks and hashes peak pairs. The
/// resulting fingerprints carry no song id; hand them to
/// [`Matcher::match_fingerprints`], or use [`Indexer`] when indexing a
/// reference recording.
///
/// # Errors
///
/// Returns `EngineError::InsufficientSamples` if the buffer is shorter
/// than one analysis frame.
pub fn fingerprint_samples(
    input: &SampleBuffer,
    config: &EngineConfig,
) -> Result<Vec<Fingerprint>, EngineError> {
    let spectrogram = spectral::compute_spectrogram(input, config)?;
    let peaks = peaks::extract_peaks(&spectrogram, config);
    Ok(fingerprint::generate_fingerprints(
        &peaks,
        None,
        config.fan_out,
    ))
}
