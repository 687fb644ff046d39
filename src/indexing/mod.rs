//! Reference-catalog indexing
//!
//! Runs the fingerprint pipeline over reference recordings and appends the
//! resulting records to the store. Batches parallelize across recordings
//! with rayon; each recording's pipeline is independent and store inserts
//! are append-only, so no coordination is required and one recording's
//! failure never aborts the rest of the batch.

use std::sync::Arc;

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::io::SampleBuffer;
use crate::store::{retry, FingerprintStore};

/// Per-recording indexing summary
#[derive(Debug, Clone)]
pub struct IndexSummary {
    /// Recording id the fingerprints were stored under
    pub song_id: String,
    /// Peaks found in the recording's spectrogram
    pub peaks: usize,
    /// Fingerprint records appended to the store
    pub fingerprints: usize,
}

/// Indexes reference recordings into an injected store
pub struct Indexer {
    store: Arc<dyn FingerprintStore>,
    config: EngineConfig,
}

impl Indexer {
    /// Create an indexer over an injected store handle
    pub fn new(store: Arc<dyn FingerprintStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Fingerprint one recording and append its records to the store
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InsufficientSamples` for inputs shorter than
    /// one analysis frame and `EngineError::StoreUnavailable` when inserts
    /// keep failing after the configured retries.
    pub fn index_recording(
        &self,
        song_id: &str,
        input: &SampleBuffer,
    ) -> Result<IndexSummary, EngineError> {
        if song_id.is_empty() {
            return Err(EngineError::InvalidInput("Empty song id".to_string()));
        }

        let spectrogram = crate::spectral::compute_spectrogram(input, &self.config)?;
        let peaks = crate::peaks::extract_peaks(&spectrogram, &self.config);
        let fingerprints =
            crate::fingerprint::generate_fingerprints(&peaks, Some(song_id), self.config.fan_out);

        for fingerprint in &fingerprints {
            retry::with_backoff(&self.config.store_retry, || {
                self.store
                    .insert(&fingerprint.hash, song_id, fingerprint.anchor_time)
            })?;
        }

        log::info!(
            "Indexed {}: {} peaks, {} fingerprints",
            song_id,
            peaks.len(),
            fingerprints.len()
        );

        Ok(IndexSummary {
            song_id: song_id.to_string(),
            peaks: peaks.len(),
            fingerprints: fingerprints.len(),
        })
    }

    /// Index a batch of recordings in parallel
    ///
    /// Failures are isolated per recording: the returned vector carries one
    /// result per input, in input order.
    pub fn index_batch(
        &self,
        recordings: &[(String, SampleBuffer)],
    ) -> Vec<Result<IndexSummary, EngineError>> {
        let results: Vec<Result<IndexSummary, EngineError>> = recordings
            .par_iter()
            .map(|(song_id, input)| self.index_recording(song_id, input))
            .collect();

        let indexed = results.iter().filter(|r| r.is_ok()).count();
        let total: usize = results
            .iter()
            .filter_map(|r| r.as_ref().ok().map(|s| s.fingerprints))
            .sum();
        log::info!(
            "Indexed batch: {}/{} recordings, {} fingerprints",
            indexed,
            recordings.len(),
            total
        );

        results
    }
}
