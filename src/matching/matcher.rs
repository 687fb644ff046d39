//! Store-backed matcher
//!
//! # Algorithm
//!
//! 1. Take at most `max_lookups` query fingerprints (explicit counter
//!    comparison; hitting the cap marks the outcome truncated)
//! 2. Fan lookups out across the rayon pool; every store hit votes
//!    `(song, stored_offset - query_offset)` into a worker-local
//!    histogram set
//! 3. Reduce worker histograms pairwise into one accumulation
//! 4. Score each song by its histogram mode, rank descending, and report
//!    only songs at or above the confidence threshold

use std::cmp::Reverse;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fingerprint::Fingerprint;
use crate::io::SampleBuffer;
use crate::matching::{CancellationToken, MatchOutcome, MatchResult, OffsetHistograms};
use crate::store::{retry, FingerprintStore};

/// Resolves query fingerprints into ranked, offset-validated matches
pub struct Matcher {
    store: Arc<dyn FingerprintStore>,
    config: EngineConfig,
}

impl Matcher {
    /// Create a matcher over an injected store handle
    pub fn new(store: Arc<dyn FingerprintStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Fingerprint a query buffer and match it against the store
    pub fn match_samples(&self, input: &SampleBuffer) -> Result<MatchOutcome, EngineError> {
        let fingerprints = crate::fingerprint_samples(input, &self.config)?;
        self.match_fingerprints(&fingerprints)
    }

    /// Match pre-computed query fingerprints against the store
    pub fn match_fingerprints(
        &self,
        fingerprints: &[Fingerprint],
    ) -> Result<MatchOutcome, EngineError> {
        self.match_with_cancellation(fingerprints, &CancellationToken::new())
    }

    /// Match with cooperative cancellation
    ///
    /// Once `token` is cancelled no further lookups are issued; whatever
    /// votes were accumulated so far are resolved and returned truncated.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StoreUnavailable` when a lookup keeps failing
    /// after the configured retries.
    pub fn match_with_cancellation(
        &self,
        fingerprints: &[Fingerprint],
        token: &CancellationToken,
    ) -> Result<MatchOutcome, EngineError> {
        let cap = self.config.max_lookups;
        let scanned = &fingerprints[..fingerprints.len().min(cap)];
        let capped = scanned.len() < fingerprints.len();

        log::debug!(
            "Matching {} query fingerprints ({} scanned, cap {})",
            fingerprints.len(),
            scanned.len(),
            cap
        );

        let processed = AtomicUsize::new(0);

        let histograms = scanned
            .par_iter()
            .try_fold(OffsetHistograms::new, |mut acc, fingerprint| {
                if token.is_cancelled() {
                    return Ok(acc);
                }

                let records = retry::with_backoff(&self.config.store_retry, || {
                    self.store.lookup(&fingerprint.hash)
                })?;
                processed.fetch_add(1, Ordering::Relaxed);

                for record in records {
                    if record.song_id.is_empty() {
                        log::warn!(
                            "Skipping malformed stored record for hash {}",
                            fingerprint.hash
                        );
                        continue;
                    }
                    acc.vote(&record.song_id, record.offset - fingerprint.anchor_time);
                }

                Ok(acc)
            })
            .try_reduce(OffsetHistograms::new, |a, b| Ok(a.merge(b)))?;

        let truncated = capped || processed.load(Ordering::Relaxed) < scanned.len();

        let mut results: Vec<MatchResult> = histograms
            .best_alignments()
            .into_iter()
            .filter(|&(_, _, score)| score >= self.config.confidence_threshold)
            .map(|(song_id, alignment_offset, score)| MatchResult {
                song_id,
                alignment_offset,
                score,
                truncated,
            })
            .collect();

        results.sort_by_key(|result| (Reverse(result.score), result.song_id.clone()));

        if results.is_empty() {
            log::debug!("No song cleared the confidence threshold");
            return Ok(MatchOutcome::NoConfidentMatch { truncated });
        }

        Ok(MatchOutcome::Matches(results))
    }
}
