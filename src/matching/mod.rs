//! Offset-consistent match resolution
//!
//! Resolves query fingerprints against the store into a ranked
//! identification. Raw hash hits are never trusted on their own: a true
//! match aligns every shared hash on one constant offset delta, while
//! spurious collisions scatter, so songs are scored by the mode of their
//! per-song offset histogram.

pub mod histogram;
pub mod matcher;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use histogram::OffsetHistograms;
pub use matcher::Matcher;

/// One offset-validated identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Identified reference recording
    pub song_id: String,
    /// Constant alignment between query and reference time axes: the
    /// offset delta at the histogram mode
    pub alignment_offset: i64,
    /// Vote count in the dominant histogram bin (never the raw hit count)
    pub score: usize,
    /// True when the lookup cap or cancellation stopped the scan before
    /// the full query fingerprint set was processed
    pub truncated: bool,
}

/// Outcome of a match run
///
/// "No confident match" is a valid result, distinct from an empty success:
/// callers must handle it explicitly rather than treat an empty list as an
/// identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Songs that cleared the confidence threshold, ranked by score
    /// descending
    Matches(Vec<MatchResult>),
    /// No song cleared the confidence threshold
    NoConfidentMatch {
        /// Whether the scan stopped before processing every query hash
        truncated: bool,
    },
}

impl MatchOutcome {
    /// Top-ranked result, if any song cleared the threshold
    pub fn best(&self) -> Option<&MatchResult> {
        match self {
            MatchOutcome::Matches(results) => results.first(),
            MatchOutcome::NoConfidentMatch { .. } => None,
        }
    }

    /// Whether the scan stopped before processing every query hash
    pub fn truncated(&self) -> bool {
        match self {
            MatchOutcome::Matches(results) => results.iter().any(|r| r.truncated),
            MatchOutcome::NoConfidentMatch { truncated } => *truncated,
        }
    }
}

/// Cooperative cancellation flag for an in-flight match
///
/// Once cancelled, the matcher issues no further lookups and returns the
/// partial result marked truncated.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
