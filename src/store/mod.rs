//! Fingerprint store interface
//!
//! The persistent hash → (song, offset) multimap is an external
//! collaborator. The engine talks to it through the [`FingerprintStore`]
//! trait and owns nothing about connections or schemas; implementations
//! are injected into the indexer and matcher at construction.
//!
//! Implementations must enforce a per-operation timeout and surface
//! [`StoreError::Timeout`] when it elapses; no trait method may block
//! indefinitely. Every engine-side call site wraps store operations in the
//! bounded retry/backoff of [`retry::with_backoff`].

use std::fmt;

pub mod memory;
pub mod retry;

pub use memory::MemoryStore;
pub use retry::RetryPolicy;

/// One stored fingerprint record
///
/// Multiple records routinely share a hash; uniqueness is never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Reference recording id
    pub song_id: String,
    /// Anchor time index within that recording
    pub offset: i64,
}

/// Transient store failure
#[derive(Debug, Clone)]
pub enum StoreError {
    /// The store could not be reached or rejected the operation
    Unavailable(String),
    /// The per-operation timeout elapsed
    Timeout(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            StoreError::Timeout(msg) => write!(f, "Store operation timed out: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Keyed multimap from fingerprint hash to (song, offset) records
pub trait FingerprintStore: Send + Sync {
    /// Append a record. Duplicate hashes across songs and offsets are
    /// expected and retained; this is never a constraint violation.
    fn insert(&self, hash: &str, song_id: &str, offset: i64) -> Result<(), StoreError>;

    /// Fetch all records for a hash. A hash that was never inserted yields
    /// an empty vector, not an error. Record order is unspecified.
    fn lookup(&self, hash: &str) -> Result<Vec<StoredRecord>, StoreError>;
}
