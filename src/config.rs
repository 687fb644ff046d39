//! Configuration parameters for the fingerprinting engine

use crate::store::retry::RetryPolicy;

/// Engine configuration parameters
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // Spectrogram
    /// Hop between successive analysis frames in milliseconds (default: 10.0)
    pub stride_ms: f32,

    /// Analysis window length in milliseconds (default: 20.0)
    pub window_ms: f32,

    /// Maximum frequency retained in the spectrogram in Hz (default: 20000.0)
    /// Bins whose center frequency exceeds this are discarded
    pub max_freq: f32,

    /// Floor added to the power spectrum before log compression (default: 1e-14)
    pub eps: f32,

    // Peak extraction
    /// Dilation iterations applied to the base connectivity shape
    /// (default: 20). The resulting neighborhood radius per axis equals
    /// the iteration count
    pub neighborhood_iterations: usize,

    // Fingerprinting
    /// Lookahead window for anchor/target peak pairing (default: 20)
    pub fan_out: usize,

    // Matching
    /// Minimum mode count a song must reach to be reported (default: 5)
    pub confidence_threshold: usize,

    /// Maximum number of query hashes looked up per match (default: 1000).
    /// Hitting the cap marks the result truncated
    pub max_lookups: usize,

    // Store access
    /// Retry policy applied to every store operation
    pub store_retry: RetryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stride_ms: 10.0,
            window_ms: 20.0,
            max_freq: 20000.0,
            eps: 1e-14,
            neighborhood_iterations: 20,
            fan_out: 20,
            confidence_threshold: 5,
            max_lookups: 1000,
            store_retry: RetryPolicy::default(),
        }
    }
}
