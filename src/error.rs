//! Error types for the fingerprinting engine

use std::fmt;

/// Errors that can occur while fingerprinting, indexing or matching
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Input is shorter than a single analysis frame
    InsufficientSamples {
        /// Samples required for one frame
        required: usize,
        /// Samples actually available
        actual: usize,
    },

    /// Invalid input parameters
    InvalidInput(String),

    /// Fingerprint store failed and retries were exhausted
    StoreUnavailable(String),

    /// Processing error (shape mismatch, numeric failure, etc.)
    ProcessingError(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InsufficientSamples { required, actual } => write!(
                f,
                "Insufficient samples: need at least {} for one frame, got {}",
                required, actual
            ),
            EngineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EngineError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            EngineError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
