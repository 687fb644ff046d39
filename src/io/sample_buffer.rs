//! Mono sample buffer handed to the engine by decoding collaborators

use crate::error::EngineError;

/// Immutable mono sample sequence with a known sample rate
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a sample buffer
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if `sample_rate` is zero or
    /// `samples` is empty.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, EngineError> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidInput("Invalid sample rate: 0".to_string()));
        }
        if samples.is_empty() {
            return Err(EngineError::InvalidInput("Empty sample buffer".to_string()));
        }
        Ok(Self { samples, sample_rate })
    }

    /// Samples, in order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer is empty (never true for a constructed buffer)
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_sample_rate() {
        let result = SampleBuffer::new(vec![0.0; 100], 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_samples() {
        let result = SampleBuffer::new(vec![], 44100);
        assert!(result.is_err());
    }

    #[test]
    fn test_duration() {
        let buffer = SampleBuffer::new(vec![0.0; 22050], 44100).unwrap();
        assert!((buffer.duration_seconds() - 0.5).abs() < 1e-6);
    }
}
