//! Time-frequency analysis
//!
//! Turns a sample buffer into a log-compressed power spectrogram:
//! framing → Hann windowing → FFT → power spectral density → log floor.

pub mod spectrogram;

pub use spectrogram::{compute_spectrogram, Spectrogram};
