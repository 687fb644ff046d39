//! Log-power spectrogram computation
//!
//! # Algorithm
//!
//! 1. Frame the input at a fixed hop, dropping the tail samples that do not
//!    fill a whole frame (`(len - frame_length) mod hop_length` samples)
//! 2. Weight each frame with a Hann window to suppress spectral leakage
//! 3. Forward FFT per frame, keeping the non-negative frequency bins
//! 4. Scale squared magnitudes to power spectral density:
//!    interior bins ×(2/scale), DC and Nyquist ×(1/scale), where
//!    `scale = sum(window²) * sample_rate`
//! 5. Discard bins whose center frequency exceeds `max_freq`
//! 6. Log-compress: `value = ln(power + eps)`
//!
//! Each frame is copied into its own buffer before windowing; frames never
//! alias the input or each other.
//!
//! The computation is pure and deterministic: identical input yields a
//! bit-identical grid.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::io::SampleBuffer;

/// Log-compressed power spectrogram, indexed `[frequency_bin][time_frame]`
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    values: Vec<Vec<f32>>,
    bin_hz: f32,
}

impl Spectrogram {
    /// Number of frequency bins
    pub fn n_bins(&self) -> usize {
        self.values.len()
    }

    /// Number of time frames
    pub fn n_frames(&self) -> usize {
        self.values.first().map_or(0, |row| row.len())
    }

    /// Value at `(bin, frame)`
    pub fn value(&self, bin: usize, frame: usize) -> f32 {
        self.values[bin][frame]
    }

    /// Rows of the grid, one per frequency bin
    pub fn rows(&self) -> &[Vec<f32>] {
        &self.values
    }

    /// Center frequency of `bin` in Hz, strictly increasing in the index
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_hz
    }

    /// Mean value over the whole grid
    pub fn mean(&self) -> f32 {
        let total: f32 = self.values.iter().flatten().sum();
        let count = self.n_bins() * self.n_frames();
        if count == 0 {
            0.0
        } else {
            total / count as f32
        }
    }
}

/// Compute the log-power spectrogram of a sample buffer
///
/// # Arguments
///
/// * `input` - Mono samples with their sample rate
/// * `config` - Engine configuration (`stride_ms`, `window_ms`, `max_freq`,
///   `eps` are read here)
///
/// # Errors
///
/// Returns `EngineError::InsufficientSamples` if the input is shorter than
/// one analysis frame, `EngineError::InvalidInput` for degenerate
/// configuration (non-positive stride, window, `max_freq` or `eps`).
pub fn compute_spectrogram(
    input: &SampleBuffer,
    config: &EngineConfig,
) -> Result<Spectrogram, EngineError> {
    let sample_rate = input.sample_rate();

    if config.stride_ms <= 0.0 || config.window_ms <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "Non-positive frame geometry: stride={} ms, window={} ms",
            config.stride_ms, config.window_ms
        )));
    }
    if config.max_freq <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "Non-positive max frequency: {}",
            config.max_freq
        )));
    }
    if config.eps <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "Non-positive log floor: {}",
            config.eps
        )));
    }

    let frame_length = (config.window_ms * sample_rate as f32 / 1000.0).round() as usize;
    let hop_length = (config.stride_ms * sample_rate as f32 / 1000.0).round() as usize;

    if frame_length < 2 || hop_length == 0 {
        return Err(EngineError::InvalidInput(format!(
            "Degenerate frame geometry: frame_length={}, hop_length={}",
            frame_length, hop_length
        )));
    }

    let samples = input.samples();
    if samples.len() < frame_length {
        return Err(EngineError::InsufficientSamples {
            required: frame_length,
            actual: samples.len(),
        });
    }

    // Drop the tail that does not fill a whole hop-aligned frame
    let truncate = (samples.len() - frame_length) % hop_length;
    let samples = &samples[..samples.len() - truncate];
    let n_frames = (samples.len() - frame_length) / hop_length + 1;

    log::debug!(
        "Computing spectrogram: {} samples at {} Hz, frame={}, hop={}, {} frames",
        samples.len(),
        sample_rate,
        frame_length,
        hop_length,
        n_frames
    );

    let window = hann_window(frame_length);
    let scale: f32 = window.iter().map(|w| w * w).sum::<f32>() * sample_rate as f32;

    // Non-negative frequency bins of the full transform, then the max_freq bound
    let n_bins_full = frame_length / 2 + 1;
    let bin_hz = sample_rate as f32 / frame_length as f32;
    let last_kept = ((config.max_freq / bin_hz).floor() as usize).min(n_bins_full - 1);
    let n_bins = last_kept + 1;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_length);

    let mut values = vec![vec![0.0f32; n_frames]; n_bins];
    let mut frame = vec![0.0f32; frame_length];
    let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); frame_length];

    for t in 0..n_frames {
        let start = t * hop_length;
        frame.copy_from_slice(&samples[start..start + frame_length]);

        for (sample, w) in frame.iter_mut().zip(window.iter()) {
            *sample *= *w;
        }

        for (slot, &sample) in buffer.iter_mut().zip(frame.iter()) {
            *slot = Complex::new(sample, 0.0);
        }
        fft.process(&mut buffer);

        for (k, row) in values.iter_mut().enumerate() {
            let power = buffer[k].norm_sqr();
            let factor = if k == 0 || k == n_bins_full - 1 {
                1.0 / scale
            } else {
                2.0 / scale
            };
            row[t] = (power * factor + config.eps).ln();
        }
    }

    Ok(Spectrogram { values, bin_hz })
}

/// Symmetric Hann window of length `size`
fn hann_window(size: usize) -> Vec<f32> {
    let denom = (size - 1) as f32;
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, seconds: f32, sample_rate: u32) -> SampleBuffer {
        let n = (seconds * sample_rate as f32) as usize;
        let samples = (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect();
        SampleBuffer::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_frame_count_one_second() {
        // 44100 samples, frame 882, hop 441: (44100 - 882) / 441 + 1 = 99
        let spec = compute_spectrogram(&sine(440.0, 1.0, 44100), &EngineConfig::default()).unwrap();
        assert_eq!(spec.n_frames(), 99);
    }

    #[test]
    fn test_dominant_bin_tracks_tone() {
        // 440 Hz with 50 Hz bins lands in bin round(440 / 50) = 9
        let spec = compute_spectrogram(&sine(440.0, 1.0, 44100), &EngineConfig::default()).unwrap();

        for frame in [0, spec.n_frames() / 2, spec.n_frames() - 1] {
            let dominant = (0..spec.n_bins())
                .max_by(|&a, &b| {
                    spec.value(a, frame)
                        .partial_cmp(&spec.value(b, frame))
                        .unwrap()
                })
                .unwrap();
            assert_eq!(dominant, 9, "frame {} peaked at bin {}", frame, dominant);
        }
    }

    #[test]
    fn test_deterministic() {
        let input = sine(523.25, 0.5, 44100);
        let config = EngineConfig::default();
        let a = compute_spectrogram(&input, &config).unwrap();
        let b = compute_spectrogram(&input, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bin_frequencies_strictly_increasing() {
        let spec = compute_spectrogram(&sine(440.0, 0.2, 44100), &EngineConfig::default()).unwrap();
        for bin in 1..spec.n_bins() {
            assert!(spec.bin_frequency(bin) > spec.bin_frequency(bin - 1));
        }
    }

    #[test]
    fn test_max_freq_bounds_bins() {
        let mut config = EngineConfig::default();
        config.max_freq = 5000.0;
        let spec = compute_spectrogram(&sine(440.0, 0.2, 44100), &config).unwrap();
        let top = spec.bin_frequency(spec.n_bins() - 1);
        assert!(top <= 5000.0, "top bin at {} Hz", top);
        // The next bin would have crossed the bound
        assert!(top + 50.0 > 5000.0);
    }

    #[test]
    fn test_insufficient_samples() {
        let input = SampleBuffer::new(vec![0.1; 100], 44100).unwrap();
        let result = compute_spectrogram(&input, &EngineConfig::default());
        assert!(matches!(
            result,
            Err(EngineError::InsufficientSamples { required: 882, actual: 100 })
        ));
    }

    #[test]
    fn test_tail_truncation() {
        // 1000 samples at 44100 Hz: exactly one frame, 118 tail samples dropped
        let input = SampleBuffer::new(vec![0.1; 1000], 44100).unwrap();
        let spec = compute_spectrogram(&input, &EngineConfig::default()).unwrap();
        assert_eq!(spec.n_frames(), 1);
    }
}
