//! Peak extraction from a log-power spectrogram
//!
//! # Algorithm
//!
//! 1. A point is a candidate maximum when it equals the maximum of its
//!    neighborhood (structuring element grown per the engine config)
//! 2. The background mask marks grid values that are exactly zero; eroding
//!    it (border = foreground) marks the interiors of flat zero plateaus,
//!    whose every point would otherwise count as a trivial "maximum"
//! 3. `peak_mask = maxima XOR eroded_background` removes those plateaus
//! 4. Only candidates whose value reaches the grid mean are emitted
//!
//! Peaks are enumerated row-major over time then frequency, so the output
//! order is deterministic for identical input.

use crate::config::EngineConfig;
use crate::peaks::morphology::{self, Neighborhood};
use crate::spectral::Spectrogram;

/// Spectrogram coordinate of a salient local maximum
///
/// Amplitude decides inclusion but is not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Peak {
    /// Time frame index
    pub time: usize,
    /// Frequency bin index
    pub freq: usize,
}

/// Extract salient peaks from a spectrogram
///
/// Returns peaks ordered by time frame, then frequency bin.
pub fn extract_peaks(spectrogram: &Spectrogram, config: &EngineConfig) -> Vec<Peak> {
    let n_bins = spectrogram.n_bins();
    let n_frames = spectrogram.n_frames();
    if n_bins == 0 || n_frames == 0 {
        return vec![];
    }

    let neighborhood = Neighborhood::grown(config.neighborhood_iterations);
    let grid = spectrogram.rows();

    let filtered = morphology::maximum_filter(grid, &neighborhood);
    let maxima: Vec<Vec<bool>> = grid
        .iter()
        .zip(filtered.iter())
        .map(|(row, max_row)| {
            row.iter()
                .zip(max_row.iter())
                .map(|(&value, &max)| value == max)
                .collect()
        })
        .collect();

    let background: Vec<Vec<bool>> = grid
        .iter()
        .map(|row| row.iter().map(|&value| value == 0.0).collect())
        .collect();
    let eroded_background = morphology::erode(&background, &neighborhood, true);

    let threshold = spectrogram.mean();

    let mut peaks = Vec::new();
    for time in 0..n_frames {
        for freq in 0..n_bins {
            let is_peak = maxima[freq][time] ^ eroded_background[freq][time];
            if is_peak && spectrogram.value(freq, time) >= threshold {
                peaks.push(Peak { time, freq });
            }
        }
    }

    log::debug!(
        "Extracted {} peaks from {}x{} spectrogram (threshold {:.3})",
        peaks.len(),
        n_bins,
        n_frames,
        threshold
    );

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SampleBuffer;
    use crate::spectral::compute_spectrogram;
    use std::collections::HashSet;

    fn two_tone_spectrogram() -> Spectrogram {
        let sample_rate = 44100;
        let samples: Vec<f32> = (0..sample_rate / 2)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                0.6 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
                    + 0.4 * (2.0 * std::f32::consts::PI * 2500.0 * t).sin()
            })
            .collect();
        let input = SampleBuffer::new(samples, sample_rate as u32).unwrap();
        compute_spectrogram(&input, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_peaks_respect_mean_threshold() {
        let spectrogram = two_tone_spectrogram();
        let peaks = extract_peaks(&spectrogram, &EngineConfig::default());
        assert!(!peaks.is_empty());

        let mean = spectrogram.mean();
        for peak in &peaks {
            assert!(
                spectrogram.value(peak.freq, peak.time) >= mean,
                "peak at ({}, {}) below mean",
                peak.time,
                peak.freq
            );
        }
    }

    #[test]
    fn test_no_duplicate_coordinates() {
        let spectrogram = two_tone_spectrogram();
        let peaks = extract_peaks(&spectrogram, &EngineConfig::default());
        let unique: HashSet<_> = peaks.iter().copied().collect();
        assert_eq!(unique.len(), peaks.len());
    }

    #[test]
    fn test_ordered_by_time_then_frequency() {
        let spectrogram = two_tone_spectrogram();
        let peaks = extract_peaks(&spectrogram, &EngineConfig::default());
        for pair in peaks.windows(2) {
            assert!((pair[0].time, pair[0].freq) < (pair[1].time, pair[1].freq));
        }
    }

    #[test]
    fn test_tone_bins_are_found() {
        let spectrogram = two_tone_spectrogram();
        let peaks = extract_peaks(&spectrogram, &EngineConfig::default());
        // 50 Hz bins: 440 Hz -> bin 9, 2500 Hz -> bin 50
        assert!(peaks.iter().any(|p| p.freq == 9));
        assert!(peaks.iter().any(|p| p.freq == 50));
    }
}
