//! Anchor/target pair hashing
//!
//! For each anchor peak `i` and each target peak `j` in `[i, i + fan_out)`,
//! the pair is hashed when the target lies strictly later in time. The hash
//! input is the decimal concatenation of the anchor frequency bin, the
//! target frequency bin and the time delta, with no delimiter between the
//! fields; the identifier is the leading 80 bits (20 hex characters) of the
//! SHA-1 digest of those UTF-8 bytes.
//!
//! The delimiter-free concatenation can make distinct
//! `(freq, freq, delta)` triples collide when digit lengths line up
//! differently (e.g. `(12, 3, 4)` and `(1, 23, 4)`). This is a known, rare
//! weakness of the scheme; it is kept as-is because changing the input
//! encoding would change matching semantics against existing indexes.

use sha1::{Digest, Sha1};

use crate::peaks::Peak;

/// Hex length of a fingerprint hash: 20 characters, 80 bits
pub const HASH_HEX_LEN: usize = 20;

/// A hashed peak pair anchored at a time offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// 80-bit identifier as 20 lowercase hex characters
    pub hash: String,
    /// Reference recording this fingerprint belongs to; `None` for a query
    pub song_id: Option<String>,
    /// Time frame index of the anchor peak
    pub anchor_time: i64,
}

/// Hash all forward-in-time peak pairs within the lookahead window
///
/// # Arguments
///
/// * `peaks` - Ordered peak list from the extractor
/// * `song_id` - Reference recording id, or `None` when fingerprinting a
///   query
/// * `fan_out` - Lookahead window size per anchor
///
/// Emits at most `peaks.len() × fan_out` fingerprints; pairs with a
/// non-positive time delta (including the anchor paired with itself) are
/// skipped, so every emitted hash encodes a strictly positive delta.
pub fn generate_fingerprints(
    peaks: &[Peak],
    song_id: Option<&str>,
    fan_out: usize,
) -> Vec<Fingerprint> {
    let mut fingerprints = Vec::new();

    for (i, anchor) in peaks.iter().enumerate() {
        for target in peaks.iter().skip(i).take(fan_out) {
            let delta = target.time as i64 - anchor.time as i64;
            if delta <= 0 {
                continue;
            }

            let input = format!("{}{}{}", anchor.freq, target.freq, delta);
            let digest = Sha1::digest(input.as_bytes());
            let hash = hex::encode(&digest[..HASH_HEX_LEN / 2]);

            fingerprints.push(Fingerprint {
                hash,
                song_id: song_id.map(str::to_string),
                anchor_time: anchor.time as i64,
            });
        }
    }

    log::debug!(
        "Generated {} fingerprints from {} peaks (fan-out {})",
        fingerprints.len(),
        peaks.len(),
        fan_out
    );

    fingerprints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(time: usize, freq: usize) -> Peak {
        Peak { time, freq }
    }

    #[test]
    fn test_hash_is_truncated_sha1() {
        let peaks = vec![peak(3, 10), peak(7, 42)];
        let fingerprints = generate_fingerprints(&peaks, None, 20);

        assert_eq!(fingerprints.len(), 1);
        // SHA-1("10424")[..20 hex]
        let expected = hex::encode(&Sha1::digest(b"10424")[..10]);
        assert_eq!(fingerprints[0].hash, expected);
        assert_eq!(fingerprints[0].hash.len(), HASH_HEX_LEN);
        assert_eq!(fingerprints[0].anchor_time, 3);
    }

    #[test]
    fn test_skips_non_positive_deltas() {
        // Same-frame peaks pair with delta 0 and must be dropped
        let peaks = vec![peak(5, 10), peak(5, 20), peak(9, 30)];
        let fingerprints = generate_fingerprints(&peaks, None, 20);

        assert_eq!(fingerprints.len(), 2);
        for fp in &fingerprints {
            assert!(fp.anchor_time < 9);
        }
    }

    #[test]
    fn test_fan_out_bounds_pair_count() {
        let peaks: Vec<Peak> = (0..50).map(|t| peak(t, t % 8)).collect();
        let fan_out = 20;
        let fingerprints = generate_fingerprints(&peaks, None, fan_out);
        assert!(fingerprints.len() <= peaks.len() * fan_out);
    }

    #[test]
    fn test_song_id_carried_through() {
        let peaks = vec![peak(0, 1), peak(2, 3)];
        let fingerprints = generate_fingerprints(&peaks, Some("song-a"), 20);
        assert_eq!(fingerprints[0].song_id.as_deref(), Some("song-a"));
    }

    #[test]
    fn test_known_concatenation_collision() {
        // (12, 3, 4) and (1, 23, 4) produce the same digest input "1234"
        let a = generate_fingerprints(&[peak(0, 12), peak(4, 3)], None, 20);
        let b = generate_fingerprints(&[peak(0, 1), peak(4, 23)], None, 20);
        assert_eq!(a[0].hash, b[0].hash);
    }
}
