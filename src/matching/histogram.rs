//! Per-song offset-delta histograms
//!
//! Each store hit votes `(song_id, stored_offset - query_offset)`. Workers
//! accumulate into private histogram sets which merge pairwise in the
//! reduction step, so no shared mutable state is needed during fan-out.

use std::collections::HashMap;

/// Vote counts per song, keyed by offset delta
#[derive(Debug, Clone, Default)]
pub struct OffsetHistograms {
    votes: HashMap<String, HashMap<i64, usize>>,
}

impl OffsetHistograms {
    /// Create an empty histogram set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one vote for `song_id` at `delta`
    pub fn vote(&mut self, song_id: &str, delta: i64) {
        *self
            .votes
            .entry(song_id.to_string())
            .or_default()
            .entry(delta)
            .or_default() += 1;
    }

    /// Fold another histogram set into this one
    pub fn merge(mut self, other: Self) -> Self {
        for (song_id, histogram) in other.votes {
            let target = self.votes.entry(song_id).or_default();
            for (delta, count) in histogram {
                *target.entry(delta).or_default() += count;
            }
        }
        self
    }

    /// Whether any vote was recorded
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// The histogram mode per song: `(song_id, delta, count)`
    ///
    /// Ties break deterministically toward the smallest delta.
    pub fn best_alignments(&self) -> Vec<(String, i64, usize)> {
        self.votes
            .iter()
            .filter_map(|(song_id, histogram)| {
                histogram
                    .iter()
                    .max_by(|(delta_a, count_a), (delta_b, count_b)| {
                        count_a.cmp(count_b).then(delta_b.cmp(delta_a))
                    })
                    .map(|(&delta, &count)| (song_id.clone(), delta, count))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_beats_raw_hit_count() {
        let mut histograms = OffsetHistograms::new();
        // 5 scattered votes for song-a, 3 aligned votes for song-b
        for delta in [10, 250, -40, 977, 3] {
            histograms.vote("song-a", delta);
        }
        for _ in 0..3 {
            histograms.vote("song-b", 500);
        }

        let alignments = histograms.best_alignments();
        let a = alignments.iter().find(|(id, _, _)| id == "song-a").unwrap();
        let b = alignments.iter().find(|(id, _, _)| id == "song-b").unwrap();

        assert_eq!(a.2, 1, "scattered votes must not stack");
        assert_eq!((b.1, b.2), (500, 3));
    }

    #[test]
    fn test_merge_accumulates_counts() {
        let mut left = OffsetHistograms::new();
        left.vote("song-a", 42);
        left.vote("song-a", 42);

        let mut right = OffsetHistograms::new();
        right.vote("song-a", 42);
        right.vote("song-b", 0);

        let merged = left.merge(right);
        let alignments = merged.best_alignments();
        let a = alignments.iter().find(|(id, _, _)| id == "song-a").unwrap();
        assert_eq!((a.1, a.2), (42, 3));
        assert_eq!(alignments.len(), 2);
    }

    #[test]
    fn test_tie_breaks_toward_smaller_delta() {
        let mut histograms = OffsetHistograms::new();
        histograms.vote("song-a", 7);
        histograms.vote("song-a", -2);

        let alignments = histograms.best_alignments();
        assert_eq!(alignments[0].1, -2);
    }
}
