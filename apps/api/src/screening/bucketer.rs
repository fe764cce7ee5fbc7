use serde::{Deserialize, Serialize};

/// Human-readable labels for the four buckets, in order.
pub const BUCKET_LABELS: [&str; 4] = ["0-25%", "25-50%", "50-75%", "75-100%"];

/// Upper (inclusive) bounds of the first three buckets.
/// Everything above the last bound lands in the fourth bucket.
const UPPER_BOUNDS: [f64; 3] = [25.0, 50.0, 75.0];

/// Counts of match scores per range: (..25], (25,50], (50,75], (75..).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBucketHistogram {
    pub counts: [usize; 4],
}

impl ScoreBucketHistogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(label, count)` pairs in bucket order.
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        BUCKET_LABELS.iter().copied().zip(self.counts.iter().copied())
    }
}

/// Index of the bucket a score falls in. Boundary values go to the lower bucket;
/// values below 0 join the first bucket and values above 100 the last.
pub fn bucket_index(score: f64) -> usize {
    UPPER_BOUNDS
        .iter()
        .position(|&bound| score <= bound)
        .unwrap_or(UPPER_BOUNDS.len())
}

pub fn bucket(scores: &[f64]) -> ScoreBucketHistogram {
    let mut histogram = ScoreBucketHistogram::default();
    for &score in scores {
        histogram.counts[bucket_index(score)] += 1;
    }
    histogram
}
