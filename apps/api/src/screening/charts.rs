//! Chart specifications handed to the presentation layer.
//!
//! These are pure functions of a score or a histogram; drawing is left to
//! whatever client renders the report.

use serde::{Deserialize, Serialize};

use crate::screening::bucketer::ScoreBucketHistogram;

const MATCH_COLORS: [&str; 2] = ["#ff9999", "#66b3ff"];
const BUCKET_COLORS: [&str; 4] = ["#ff9999", "#66b3ff", "#99ff99", "#ffcc99"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
    pub color: String,
    /// Offset of the slice from the center, as a fraction of the radius.
    pub explode: f64,
}

/// Two-slice match/mismatch chart for a single resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchChart {
    pub title: String,
    pub slices: Vec<ChartSlice>,
}

impl MatchChart {
    /// `(match, mismatch)` slice values; `None` if either slice is missing.
    pub fn values(&self) -> Option<(f64, f64)> {
        match self.slices.as_slice() {
            [matched, mismatched, ..] => Some((matched.value, mismatched.value)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub count: usize,
    pub color: String,
}

/// Four-bar distribution of match scores across a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<ChartBar>,
}

/// Slices are clamped to [0, 100] so an out-of-range score still draws.
pub fn match_chart(score: f64) -> MatchChart {
    let matched = score.clamp(0.0, 100.0);
    let slices = [("Match", matched, 0.1), ("Mismatch", 100.0 - matched, 0.0)]
        .into_iter()
        .zip(MATCH_COLORS)
        .map(|((label, value, explode), color)| ChartSlice {
            label: label.to_string(),
            value,
            color: color.to_string(),
            explode,
        })
        .collect();

    MatchChart {
        title: "Percentage Match".to_string(),
        slices,
    }
}

pub fn distribution_chart(histogram: &ScoreBucketHistogram) -> DistributionChart {
    let bars = histogram
        .labeled()
        .zip(BUCKET_COLORS)
        .map(|((label, count), color)| ChartBar {
            label: label.to_string(),
            count,
            color: color.to_string(),
        })
        .collect();

    DistributionChart {
        title: "Resume Match Percentage Distribution".to_string(),
        x_label: "Match Percentage".to_string(),
        y_label: "Number of Resumes".to_string(),
        bars,
    }
}
