use serde::{Deserialize, Serialize};

/// Similarity between one ordered pair of files, with the four sub-scores
/// kept for explainability. Lives only for the duration of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseSimilarity {
    /// Weighted combination of the four sub-scores, rounded to 3 decimals.
    pub combined: f64,
    /// 1.0 when the normalized-content fingerprints are byte-identical.
    pub fingerprint: f64,
    /// Jaccard index over the feature-tag sets.
    pub tag_overlap: f64,
    /// Mean of min/max ratios over size, lines and function count.
    pub structural: f64,
    /// 1.0 when both files share a functional category.
    pub category: f64,
}
