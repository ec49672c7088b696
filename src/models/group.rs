use serde::{Deserialize, Serialize};

use super::record::Category;

/// Consolidation potential tier, derived from aggregate similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Potential {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    ImmediateConsolidation,
    PlannedConsolidation,
    ReviewForPatterns,
}

impl Potential {
    /// Tier thresholds: HIGH >= 0.9, MEDIUM >= 0.8, else LOW.
    pub fn from_aggregate(aggregate: f64) -> Self {
        if aggregate >= 0.9 {
            Self::High
        } else if aggregate >= 0.8 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn recommended_action(self) -> RecommendedAction {
        match self {
            Self::High => RecommendedAction::ImmediateConsolidation,
            Self::Medium => RecommendedAction::PlannedConsolidation,
            Self::Low => RecommendedAction::ReviewForPatterns,
        }
    }
}

/// A cluster of files proposed for merging into one canonical module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationGroup {
    /// Position in the ranked output (1-based); absent until ranked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub category: Category,
    pub members: Vec<String>,
    /// Mean pairwise score over all distinct member pairs.
    pub aggregate_similarity: f64,
    pub potential: Potential,
    pub estimated_line_reduction: u64,
    pub recommended_action: RecommendedAction,
}
