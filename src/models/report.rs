use serde::Serialize;
use std::collections::BTreeMap;

use super::group::ConsolidationGroup;

/// The response envelope for the analyze command.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: RunMetadata,
    pub statistics: CorpusStatistics,
    /// Analyzed file count per functional category.
    pub category_breakdown: BTreeMap<String, usize>,
    /// Analyzed file count per feature tag.
    pub tag_breakdown: BTreeMap<String, usize>,
    pub opportunity_summary: TierSummary,
    pub potential_savings: PotentialSavings,
    pub recommendations: Vec<String>,
    /// Ranked top-N consolidation groups.
    pub groups: Vec<ConsolidationGroup>,
    /// Total group count before top-N truncation.
    pub total_groups: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub root: String,
    pub analyzed_at: String,
    pub duration_seconds: f64,
    pub similarity_threshold: f64,
    pub min_script_lines: usize,
    pub complexity_threshold: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CorpusStatistics {
    pub files_discovered: usize,
    pub files_analyzed: usize,
    /// Below the minimum line count; filtered, not an error.
    pub skipped_too_small: usize,
    /// Unreadable or undecodable; reported, never fatal.
    pub skipped_unreadable: usize,
    pub total_lines: u64,
    pub total_functions: u64,
    pub average_lines: f64,
    pub consolidation_candidates: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TierSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PotentialSavings {
    pub estimated_line_reduction: u64,
    pub reduction_percentage: f64,
}
