use std::collections::BTreeMap;
use time::format_description::well_known::Rfc3339;

use crate::models::group::{ConsolidationGroup, Potential};
use crate::models::record::FileRecord;
use crate::models::report::{
    AnalysisReport, CorpusStatistics, PotentialSavings, RunMetadata, TierSummary,
};

/// Everything one analysis run produced, gathered for the report.
pub struct ReportInputs<'a> {
    pub root: &'a str,
    pub records: &'a [FileRecord],
    pub all_groups: &'a [ConsolidationGroup],
    pub ranked: Vec<ConsolidationGroup>,
    pub files_discovered: usize,
    pub skipped_too_small: usize,
    pub skipped_unreadable: usize,
    pub duration_seconds: f64,
    pub similarity_threshold: f64,
    pub min_script_lines: usize,
    pub complexity_threshold: f64,
}

pub fn build(inputs: ReportInputs<'_>) -> AnalysisReport {
    let statistics = corpus_statistics(&inputs);
    let opportunity_summary = tier_summary(inputs.all_groups);
    let potential_savings = potential_savings(inputs.all_groups, statistics.total_lines);

    let mut category_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for record in inputs.records {
        *category_breakdown
            .entry(record.category.to_string())
            .or_insert(0) += 1;
    }

    let mut tag_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for record in inputs.records {
        for tag in &record.feature_tags {
            let label = serde_json::to_value(tag)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            *tag_breakdown.entry(label).or_insert(0) += 1;
        }
    }

    let recommendations = recommendations(
        &opportunity_summary,
        &category_breakdown,
        &tag_breakdown,
    );

    AnalysisReport {
        metadata: RunMetadata {
            root: inputs.root.to_string(),
            analyzed_at: time::OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            duration_seconds: inputs.duration_seconds,
            similarity_threshold: inputs.similarity_threshold,
            min_script_lines: inputs.min_script_lines,
            complexity_threshold: inputs.complexity_threshold,
        },
        statistics,
        category_breakdown,
        tag_breakdown,
        opportunity_summary,
        potential_savings,
        recommendations,
        total_groups: inputs.all_groups.len(),
        groups: inputs.ranked,
    }
}

fn corpus_statistics(inputs: &ReportInputs<'_>) -> CorpusStatistics {
    let total_lines: u64 = inputs.records.iter().map(|r| r.line_count as u64).sum();
    let total_functions: u64 = inputs
        .records
        .iter()
        .map(|r| r.declarations.functions as u64)
        .sum();
    let analyzed = inputs.records.len();

    CorpusStatistics {
        files_discovered: inputs.files_discovered,
        files_analyzed: analyzed,
        skipped_too_small: inputs.skipped_too_small,
        skipped_unreadable: inputs.skipped_unreadable,
        total_lines,
        total_functions,
        average_lines: if analyzed > 0 {
            round1(total_lines as f64 / analyzed as f64)
        } else {
            0.0
        },
        consolidation_candidates: inputs.records.iter().filter(|r| r.is_candidate).count(),
    }
}

fn tier_summary(groups: &[ConsolidationGroup]) -> TierSummary {
    let mut summary = TierSummary::default();
    for group in groups {
        match group.potential {
            Potential::High => summary.high += 1,
            Potential::Medium => summary.medium += 1,
            Potential::Low => summary.low += 1,
        }
    }
    summary
}

fn potential_savings(groups: &[ConsolidationGroup], total_lines: u64) -> PotentialSavings {
    let estimated_line_reduction: u64 = groups.iter().map(|g| g.estimated_line_reduction).sum();
    let reduction_percentage = if total_lines > 0 {
        round2(estimated_line_reduction as f64 / total_lines as f64 * 100.0)
    } else {
        0.0
    };
    PotentialSavings {
        estimated_line_reduction,
        reduction_percentage,
    }
}

fn recommendations(
    summary: &TierSummary,
    categories: &BTreeMap<String, usize>,
    tags: &BTreeMap<String, usize>,
) -> Vec<String> {
    let mut out = Vec::new();

    if summary.high > 0 {
        out.push(format!(
            "{} high-potential groups are near-identical and can be consolidated immediately",
            summary.high
        ));
    }
    if summary.medium > 0 {
        out.push(format!(
            "{} medium-potential groups are worth a planned consolidation pass",
            summary.medium
        ));
    }

    if let Some((tag, count)) = tags.iter().max_by_key(|(_, n)| **n)
        && *count >= 2
    {
        out.push(format!(
            "the '{tag}' trait appears in {count} files and is a prime extraction target"
        ));
    }

    if let Some((category, count)) = categories.iter().max_by_key(|(_, n)| **n)
        && *count > 5
    {
        out.push(format!(
            "the '{category}' category holds {count} files; consider a unified module"
        ));
    }

    out
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
