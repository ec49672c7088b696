use crate::models::group::ConsolidationGroup;

/// Order groups by (aggregate similarity, estimated line reduction)
/// descending and keep the top `limit`. The sort is stable, so equal
/// groups keep their discovery order. Ranks are assigned 1-based.
pub fn rank(mut groups: Vec<ConsolidationGroup>, limit: usize) -> Vec<ConsolidationGroup> {
    groups.sort_by(|a, b| {
        b.aggregate_similarity
            .total_cmp(&a.aggregate_similarity)
            .then_with(|| b.estimated_line_reduction.cmp(&a.estimated_line_reduction))
    });
    groups.truncate(limit);
    for (i, group) in groups.iter_mut().enumerate() {
        group.rank = Some(i + 1);
    }
    groups
}
