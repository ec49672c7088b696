use anyhow::Result;
use std::collections::HashMap;

use crate::engine::matrix::SimilarityMatrix;
use crate::error::MergeError;
use crate::models::group::{ConsolidationGroup, Potential};
use crate::models::record::{Category, FileRecord};

/// Fraction of duplicated lines assumed recoverable by a merge.
const REDUCTION_FACTOR: f64 = 0.7;

/// Disjoint-set over record indices with path compression. Union order
/// does not affect the resulting components.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Group files whose pairwise score meets `threshold` into consolidation
/// groups, transitively: A~B and B~C puts all three in one group even when
/// A~C is weak.
///
/// Errors only when a qualifying matrix pair references a path missing from
/// `records` — an upstream inconsistency between matrix and record set.
pub fn cluster(
    records: &[FileRecord],
    matrix: &SimilarityMatrix,
    threshold: f64,
) -> Result<Vec<ConsolidationGroup>> {
    let index_of: HashMap<&str, usize, ahash::RandomState> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.path.as_str(), i))
        .collect();

    let mut dsu = DisjointSet::new(records.len());
    for (a, b, score) in matrix.iter() {
        if score < threshold {
            continue;
        }
        let ia = *index_of
            .get(a)
            .ok_or_else(|| MergeError::matrix_inconsistency(a))?;
        let ib = *index_of
            .get(b)
            .ok_or_else(|| MergeError::matrix_inconsistency(b))?;
        dsu.union(ia, ib);
    }

    // Collect components in first-discovery order (record order).
    let mut component_of_root: HashMap<usize, usize, ahash::RandomState> = HashMap::default();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for i in 0..records.len() {
        let root = dsu.find(i);
        let slot = *component_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(i);
    }

    let groups = components
        .into_iter()
        .filter(|members| members.len() >= 2)
        .map(|members| build_group(records, matrix, &members))
        .collect();

    Ok(groups)
}

fn build_group(
    records: &[FileRecord],
    matrix: &SimilarityMatrix,
    members: &[usize],
) -> ConsolidationGroup {
    // Mean over all distinct ordered pairs; pairs grouped transitively may
    // sit below threshold and still contribute their recorded score, while
    // an absent entry contributes 0.
    let m = members.len();
    let mut sum = 0.0;
    for &i in members {
        for &j in members {
            if i != j {
                sum += matrix
                    .get(&records[i].path, &records[j].path)
                    .unwrap_or(0.0);
            }
        }
    }
    let aggregate = round3(sum / (m * (m - 1)) as f64);

    let total_lines: u64 = members.iter().map(|&i| records[i].line_count as u64).sum();
    let estimated_line_reduction = (total_lines as f64 * aggregate * REDUCTION_FACTOR).round() as u64;

    let potential = Potential::from_aggregate(aggregate);

    ConsolidationGroup {
        rank: None,
        category: dominant_category(records, members),
        members: members.iter().map(|&i| records[i].path.clone()).collect(),
        aggregate_similarity: aggregate,
        potential,
        estimated_line_reduction,
        recommended_action: potential.recommended_action(),
    }
}

/// Most frequent member category; ties break toward the category
/// encountered first in member order.
fn dominant_category(records: &[FileRecord], members: &[usize]) -> Category {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for &i in members {
        let cat = records[i].category;
        match counts.iter_mut().find(|(c, _)| *c == cat) {
            Some((_, n)) => *n += 1,
            None => counts.push((cat, 1)),
        }
    }
    let mut best = Category::General;
    let mut best_count = 0;
    for (cat, n) in counts {
        if n > best_count {
            best = cat;
            best_count = n;
        }
    }
    best
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
