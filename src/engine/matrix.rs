use rayon::prelude::*;
use std::collections::HashMap;

use crate::engine::scorer;
use crate::models::record::FileRecord;

type PairMap = HashMap<(String, String), f64, ahash::RandomState>;

/// Sparse all-pairs similarity map keyed by (pathA, pathB). Both ordered
/// directions of each pair are stored. A pure function of the input
/// records: no hidden state, fully re-derivable.
#[derive(Debug, Default)]
pub struct SimilarityMatrix {
    entries: PairMap,
}

impl SimilarityMatrix {
    /// Score every ordered pair of records. The pair space is partitioned
    /// across the rayon pool and merged; each unordered pair is scored once
    /// and stored in both directions (the score is symmetric).
    ///
    /// A corpus of 0 or 1 records yields an empty matrix.
    pub fn build(records: &[FileRecord]) -> Self {
        if records.len() < 2 {
            return Self::default();
        }

        let entries: PairMap = records
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, a)| {
                records[i + 1..].iter().flat_map(move |b| {
                    let s = scorer::score(a, b);
                    [
                        ((a.path.clone(), b.path.clone()), s),
                        ((b.path.clone(), a.path.clone()), s),
                    ]
                })
            })
            .collect();

        Self { entries }
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.entries.get(&(a.to_string(), b.to_string())).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.entries
            .iter()
            .map(|((a, b), s)| (a.as_str(), b.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a matrix from explicit pair scores; both directions are stored.
    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str, f64)]) -> Self {
        let mut entries = PairMap::default();
        for (a, b, s) in pairs {
            entries.insert((a.to_string(), b.to_string()), *s);
            entries.insert((b.to_string(), a.to_string()), *s);
        }
        Self { entries }
    }
}
