use crate::models::record::FileRecord;
use crate::models::similarity::PairwiseSimilarity;

const WEIGHT_FINGERPRINT: f64 = 0.4;
const WEIGHT_TAGS: f64 = 0.3;
const WEIGHT_STRUCTURAL: f64 = 0.2;
const WEIGHT_CATEGORY: f64 = 0.1;

/// Combined similarity score in [0, 1], rounded to 3 decimals.
/// Symmetric: `score(a, b) == score(b, a)` for any pair of records.
pub fn score(a: &FileRecord, b: &FileRecord) -> f64 {
    score_detailed(a, b).combined
}

/// Score a pair with the four sub-scores broken out.
pub fn score_detailed(a: &FileRecord, b: &FileRecord) -> PairwiseSimilarity {
    let fingerprint = if a.content_fingerprint == b.content_fingerprint {
        1.0
    } else {
        0.0
    };

    let tag_overlap = jaccard(a, b);

    let structural = (ratio(a.size_bytes, b.size_bytes)
        + ratio(a.line_count, b.line_count)
        + ratio(a.declarations.functions, b.declarations.functions))
        / 3.0;

    let category = if a.category == b.category { 1.0 } else { 0.0 };

    let combined = fingerprint * WEIGHT_FINGERPRINT
        + tag_overlap * WEIGHT_TAGS
        + structural * WEIGHT_STRUCTURAL
        + category * WEIGHT_CATEGORY;

    PairwiseSimilarity {
        combined: round3(combined),
        fingerprint,
        tag_overlap,
        structural,
        category,
    }
}

/// Jaccard index over feature-tag sets; an empty union scores 0.
fn jaccard(a: &FileRecord, b: &FileRecord) -> f64 {
    let union = a.feature_tags.union(&b.feature_tags).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.feature_tags.intersection(&b.feature_tags).count();
    intersection as f64 / union as f64
}

/// min/max ratio with the degenerate case (both zero) scored 1.0, never a
/// division by zero.
fn ratio(x: usize, y: usize) -> f64 {
    let max = x.max(y);
    if max == 0 {
        return 1.0;
    }
    x.min(y) as f64 / max as f64
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LangId;
    use crate::models::record::{Category, DeclarationCounts, FeatureTag, FileRecord};
    use std::collections::BTreeSet;

    fn record(path: &str, lines: usize, tags: &[FeatureTag], category: Category) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            name: path.to_string(),
            language: LangId::Python,
            size_bytes: lines * 30,
            line_count: lines,
            declarations: DeclarationCounts {
                functions: lines / 20,
                types: 1,
                imports: 3,
            },
            complexity_score: 10.0,
            content_fingerprint: format!("fp-{path}"),
            feature_tags: tags.iter().copied().collect(),
            category,
            is_candidate: true,
        }
    }

    #[test]
    fn identity_scores_one() {
        let a = record("a.py", 200, &[FeatureTag::Logging], Category::Utility);
        assert_eq!(score(&a, &a), 1.0);
    }

    #[test]
    fn symmetry() {
        let a = record("a.py", 200, &[FeatureTag::Logging], Category::Utility);
        let b = record(
            "b.py",
            150,
            &[FeatureTag::Logging, FeatureTag::Validation],
            Category::Database,
        );
        assert_eq!(score(&a, &b), score(&b, &a));
    }

    #[test]
    fn fingerprint_equality_worth_point_four() {
        let mut a = record("a.py", 200, &[FeatureTag::Logging], Category::Utility);
        let mut b = record("b.py", 200, &[FeatureTag::Validation], Category::Database);
        a.content_fingerprint = "same".to_string();
        b.content_fingerprint = "same".to_string();
        let detail = score_detailed(&a, &b);
        assert_eq!(detail.fingerprint, 1.0);
        assert!(detail.combined >= 0.4);
    }

    #[test]
    fn empty_tag_union_scores_zero() {
        let a = record("a.py", 200, &[], Category::Utility);
        let b = record("b.py", 200, &[], Category::Utility);
        let detail = score_detailed(&a, &b);
        assert_eq!(detail.tag_overlap, 0.0);
    }

    #[test]
    fn degenerate_ratio_is_one() {
        assert_eq!(ratio(0, 0), 1.0);
        assert_eq!(ratio(0, 5), 0.0);
        assert_eq!(ratio(5, 10), 0.5);
    }

    #[test]
    fn zero_function_counts_do_not_divide_by_zero() {
        let mut a = record("a.py", 200, &[FeatureTag::Logging], Category::Utility);
        let mut b = record("b.py", 200, &[FeatureTag::Logging], Category::Utility);
        a.declarations.functions = 0;
        b.declarations.functions = 0;
        let detail = score_detailed(&a, &b);
        assert!(detail.structural.is_finite());
        assert_eq!(detail.structural, 1.0);
    }

    #[test]
    fn tag_jaccard_half_overlap() {
        let a = record(
            "a.py",
            200,
            &[FeatureTag::Logging, FeatureTag::Validation],
            Category::Utility,
        );
        let b = record(
            "b.py",
            200,
            &[FeatureTag::Logging, FeatureTag::ErrorHandling],
            Category::Utility,
        );
        let detail = score_detailed(&a, &b);
        // |{logging}| / |{logging, validation, error-handling}|
        assert!((detail.tag_overlap - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn combined_rounded_to_three_decimals() {
        let a = record("a.py", 201, &[FeatureTag::Logging], Category::Utility);
        let b = record("b.py", 157, &[FeatureTag::Logging], Category::Utility);
        let s = score(&a, &b);
        assert_eq!(s, (s * 1000.0).round() / 1000.0);
    }
}
