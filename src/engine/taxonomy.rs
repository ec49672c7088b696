use aho_corasick::AhoCorasick;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::models::record::{Category, FeatureTag};

/// Fixed tag vocabulary: a tag is present when any of its keywords occurs
/// in the lowercased content. Tags are evaluated independently.
const TAG_RULES: &[(FeatureTag, &[&str])] = &[
    (
        FeatureTag::DatabaseOperations,
        &["sqlite", "cursor", "execute(", "fetchall", "commit(", "select ", "insert into"],
    ),
    (
        FeatureTag::FileOperations,
        &["open(", "path(", "read_to_string", "write(", "exists(", "mkdir"],
    ),
    (
        FeatureTag::Logging,
        &["logging", "logger", "log.info", "tracing::", "console.log", "log::"],
    ),
    (
        FeatureTag::DatetimeHandling,
        &["datetime", "strftime", "timedelta", "timestamp", "now()"],
    ),
    (
        FeatureTag::Serialization,
        &["json.load", "json.dump", "json.parse", "serde", "to_json", "yaml."],
    ),
    (
        FeatureTag::Validation,
        &["validate", "verify", "check(", "assert"],
    ),
    (
        FeatureTag::ErrorHandling,
        &["try:", "except", "raise ", "catch", "unwrap_or", "panic!"],
    ),
    (
        FeatureTag::ProgressTracking,
        &["tqdm", "progress", "percentage", "spinner"],
    ),
    (
        FeatureTag::Networking,
        &["http", "socket", "urllib", "fetch(", "request("],
    ),
    (
        FeatureTag::Concurrency,
        &["thread", "async ", "await", "mutex", "multiprocessing"],
    ),
];

/// Ordered category rules; the first rule with any keyword present in the
/// lowercased path or content wins. Unmatched files are `general`.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Database, &["database", "db", "sqlite", "sql"]),
    (Category::Deployment, &["deploy", "orchestrator", "rollout"]),
    (
        Category::Validation,
        &["validate", "verify", "compliance", "lint"],
    ),
    (Category::Utility, &["utility", "helper", "tool", "util"]),
    (
        Category::Analysis,
        &["analysis", "analyz", "report", "metrics", "statistics"],
    ),
    (
        Category::Consolidation,
        &["consolidat", "merge", "combine", "dedup"],
    ),
    (Category::Optimization, &["optimiz", "enhance", "tuning"]),
    (
        Category::Monitoring,
        &["monitor", "watch", "track", "telemetry"],
    ),
    (
        Category::Correction,
        &["correction", "fix", "repair", "clean"],
    ),
];

struct Matchers {
    tags: AhoCorasick,
    tag_of_pattern: Vec<FeatureTag>,
    categories: AhoCorasick,
    category_rule_of_pattern: Vec<usize>,
}

fn matchers() -> &'static Matchers {
    static MATCHERS: OnceLock<Matchers> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        let mut tag_patterns = Vec::new();
        let mut tag_of_pattern = Vec::new();
        for (tag, keywords) in TAG_RULES {
            for kw in *keywords {
                tag_patterns.push(*kw);
                tag_of_pattern.push(*tag);
            }
        }

        let mut cat_patterns = Vec::new();
        let mut category_rule_of_pattern = Vec::new();
        for (rule_idx, (_, keywords)) in CATEGORY_RULES.iter().enumerate() {
            for kw in *keywords {
                cat_patterns.push(*kw);
                category_rule_of_pattern.push(rule_idx);
            }
        }

        Matchers {
            tags: AhoCorasick::new(&tag_patterns).expect("tag vocabulary is valid"),
            tag_of_pattern,
            categories: AhoCorasick::new(&cat_patterns).expect("category rules are valid"),
            category_rule_of_pattern,
        }
    })
}

/// Scan lowercased content and return every matching feature tag.
pub fn feature_tags(content_lower: &str) -> BTreeSet<FeatureTag> {
    let m = matchers();
    let mut tags = BTreeSet::new();
    for hit in m.tags.find_overlapping_iter(content_lower) {
        tags.insert(m.tag_of_pattern[hit.pattern().as_usize()]);
        if tags.len() == TAG_RULES.len() {
            break;
        }
    }
    tags
}

/// First-match-wins categorization over lowercased path and content.
pub fn categorize(path_lower: &str, content_lower: &str) -> Category {
    let m = matchers();
    let mut best: Option<usize> = None;
    for hit in m
        .categories
        .find_overlapping_iter(path_lower)
        .chain(m.categories.find_overlapping_iter(content_lower))
    {
        let rule = m.category_rule_of_pattern[hit.pattern().as_usize()];
        if best.is_none_or(|b| rule < b) {
            best = Some(rule);
            if rule == 0 {
                break;
            }
        }
    }
    match best {
        Some(rule) => CATEGORY_RULES[rule].0,
        None => Category::General,
    }
}
