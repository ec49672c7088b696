use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::language::LangId;

/// A boolean feature label describing one functional trait of a file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureTag {
    DatabaseOperations,
    FileOperations,
    Logging,
    DatetimeHandling,
    Serialization,
    Validation,
    ErrorHandling,
    ProgressTracking,
    Networking,
    Concurrency,
}

/// Single best-fit functional classification of a file.
/// The variant order is the rule priority order used during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Database,
    Deployment,
    Validation,
    Utility,
    Analysis,
    Consolidation,
    Optimization,
    Monitoring,
    Correction,
    General,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Database => "database",
            Self::Deployment => "deployment",
            Self::Validation => "validation",
            Self::Utility => "utility",
            Self::Analysis => "analysis",
            Self::Consolidation => "consolidation",
            Self::Optimization => "optimization",
            Self::Monitoring => "monitoring",
            Self::Correction => "correction",
            Self::General => "general",
        };
        write!(f, "{s}")
    }
}

/// Function-like, type-like and import-like declaration counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationCounts {
    pub functions: usize,
    pub types: usize,
    pub imports: usize,
}

/// Per-file analysis result. Immutable once produced; re-analysis of the
/// same path yields a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub language: LangId,
    pub size_bytes: usize,
    pub line_count: usize,
    pub declarations: DeclarationCounts,
    pub complexity_score: f64,
    pub content_fingerprint: String,
    pub feature_tags: BTreeSet<FeatureTag>,
    pub category: Category,
    pub is_candidate: bool,
}
