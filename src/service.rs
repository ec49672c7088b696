use anyhow::{Result, bail};
use camino::Utf8Path;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::Config;
use crate::engine::extractor::{self, ExtractOptions};
use crate::engine::matrix::SimilarityMatrix;
use crate::engine::report::{self, ReportInputs};
use crate::engine::{clusterer, discovery, parser, ranker};
use crate::error::{ErrorCode, MergeError};
use crate::models::record::FileRecord;
use crate::models::report::AnalysisReport;

// ---------------------------------------------------------------------------
// AppService: unified core logic for all CLI commands
// ---------------------------------------------------------------------------

pub struct AppService {
    settings: AnalysisSettings,
}

/// Effective numeric parameters for one analysis run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisSettings {
    pub min_script_lines: usize,
    pub similarity_threshold: f64,
    pub complexity_threshold: f64,
    pub top_n: usize,
}

impl From<&Config> for AnalysisSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_script_lines: config.min_script_lines,
            similarity_threshold: config.similarity_threshold,
            complexity_threshold: config.complexity_threshold,
            top_n: config.top_n,
        }
    }
}

/// Per-invocation overrides of the configured settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsOverrides {
    pub min_lines: Option<usize>,
    pub threshold: Option<f64>,
    pub complexity: Option<f64>,
    pub top: Option<usize>,
}

impl AnalysisSettings {
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(v) = overrides.min_lines {
            self.min_script_lines = v;
        }
        if let Some(v) = overrides.threshold {
            self.similarity_threshold = v;
        }
        if let Some(v) = overrides.complexity {
            self.complexity_threshold = v;
        }
        if let Some(v) = overrides.top {
            self.top_n = v;
        }
        self
    }
}

/// Per-file extraction outcome; failures are counted, never fatal.
enum Extraction {
    Record(Box<FileRecord>),
    TooSmall,
    Unreadable,
}

impl AppService {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    // -----------------------------------------------------------------------
    // Validation helpers
    // -----------------------------------------------------------------------

    /// Validate and canonicalize a file path. Returns the canonical path.
    fn validate_path(&self, path: &str) -> Result<PathBuf> {
        std::fs::canonicalize(path).map_err(|_| {
            warn!(path = path, "validate_path: file not found");
            MergeError::file_not_found(path).into()
        })
    }

    /// Validate and canonicalize a directory path. Returns the canonical path.
    fn validate_dir(&self, dir: &str) -> Result<PathBuf> {
        let canonical = std::fs::canonicalize(dir).map_err(|_| {
            MergeError::new(
                ErrorCode::FileNotFound,
                format!("Directory not found: {dir}"),
            )
        })?;
        if !canonical.is_dir() {
            bail!(MergeError::new(
                ErrorCode::InvalidRequest,
                format!("Not a directory: {dir}"),
            ));
        }
        Ok(canonical)
    }

    // -----------------------------------------------------------------------
    // Core operations
    // -----------------------------------------------------------------------

    /// Run the full pipeline over a corpus directory: discover files,
    /// extract records in parallel, score all pairs, cluster, rank and
    /// assemble the report.
    pub fn analyze_corpus(&self, dir: &str, glob: Option<&str>) -> Result<AnalysisReport> {
        debug!(dir = dir, glob = ?glob, "analyze_corpus called");
        let started = Instant::now();
        let canonical_dir = self.validate_dir(dir)?;

        let files = discovery::collect_files(&canonical_dir, glob)?;
        let files_discovered = files.len();
        debug!(dir = dir, files = files_discovered, "discovery completed");

        let extract_opts = ExtractOptions {
            min_lines: self.settings.min_script_lines,
            complexity_threshold: self.settings.complexity_threshold,
        };

        // Per-file extraction is independent; order is restored by the
        // collect, so records stay in discovery order.
        let outcomes: Vec<Extraction> = files
            .par_iter()
            .map(|path| extract_one(path, &canonical_dir, &extract_opts))
            .collect();

        let mut records = Vec::new();
        let mut skipped_too_small = 0;
        let mut skipped_unreadable = 0;
        for outcome in outcomes {
            match outcome {
                Extraction::Record(record) => records.push(*record),
                Extraction::TooSmall => skipped_too_small += 1,
                Extraction::Unreadable => skipped_unreadable += 1,
            }
        }
        debug!(
            analyzed = records.len(),
            skipped_too_small,
            skipped_unreadable,
            "extraction completed"
        );

        let matrix = SimilarityMatrix::build(&records);
        debug!(comparisons = matrix.len(), "similarity matrix completed");

        let groups = clusterer::cluster(&records, &matrix, self.settings.similarity_threshold)?;
        debug!(groups = groups.len(), "clustering completed");

        let ranked = ranker::rank(groups.clone(), self.settings.top_n);

        let report = report::build(ReportInputs {
            root: dir,
            records: &records,
            all_groups: &groups,
            ranked,
            files_discovered,
            skipped_too_small,
            skipped_unreadable,
            duration_seconds: started.elapsed().as_secs_f64(),
            similarity_threshold: self.settings.similarity_threshold,
            min_script_lines: self.settings.min_script_lines,
            complexity_threshold: self.settings.complexity_threshold,
        });
        debug!(
            dir = dir,
            total_groups = report.total_groups,
            candidates = report.statistics.consolidation_candidates,
            "analyze_corpus completed"
        );
        Ok(report)
    }

    /// Extract the analysis record for a single file. A file below the
    /// minimum line count is an explicit error here, unlike in corpus mode
    /// where it is silently filtered.
    pub fn inspect_file(&self, path: &str) -> Result<FileRecord> {
        debug!(path = path, "inspect_file called");
        let canonical = self.validate_path(path)?;
        let utf8_path = Utf8Path::new(canonical.to_str().unwrap_or(path));

        let source = parser::read_file(utf8_path)?;
        let lang_id = parser::detect_language(Utf8Path::new(path), &source)?;
        let content = String::from_utf8_lossy(&source);

        let extract_opts = ExtractOptions {
            min_lines: self.settings.min_script_lines,
            complexity_threshold: self.settings.complexity_threshold,
        };

        let record = extractor::extract(path, &content, lang_id, &extract_opts).ok_or_else(|| {
            MergeError::new(
                ErrorCode::InvalidRequest,
                format!(
                    "File below minimum line count ({}): {path}",
                    self.settings.min_script_lines
                ),
            )
        })?;
        debug!(
            path = path,
            language = %record.language,
            lines = record.line_count,
            candidate = record.is_candidate,
            "inspect_file completed"
        );
        Ok(record)
    }
}

/// Read and extract one discovered file. Read or decode problems are
/// folded into the skipped-unreadable count rather than failing the run.
fn extract_one(
    path: &std::path::Path,
    root: &std::path::Path,
    opts: &ExtractOptions,
) -> Extraction {
    let Some(path_str) = path.to_str() else {
        return Extraction::Unreadable;
    };

    let source = match parser::read_file(Utf8Path::new(path_str)) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = path_str, error = %e, "skipping unreadable file");
            return Extraction::Unreadable;
        }
    };

    let lang_id = match parser::detect_language(Utf8Path::new(path_str), &source) {
        Ok(l) => l,
        Err(_) => return Extraction::Unreadable,
    };

    let content = String::from_utf8_lossy(&source);

    // Records carry root-relative paths for readability.
    let display_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();

    match extractor::extract(&display_path, &content, lang_id, opts) {
        Some(record) => Extraction::Record(Box::new(record)),
        None => Extraction::TooSmall,
    }
}
