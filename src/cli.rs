use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "merge-sight",
    version,
    about = "Near-duplicate detection and consolidation-opportunity analysis for script corpora"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pretty-print JSON output (default: compact)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a corpus and report ranked consolidation opportunities
    Analyze {
        /// Root directory of the corpus
        #[arg(short, long, default_value = ".")]
        dir: String,

        /// Glob pattern to filter files (e.g. "**/*.py")
        #[arg(short, long)]
        glob: Option<String>,

        /// Pairwise score required to group two files (overrides config)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Minimum line count for a file to enter the analysis (overrides config)
        #[arg(long)]
        min_lines: Option<usize>,

        /// Minimum complexity score for candidacy (overrides config)
        #[arg(long)]
        complexity: Option<f64>,

        /// Maximum number of ranked groups in the report (overrides config)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Extract the analysis record for individual files
    Inspect {
        /// Path to the source file (single mode)
        #[arg(short, long)]
        path: Option<String>,

        /// Comma-separated paths (batch mode, NDJSON output)
        #[arg(long, conflicts_with = "path")]
        paths: Option<String>,

        /// File containing paths, one per line (batch mode)
        #[arg(long, conflicts_with_all = ["path", "paths"])]
        paths_file: Option<String>,

        /// Minimum line count; smaller files report an error (overrides config)
        #[arg(long)]
        min_lines: Option<usize>,
    },

    /// Check grammar availability and effective thresholds
    Doctor,

    /// Generate default configuration file
    Init {
        /// Path to write the configuration file (default: ~/.config/merge-sight/config.toml)
        #[arg(short, long)]
        path: Option<std::path::PathBuf>,
    },
}
