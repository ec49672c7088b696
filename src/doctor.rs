use serde::Serialize;

use crate::config::Config;
use crate::language::LangId;

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub version: String,
    pub languages: Vec<LanguageStatus>,
    pub thresholds: Thresholds,
}

#[derive(Debug, Serialize)]
pub struct LanguageStatus {
    pub language: LangId,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser_version: Option<String>,
}

/// The effective analysis thresholds after config resolution.
#[derive(Debug, Serialize)]
pub struct Thresholds {
    pub min_script_lines: usize,
    pub similarity_threshold: f64,
    pub complexity_threshold: f64,
    pub top_n: usize,
}

/// Run the doctor check: verify all tree-sitter grammars are functional
/// and echo the thresholds the analysis would run with.
pub fn run_doctor(config: &Config) -> DoctorReport {
    let languages = [
        LangId::Rust,
        LangId::Python,
        LangId::Javascript,
        LangId::Typescript,
        LangId::Go,
        LangId::Bash,
    ];

    let statuses: Vec<LanguageStatus> = languages
        .iter()
        .map(|&lang| {
            let available = check_language(lang);
            LanguageStatus {
                language: lang,
                available,
                parser_version: if available {
                    Some(lang.ts_language().abi_version().to_string())
                } else {
                    None
                },
            }
        })
        .collect();

    DoctorReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        languages: statuses,
        thresholds: Thresholds {
            min_script_lines: config.min_script_lines,
            similarity_threshold: config.similarity_threshold,
            complexity_threshold: config.complexity_threshold,
            top_n: config.top_n,
        },
    }
}

fn check_language(lang: LangId) -> bool {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&lang.ts_language()).is_ok()
}
