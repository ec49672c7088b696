use anyhow::Result;
use clap::Parser;
use rayon::prelude::*;

use merge_sight::cli::{Cli, Commands};
use merge_sight::config::ConfigService;
use merge_sight::doctor;
use merge_sight::error::MergeError;
use merge_sight::service::{AnalysisSettings, AppService, SettingsOverrides};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let (code, message) = classify_error(&e);
        let error = serde_json::json!({
            "error": { "code": code, "message": message }
        });
        println!("{}", serde_json::to_string(&error).unwrap());
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn classify_error(e: &anyhow::Error) -> (String, String) {
    if let Some(me) = e.downcast_ref::<MergeError>() {
        (me.code.to_string(), me.message.clone())
    } else {
        ("IO_ERROR".to_string(), e.to_string())
    }
}

fn serialize_output(value: &impl serde::Serialize, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn make_error_line(e: &anyhow::Error) -> String {
    let (code, message) = classify_error(e);
    let obj = serde_json::json!({ "error": { "code": code, "message": message } });
    serde_json::to_string(&obj).unwrap()
}

enum PathInput {
    Single(String),
    Batch(Vec<String>),
}

fn resolve_paths(
    path: Option<&str>,
    paths: Option<&str>,
    paths_file: Option<&str>,
) -> Result<PathInput> {
    if let Some(p) = path {
        Ok(PathInput::Single(p.to_string()))
    } else if let Some(ps) = paths {
        let list: Vec<String> = ps
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(PathInput::Batch(list))
    } else if let Some(pf) = paths_file {
        let content = std::fs::read_to_string(pf)?;
        let list: Vec<String> = content
            .lines()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(PathInput::Batch(list))
    } else {
        Err(MergeError::new(
            merge_sight::error::ErrorCode::InvalidRequest,
            "One of --path, --paths, or --paths-file is required",
        )
        .into())
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<()> {
    let pretty = cli.pretty;

    // Load configuration
    let config = ConfigService::load(cli.config.as_deref())?;

    // Initialize logging if debug mode (CLI flag or config)
    if cli.debug || config.debug {
        merge_sight::logger::init(&config)?;
    }

    match cli.command {
        Commands::Init { path } => {
            let config_path = if let Some(p) = path {
                ConfigService::generate_at(&p)?;
                p
            } else {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            };
            eprintln!("Configuration file created at: {}", config_path.display());
            Ok(())
        }
        Commands::Doctor => {
            let report = doctor::run_doctor(&config);
            let output = serialize_output(&report, pretty)?;
            println!("{output}");
            Ok(())
        }
        Commands::Analyze {
            dir,
            glob,
            threshold,
            min_lines,
            complexity,
            top,
        } => {
            let settings = AnalysisSettings::from(&config).with_overrides(&SettingsOverrides {
                min_lines,
                threshold,
                complexity,
                top,
            });
            let service = AppService::new(settings);
            let report = service.analyze_corpus(&dir, glob.as_deref())?;
            let output = serialize_output(&report, pretty)?;
            println!("{output}");
            Ok(())
        }
        Commands::Inspect {
            path,
            paths,
            paths_file,
            min_lines,
        } => {
            let settings = AnalysisSettings::from(&config).with_overrides(&SettingsOverrides {
                min_lines,
                ..Default::default()
            });
            let service = AppService::new(settings);
            let input = resolve_paths(path.as_deref(), paths.as_deref(), paths_file.as_deref())?;
            match input {
                PathInput::Single(p) => cmd_inspect(&service, &p, pretty),
                PathInput::Batch(ps) => batch_inspect(&service, &ps),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Single-file command
// ---------------------------------------------------------------------------

fn cmd_inspect(service: &AppService, path: &str, pretty: bool) -> Result<()> {
    let record = service.inspect_file(path)?;
    let output = serialize_output(&record, pretty)?;
    println!("{output}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Batch processing (NDJSON output, rayon parallel)
// ---------------------------------------------------------------------------

fn batch_inspect(service: &AppService, paths: &[String]) -> Result<()> {
    let results: Vec<String> = paths
        .par_iter()
        .map(|p| match service.inspect_file(p) {
            Ok(record) => {
                serde_json::to_string(&record).unwrap_or_else(|e| make_error_line(&e.into()))
            }
            Err(e) => make_error_line(&e),
        })
        .collect();

    for line in &results {
        println!("{line}");
    }
    Ok(())
}
