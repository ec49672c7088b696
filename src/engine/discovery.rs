use anyhow::Result;
use camino::Utf8Path;
use std::path::{Path, PathBuf};

use crate::language::LangId;

/// Collect analyzable files under `dir` using the `ignore` crate
/// (.gitignore aware, hidden entries skipped). An optional glob narrows
/// the walk (e.g. "**/*.py"). Only files in a supported language are
/// returned; everything else is silently left out.
pub fn collect_files(dir: &Path, glob_pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    use ignore::WalkBuilder;

    let mut builder = WalkBuilder::new(dir);
    builder.hidden(true).git_ignore(true).git_global(true);

    if let Some(pattern) = glob_pattern {
        let mut overrides = ignore::overrides::OverrideBuilder::new(dir);
        overrides.add(pattern)?;
        builder.overrides(overrides.build()?);
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        if entry.file_type().is_some_and(|ft| ft.is_file()) {
            let path = entry.into_path();
            if LangId::from_path(Utf8Path::new(path.to_str().unwrap_or(""))).is_ok() {
                files.push(path);
            }
        }
    }

    // Walk order is platform dependent; keep discovery order stable.
    files.sort();
    Ok(files)
}
