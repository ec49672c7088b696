use camino::Utf8Path;
use memchr::memmem;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor};

use crate::engine::{fingerprint, parser, taxonomy};
use crate::language::LangId;
use crate::models::record::{DeclarationCounts, FileRecord};

/// Extraction thresholds, taken from the run configuration.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub min_lines: usize,
    pub complexity_threshold: f64,
}

/// Analyze one file's content into a `FileRecord`.
///
/// Returns `None` only when the file is below the minimum line count —
/// a deliberate too-small filter, not an error. Malformed source never
/// fails extraction: structural counting degrades to literal keyword
/// counting instead.
pub fn extract(
    path: &str,
    content: &str,
    lang_id: LangId,
    opts: &ExtractOptions,
) -> Option<FileRecord> {
    let line_count = content.lines().count();
    if line_count < opts.min_lines {
        return None;
    }

    let declarations = declaration_counts(content, lang_id);
    let complexity_score = complexity_score(content, line_count, &declarations, lang_id);

    let content_lower = content.to_lowercase();
    let path_lower = path.to_lowercase();
    let feature_tags = taxonomy::feature_tags(&content_lower);
    let category = taxonomy::categorize(&path_lower, &content_lower);

    let is_candidate = line_count >= opts.min_lines
        && complexity_score >= opts.complexity_threshold
        && !feature_tags.is_empty();

    let name = Utf8Path::new(path)
        .file_name()
        .unwrap_or(path)
        .to_string();

    Some(FileRecord {
        path: path.to_string(),
        name,
        language: lang_id,
        size_bytes: content.len(),
        line_count,
        declarations,
        complexity_score,
        content_fingerprint: fingerprint::fingerprint(content, lang_id),
        feature_tags,
        category,
        is_candidate,
    })
}

/// Count function-like, type-like and import-like declarations via a
/// tree-sitter query; a tree with syntax errors falls back to literal
/// keyword counting so one unparsable file never sinks the run.
fn declaration_counts(content: &str, lang_id: LangId) -> DeclarationCounts {
    let structural = parser::parse_source(content.as_bytes(), lang_id)
        .ok()
        .filter(|tree| !tree.root_node().has_error())
        .and_then(|tree| query_counts(tree.root_node(), content.as_bytes(), lang_id));

    structural.unwrap_or_else(|| keyword_counts(content, lang_id))
}

fn query_counts(
    root: tree_sitter::Node<'_>,
    source: &[u8],
    lang_id: LangId,
) -> Option<DeclarationCounts> {
    let query = Query::new(&lang_id.ts_language(), declaration_query(lang_id)).ok()?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, root, source);

    let mut counts = DeclarationCounts::default();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            match query.capture_names()[capture.index as usize] {
                "function" => counts.functions += 1,
                "type" => counts.types += 1,
                "import" => counts.imports += 1,
                _ => {}
            }
        }
    }
    Some(counts)
}

fn keyword_counts(content: &str, lang_id: LangId) -> DeclarationCounts {
    let (func_kw, type_kw, import_kw) = lang_id.declaration_keywords();
    DeclarationCounts {
        functions: count_occurrences(content, func_kw),
        types: count_occurrences(content, type_kw),
        imports: count_occurrences(content, import_kw),
    }
}

fn count_occurrences(content: &str, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    memmem::find_iter(content.as_bytes(), keyword.as_bytes()).count()
}

/// Weighted complexity heuristic, rounded to 2 decimals:
/// `0.01*lines + 1.5*functions + 2.0*types + 0.5*conditionals
///  + for_count + 0.7*while_count + 0.3*try_count`.
/// The 0.7 loop weight binds to the while-count only.
fn complexity_score(
    content: &str,
    line_count: usize,
    declarations: &DeclarationCounts,
    lang_id: LangId,
) -> f64 {
    let (cond_kw, for_kw, while_kw, try_kw) = lang_id.control_keywords();

    let conditionals = count_occurrences(content, cond_kw) as f64;
    let for_loops = count_occurrences(content, for_kw) as f64;
    let while_loops = count_occurrences(content, while_kw) as f64;
    let try_blocks = count_occurrences(content, try_kw) as f64;

    let total = line_count as f64 * 0.01
        + declarations.functions as f64 * 1.5
        + declarations.types as f64 * 2.0
        + conditionals * 0.5
        + for_loops
        + while_loops * 0.7
        + try_blocks * 0.3;

    (total * 100.0).round() / 100.0
}

fn declaration_query(lang_id: LangId) -> &'static str {
    match lang_id {
        LangId::Rust => {
            r#"
            (function_item) @function
            (struct_item) @type
            (enum_item) @type
            (use_declaration) @import
            "#
        }
        LangId::Python => {
            r#"
            (function_definition) @function
            (class_definition) @type
            (import_statement) @import
            (import_from_statement) @import
            "#
        }
        LangId::Javascript => {
            r#"
            (function_declaration) @function
            (method_definition) @function
            (class_declaration) @type
            (import_statement) @import
            "#
        }
        LangId::Typescript => {
            r#"
            (function_declaration) @function
            (method_definition) @function
            (class_declaration) @type
            (interface_declaration) @type
            (import_statement) @import
            "#
        }
        LangId::Go => {
            r#"
            (function_declaration) @function
            (method_declaration) @function
            (type_declaration) @type
            (import_declaration) @import
            "#
        }
        LangId::Bash => {
            r#"
            (function_definition) @function
            "#
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::FeatureTag;

    const OPTS: ExtractOptions = ExtractOptions {
        min_lines: 3,
        complexity_threshold: 1.0,
    };

    fn python_script(lines: usize) -> String {
        let mut s = String::from("import logging\ndef handler():\n    logging.info('x')\n");
        while s.lines().count() < lines {
            s.push_str("x = 1\n");
        }
        s
    }

    #[test]
    fn too_small_returns_none() {
        let opts = ExtractOptions {
            min_lines: 100,
            complexity_threshold: 1.0,
        };
        assert!(extract("a.py", "x = 1\n", LangId::Python, &opts).is_none());
    }

    #[test]
    fn structural_counts_from_tree() {
        let src = "import os\n\nclass A:\n    def f(self):\n        pass\n\ndef g():\n    pass\n";
        let rec = extract("a.py", src, LangId::Python, &OPTS).unwrap();
        assert_eq!(rec.declarations.functions, 2);
        assert_eq!(rec.declarations.types, 1);
        assert_eq!(rec.declarations.imports, 1);
    }

    #[test]
    fn fallback_on_broken_source() {
        // Unclosed paren breaks the structural parse; keyword counting
        // still sees both defs.
        let src = "def f(:\n    pass\n\ndef g():\n    pass\n";
        let rec = extract("a.py", src, LangId::Python, &OPTS).unwrap();
        assert_eq!(rec.declarations.functions, 2);
    }

    #[test]
    fn complexity_formula_exact() {
        // 5 lines, 1 function, 0 types, 1 conditional, 1 for, 1 while, 1 try
        let src = "def f():\n    for i in x:\n        while y:\n            if z:\n                try:\n";
        let rec = extract("a.py", src, LangId::Python, &OPTS).unwrap();
        // 0.05 + 1.5 + 0.5 + 1.0 + 0.7 + 0.3 = 4.05
        assert_eq!(rec.complexity_score, 4.05);
    }

    #[test]
    fn candidate_requires_tags() {
        let plain = "a = 1\nb = 2\nc = 3\nd = 4\n";
        let rec = extract("a.py", plain, LangId::Python, &OPTS).unwrap();
        assert!(rec.feature_tags.is_empty());
        assert!(!rec.is_candidate);
    }

    #[test]
    fn candidate_requires_complexity() {
        let opts = ExtractOptions {
            min_lines: 1,
            complexity_threshold: 100.0,
        };
        let rec = extract("a.py", &python_script(5), LangId::Python, &opts).unwrap();
        assert!(rec.feature_tags.contains(&FeatureTag::Logging));
        assert!(!rec.is_candidate);
    }

    #[test]
    fn candidate_when_all_thresholds_met() {
        let rec = extract("a.py", &python_script(10), LangId::Python, &OPTS).unwrap();
        assert!(rec.is_candidate);
    }

    #[test]
    fn record_basics() {
        let rec = extract("dir/a.py", &python_script(5), LangId::Python, &OPTS).unwrap();
        assert_eq!(rec.name, "a.py");
        assert_eq!(rec.path, "dir/a.py");
        assert_eq!(rec.language, LangId::Python);
        assert!(rec.size_bytes > 0);
        assert_eq!(rec.content_fingerprint.len(), 64);
    }
}
