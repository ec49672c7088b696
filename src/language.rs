use crate::error::MergeError;
use camino::Utf8Path;
use tree_sitter::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LangId {
    Rust,
    Python,
    Javascript,
    Typescript,
    Go,
    Bash,
}

impl std::fmt::Display for LangId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Go => "go",
            Self::Bash => "bash",
        };
        write!(f, "{s}")
    }
}

impl LangId {
    /// Detect language from file extension.
    pub fn from_path(path: &Utf8Path) -> Result<Self, MergeError> {
        let ext = path.extension().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "rs" => Ok(Self::Rust),
            "py" | "pyi" => Ok(Self::Python),
            "js" | "mjs" | "cjs" | "jsx" => Ok(Self::Javascript),
            "ts" | "mts" | "cts" | "tsx" => Ok(Self::Typescript),
            "go" => Ok(Self::Go),
            "sh" | "bash" | "zsh" => Ok(Self::Bash),
            other => {
                if other.is_empty() {
                    Err(MergeError::unsupported_language("<no extension>"))
                } else {
                    Err(MergeError::unsupported_language(other))
                }
            }
        }
    }

    /// Detect language from shebang line.
    pub fn from_shebang(first_line: &str) -> Option<Self> {
        if !first_line.starts_with("#!") {
            return None;
        }
        let line = first_line.to_lowercase();
        if line.contains("python") {
            Some(Self::Python)
        } else if line.contains("node") || line.contains("deno") || line.contains("bun") {
            Some(Self::Javascript)
        } else if line.contains("bash") || line.contains("/sh") || line.contains("zsh") {
            Some(Self::Bash)
        } else {
            None
        }
    }

    /// Get the tree-sitter Language for this language ID.
    pub fn ts_language(self) -> Language {
        match self {
            Self::Rust => Language::new(tree_sitter_rust::LANGUAGE),
            Self::Python => Language::new(tree_sitter_python::LANGUAGE),
            Self::Javascript => Language::new(tree_sitter_javascript::LANGUAGE),
            Self::Typescript => Language::new(tree_sitter_typescript::LANGUAGE_TYPESCRIPT),
            Self::Go => Language::new(tree_sitter_go::LANGUAGE),
            Self::Bash => Language::new(tree_sitter_bash::LANGUAGE),
        }
    }

    /// Line-comment prefix used by fingerprint normalization.
    pub fn line_comment(self) -> &'static str {
        match self {
            Self::Rust | Self::Javascript | Self::Typescript | Self::Go => "//",
            Self::Python | Self::Bash => "#",
        }
    }

    /// Literal keywords counted when structural parsing is unavailable:
    /// (function-like, type-like, import-like).
    pub fn declaration_keywords(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Rust => ("fn ", "struct ", "use "),
            Self::Python => ("def ", "class ", "import "),
            Self::Javascript | Self::Typescript => ("function ", "class ", "import "),
            Self::Go => ("func ", "type ", "import "),
            Self::Bash => ("() {", "", ""),
        }
    }

    /// Control-flow keywords feeding the complexity score:
    /// (conditional, for-loop, while-loop, try/exception).
    pub fn control_keywords(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Self::Rust => ("if ", "for ", "while ", "match "),
            Self::Python => ("if ", "for ", "while ", "try:"),
            Self::Javascript | Self::Typescript => ("if ", "for ", "while ", "try "),
            Self::Go => ("if ", "for ", "select ", "defer "),
            Self::Bash => ("if ", "for ", "while ", "trap "),
        }
    }
}
