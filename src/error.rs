use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    FileNotFound,
    ParseError,
    UnsupportedLanguage,
    IoError,
    InvalidRequest,
    MatrixInconsistency,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::UnsupportedLanguage => write!(f, "UNSUPPORTED_LANGUAGE"),
            Self::IoError => write!(f, "IO_ERROR"),
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::MatrixInconsistency => write!(f, "MATRIX_INCONSISTENCY"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MergeError {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for MergeError {}

impl MergeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::new(ErrorCode::FileNotFound, format!("File not found: {path}"))
    }

    pub fn unsupported_language(ext: &str) -> Self {
        Self::new(
            ErrorCode::UnsupportedLanguage,
            format!("Unsupported language for extension: {ext}"),
        )
    }

    /// A similarity-matrix entry referenced a path missing from the record
    /// set. Upstream wiring bug, never recoverable input.
    pub fn matrix_inconsistency(path: &str) -> Self {
        Self::new(
            ErrorCode::MatrixInconsistency,
            format!("Similarity matrix references unknown path: {path}"),
        )
    }
}
