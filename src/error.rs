//! Central error types for brrr-loops.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic
//! `Display` and `From` implementations. Rule analysis itself is infallible;
//! these errors cover reading, parsing and configuring.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum LintError {
    /// Reading a source file failed.
    #[error("I/O error reading {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file is not valid UTF-8: {path}")]
    Encoding { path: PathBuf },

    /// Tree-sitter returned no tree (cancelled or no language set).
    #[error("parse error in {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    /// Requested language is not supported.
    #[error("language not supported: {0}")]
    UnsupportedLanguage(String),

    /// Tree-sitter language setup failed (ABI mismatch).
    #[error("tree-sitter error: {0}")]
    TreeSitter(String),

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience type alias for Results using [`LintError`].
pub type Result<T> = std::result::Result<T, LintError>;

impl LintError {
    /// Create a read error with path context.
    #[inline]
    pub fn file_read(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        LintError::FileRead {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            LintError::FileRead { path, .. }
            | LintError::Encoding { path }
            | LintError::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}
