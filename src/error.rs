//! Error types
//!
//! One enum per concern. `ApiError` is what the CLI and the session layer return;
//! the lower layers convert into it with `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the in-memory tree operations.
///
/// Returning any of these guarantees the tree the operation was called on is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Not found: {target}")]
    NotFound { target: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Cannot move '{from}' into '{to}'")]
    InvalidMove { from: String, to: String },
}

impl TreeError {
    pub fn not_found(target: impl Into<String>) -> Self {
        TreeError::NotFound {
            target: target.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::NotFound { .. })
    }
}

/// Failures of the template scanner.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Template directory '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Error processing directory '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ScanError {
    /// True for the two conditions a caller is expected to recover from by
    /// falling back to a built-in template.
    pub fn is_missing_template(&self) -> bool {
        matches!(self, ScanError::NotFound(_) | ScanError::NotADirectory(_))
    }
}

/// Failures of the project store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Project already exists: {0}")]
    ProjectExists(String),
}

/// Top-level error for sessions, templates, the sandbox handle and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    StorageError(#[from] StorageError),

    #[error("Sandbox error: {0}")]
    Sandbox(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
