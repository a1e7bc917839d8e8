//! Source file errors
//!
//! Malformed rows are never errors; they are skipped and counted. Only a
//! file that cannot be opened or decoded aborts the extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading recipe CSV files
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Source file does not exist
    #[error("Source file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Source file exists but could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File ends before the header rows are complete
    #[error("{} has {found} of {expected} header rows", path.display())]
    MissingHeader {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// Record could not be decoded (invalid UTF-8 or broken quoting)
    #[error("Failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ExtractError {
    /// Path of the file that caused the error
    pub fn path(&self) -> &std::path::Path {
        match self {
            ExtractError::FileNotFound(path) => path,
            ExtractError::Io { path, .. } => path,
            ExtractError::MissingHeader { path, .. } => path,
            ExtractError::Csv { path, .. } => path,
        }
    }
}
