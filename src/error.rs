//! Error types shared across the browser core.
//!
//! Load failures are terminal for a load attempt and carry the path or row
//! that caused them. Advisory errors come back from collaborators (image
//! probing, editor launch) and only affect the tile or view that asked.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading the record table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not find record table at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read record table at {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record table (row {row}): {reason}")]
    Malformed { row: u64, reason: String },

    #[error("Record table has no complete rows ({dropped} rows dropped for missing values)")]
    Empty { dropped: usize },
}

impl LoadError {
    pub(crate) fn malformed(row: u64, reason: impl Into<String>) -> Self {
        Self::Malformed {
            row,
            reason: reason.into(),
        }
    }
}

/// The aggregator was handed zero records.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cannot aggregate an empty record sequence")]
pub struct EmptyInputError;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid column count {0}: a grid needs at least one column")]
    InvalidColumnCount(usize),
}

/// Non-fatal failures reported by external collaborators.
#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("Image unavailable: {}", path.display())]
    ImageUnavailable { path: PathBuf },

    #[error("{program} executable not found. Please ensure it's installed and in your PATH.")]
    EditorNotFound { program: String },

    #[error("Base file does not exist: {}", path.display())]
    BaseFileMissing { path: PathBuf },

    #[error("Failed to launch {program}: {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Validation(String),
}
