use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning an input file into a figure.
///
/// Every variant aborts the run; there is no per-dataset recovery.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metadata on line {line}: field '{field}' {reason}")]
    MalformedMetadata {
        line: usize,
        field: String,
        reason: String,
    },

    #[error("malformed dataset {dataset}: {reason}")]
    MalformedDataset { dataset: String, reason: String },

    #[error("dataset {dataset}: unsupported color '{color}'")]
    UnsupportedColor { dataset: String, color: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DiagramError>;
