use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type.
/// `main` wraps these in `anyhow::Error` and exits non-zero.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Font error ({}): {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("Unknown font face id {0}")]
    UnknownFace(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
