//! Error types shared across dnacom crates.

use std::path::PathBuf;

/// Top-level error type for dnacom operations.
///
/// Every variant is terminal for a run: the pipeline has no retry or
/// partial-result path.
#[derive(Debug, thiserror::Error)]
pub enum DnacomError {
    #[error("Load error: {message}")]
    Load { message: String },

    #[error("Computation error: {message}")]
    Computation { message: String },

    #[error("Kinematics error: {message}")]
    Kinematics { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using DnacomError.
pub type DnacomResult<T> = Result<T, DnacomError>;

impl DnacomError {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load {
            message: msg.into(),
        }
    }

    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation {
            message: msg.into(),
        }
    }

    pub fn kinematics(msg: impl Into<String>) -> Self {
        Self::Kinematics {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
