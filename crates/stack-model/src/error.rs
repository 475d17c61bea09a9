//! Errors raised while loading or validating stack data.

use std::path::PathBuf;

use dnacom_common::DnacomError;

/// Errors that can occur when loading or constructing model types.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TIFF decode error in {path}: {source}")]
    TiffError {
        path: PathBuf,
        source: tiff::TiffError,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Metadata error: {message}")]
    MetadataError { message: String },

    #[error("Invalid data: {message}")]
    ValidationError { message: String },
}

impl StackError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError {
            message: msg.into(),
        }
    }

    pub(crate) fn metadata(msg: impl Into<String>) -> Self {
        Self::MetadataError {
            message: msg.into(),
        }
    }
}

impl From<StackError> for DnacomError {
    fn from(err: StackError) -> Self {
        DnacomError::load(err.to_string())
    }
}
