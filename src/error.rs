/// Error types shared across the labeler

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LabelerError>;

#[derive(Debug, Error)]
pub enum LabelerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid item filename '{name}': {reason}")]
    InvalidFilename { name: String, reason: String },

    #[error("Invalid item id '{0}'")]
    InvalidItemId(String),

    #[error("NPY error: {0}")]
    Npy(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No .npy items found in {}", .0.display())]
    EmptyItemList(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LabelerError {
    pub fn invalid_filename(name: &str, reason: impl Into<String>) -> Self {
        LabelerError::InvalidFilename {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
