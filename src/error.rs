use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Failed to read investor dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    InvalidSettings(String),

    /// A data row failed load-time validation. `row` is 1-based and does not
    /// count the header.
    #[error("Row {row}: invalid {field}: {message}")]
    Validation {
        row: usize,
        field: &'static str,
        message: String,
    },

    #[error("Row {row}: duplicate firm name '{firm}'")]
    DuplicateFirm { row: usize, firm: String },

    #[error("Unknown {kind} '{value}'")]
    UnknownLabel { kind: &'static str, value: String },

    #[error("Failed to render report template: {0}")]
    Template(String),

    #[error("Failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackerError {
    pub(crate) fn validation(row: usize, field: &'static str, message: impl Into<String>) -> Self {
        TrackerError::Validation {
            row,
            field,
            message: message.into(),
        }
    }
}
