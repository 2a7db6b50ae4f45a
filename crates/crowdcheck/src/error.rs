//! Error types for the crowdcheck library.
//!
//! A rule whose data does not satisfy it is *not* an error: it produces an
//! [`ExpectationResult`](crate::ExpectationResult) with `success == false`.
//! The variants here cover misconfigured rules and I/O problems only.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crowdcheck operations.
#[derive(Debug, Error)]
pub enum CrowdcheckError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A rule or rule set was configured with invalid parameters.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rule or filter referenced a column the dataset does not have.
    #[error("Unknown column '{column}' referenced by {context}")]
    UnknownColumn { column: String, context: String },

    /// A strftime format string could not be compiled.
    #[error("Invalid datetime format '{format}'")]
    InvalidFormat { format: String },

    /// One or more rules in a suite were misconfigured.
    #[error("{} misconfigured expectation(s): {}", .0.len(), join_messages(.0))]
    Rules(Vec<CrowdcheckError>),

    /// Error saving or loading a report or rule file.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl CrowdcheckError {
    /// Whether this error stems from rule configuration rather than I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CrowdcheckError::Config(_)
                | CrowdcheckError::UnknownColumn { .. }
                | CrowdcheckError::InvalidFormat { .. }
                | CrowdcheckError::Rules(_)
                | CrowdcheckError::Regex(_)
        )
    }
}

fn join_messages(errors: &[CrowdcheckError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for crowdcheck operations.
pub type Result<T> = std::result::Result<T, CrowdcheckError>;
