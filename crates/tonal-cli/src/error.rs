//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classifier gateway error
    #[error("Classifier error: {0}")]
    Classifier(#[from] tonal_classifier::ClassifierError),

    /// Workflow error
    #[error("{0}")]
    Workflow(#[from] tonal_workflow::WorkflowError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] tonal_store::StoreError),

    /// A dispatched analysis reported a failure
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
