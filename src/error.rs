//! Error types for the assembly engine.
//!
//! Validation problems are never errors: they are returned as data from the
//! `sanitize` module. The types here are the fatal failures that abort an
//! export, plus the wrappers used by configuration import and persistence.

use paper_storage_core::StorageError;

/// A configuration value outside the fixed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown font size '{name}' in section '{section}'")]
    UnknownFontSize { section: &'static str, name: String },

    #[error("Unknown section path: {0}")]
    UnknownSection(String),
}

/// Fatal failures of a document export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid format configuration: {0}. Reset the format configuration to defaults and try again")]
    Format(#[from] FormatError),

    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    #[error("Export task failed: {0}")]
    Task(String),

    #[error("Paper title is required")]
    MissingTitle,
}

/// Structural problems with an imported configuration text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigJsonError {
    #[error("Configuration text exceeds {limit} characters")]
    TooLong { limit: usize },

    #[error("Invalid JSON: {0}")]
    Parse(String),

    #[error("Configuration must be a JSON object")]
    NotAnObject,

    #[error("Missing required configuration section: {0}")]
    MissingSection(&'static str),
}

/// Failures of configuration import, load and save.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Invalid(#[from] ConfigJsonError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Configuration does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
