//! Error types for the family profile registry.

use std::path::PathBuf;

use crate::types::ValidationFailure;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Menu error: {0}")]
    Menu(#[from] MenuError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Profile registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Profile with national id {national_id} already exists")]
    AlreadyExists { national_id: String },

    #[error("Profile file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to serialize profiles: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Typed session-variable errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session variable {name} is not set")]
    Missing { name: String },

    #[error("Session variable {name} cannot be read as {expected}: {source}")]
    Invalid {
        name: String,
        expected: &'static str,
        #[source]
        source: ValidationFailure,
    },

    #[error("Session snapshot is malformed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Menu topology errors. All of these are configuration defects.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("Unknown menu item id({0})")]
    UnknownItem(String),

    #[error("Duplicate menu item id({0})")]
    DuplicateItem(String),

    #[error("Failed to read menu file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse menu definition: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Defects detected while a flow executes.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Cannot parse {field}: {source}")]
    Unparseable {
        field: &'static str,
        #[source]
        source: ValidationFailure,
    },

    #[error("Session has already ended")]
    SessionEnded,
}

/// Result type alias for the registry service.
pub type Result<T> = std::result::Result<T, Error>;
