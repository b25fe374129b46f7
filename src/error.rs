//! Error types for opencode-sandbox.

pub use crate::hooks::ClassifierError;
pub use crate::sandbox::SandboxError;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Configuration-related errors.
///
/// The loader never returns these to its caller; each one becomes a log line
/// and the next source is tried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid JSON in {source_name}: {reason}")]
    InvalidJson { source_name: String, reason: String },

    #[error("Configuration in {source_name} must be a JSON object")]
    NotAnObject { source_name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;
