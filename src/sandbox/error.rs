//! Error types for sandbox backends.

/// Errors reported by a [`SandboxBackend`](super::SandboxBackend).
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// The backend could not be set up with the given policy.
    #[error("Sandbox initialization failed: {reason}")]
    InitializationFailed { reason: String },

    /// A command could not be wrapped.
    #[error("Failed to wrap command: {reason}")]
    WrapFailed { reason: String },

    /// `wrap` was called before a successful `initialize`.
    #[error("Sandbox backend is not initialized")]
    NotInitialized,

    /// The policy could not be serialized for the backend.
    #[error("Policy serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sandbox operations.
pub type Result<T> = std::result::Result<T, SandboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_failed_display() {
        let err = SandboxError::InitializationFailed {
            reason: "bwrap not found".to_string(),
        };
        assert!(err.to_string().contains("bwrap not found"));
        assert!(err.to_string().contains("initialization failed"));
    }

    #[test]
    fn test_wrap_failed_display() {
        let err = SandboxError::WrapFailed {
            reason: "quoting".to_string(),
        };
        assert!(err.to_string().contains("quoting"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = SandboxError::from(io_err);
        assert!(err.to_string().contains("access denied"));
    }
}
