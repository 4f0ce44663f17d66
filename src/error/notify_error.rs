use thiserror::Error;

/// Crate-level error type for failures that cross component seams.
///
/// Per-room delivery problems are not errors at this level: the
/// orchestrator folds them into run outcomes and never propagates them.
/// What remains is credential resolution and genuinely unexpected faults.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Credential missing, wrong kind, or with an empty secret
    #[error("credential error: {reason}")]
    Auth { reason: String },

    /// Unexpected internal failure
    #[error("internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl NotifyError {
    /// Create a new credential error
    pub fn auth<S: Into<String>>(reason: S) -> Self {
        NotifyError::Auth {
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for NotifyError {
    fn from(error: anyhow::Error) -> Self {
        NotifyError::Internal { source: error }
    }
}

/// Type alias for Result with NotifyError to simplify function signatures
pub type NotifyResult<T> = Result<T, NotifyError>;
