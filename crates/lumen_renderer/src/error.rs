//! Error types for rendering.

use thiserror::Error;

/// Errors that can stop a render before or while it runs.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid camera configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
