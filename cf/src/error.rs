//! Pipeline error types

use thiserror::Error;

/// Errors surfaced by pipeline operations
///
/// Both variants display as their bare message so they can be shown to the
/// user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Required input was empty; raised before any remote call
    #[error("{0}")]
    Validation(String),

    /// The remote call failed or its response did not match the declared shape
    #[error("{0}")]
    Generation(String),
}

impl PipelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Generation error carrying `msg`, or `fallback` when `msg` is blank
    pub fn generation(msg: impl Into<String>, fallback: &str) -> Self {
        let msg = msg.into();
        if msg.trim().is_empty() {
            Self::Generation(fallback.to_string())
        } else {
            Self::Generation(msg)
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Generation(msg) => msg,
        }
    }
}
