//! Errors raised by host strategies.

use thiserror::Error;

/// Failure inside an injected check or usage-collection strategy.
///
/// Never surfaces to callers of the analyzer: the failing element's update
/// is logged and skipped, leaving its previous state in place.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The strategy gave up on the element.
    #[error("strategy failed: {0}")]
    Failed(String),

    /// The model snapshot did not contain what the strategy expected.
    #[error("model inconsistency: {0}")]
    Model(String),

    /// Any other error raised by host code.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StrategyError {
    /// Create a failure error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Create a model inconsistency error.
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }
}
