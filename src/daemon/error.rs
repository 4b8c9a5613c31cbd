//! Error types for the analyzer handle.

use thiserror::Error;

/// Errors returned by the [`Analyzer`](super::Analyzer) handle.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The analyzer was created outside a tokio runtime.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// `dispose()` was called, or the serialization task is gone.
    #[error("analyzer has been disposed")]
    Disposed,
}
