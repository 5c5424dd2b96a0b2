use thiserror::Error;

/// Errors constructing a presentation stack.
#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("no tokio runtime available for the delay timer: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
