use histolab_types::DesignId;
use thiserror::Error;

/// Errors from the design registry and composer.
///
/// A malformed stored configuration is deliberately NOT represented here: the
/// composer degrades to the built-in defaults instead of failing a report.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("design not found: {0}")]
    DesignNotFound(DesignId),

    #[error("lock error")]
    LockError,
}
