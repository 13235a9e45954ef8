use thiserror::Error;

/// Errors surfaced by embedding providers.
#[derive(Debug, Error, Clone)]
pub enum EmbeddingError {
    /// Configuration is inconsistent (unknown mode, zero dimension).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    /// The provider did not answer within its deadline.
    #[error("embedding timed out after {0}ms")]
    Timeout(u64),
    /// Remote provider failure.
    #[error("embedding provider error: {0}")]
    Provider(String),
}
