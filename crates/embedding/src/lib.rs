//! Cartwise embedding port.
//!
//! Turns free text into fixed-length vectors for semantic catalog search.
//! The engine only ever talks to the [`Embedder`] trait; production deploys
//! wire a remote model behind it, while tests and offline runs use
//! [`StubEmbedder`], which produces deterministic vectors from a hash of the
//! input so similarity comparisons stay reproducible.

pub mod config;
pub mod error;
pub mod normalize;
pub mod stub;
pub mod types;

pub use config::EmbeddingConfig;
pub use error::EmbeddingError;
pub use normalize::l2_normalize_in_place;
pub use stub::StubEmbedder;
pub use types::Embedding;

use async_trait::async_trait;

/// Converts text into a fixed-length numeric vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Dimensionality of vectors produced by this embedder.
    fn dimension(&self) -> usize;
}
