use async_trait::async_trait;
use fxhash::hash64;

use crate::config::EmbeddingConfig;
use crate::error::EmbeddingError;
use crate::normalize::l2_normalize_in_place;
use crate::types::Embedding;
use crate::Embedder;

/// Deterministic embedder for tests and offline runs.
///
/// Generates sinusoid values derived from a hash of the input text, so equal
/// text always yields equal vectors and different text diverges, with no
/// model assets or network involved.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    cfg: EmbeddingConfig,
}

impl StubEmbedder {
    pub fn new(cfg: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    fn make_vector(&self, text: &str) -> Vec<f32> {
        let h = hash64(text.as_bytes());
        let mut v = vec![0f32; self.cfg.dimension];
        for (idx, value) in v.iter_mut().enumerate() {
            *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
        }
        if self.cfg.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self {
            cfg: EmbeddingConfig::default(),
        }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let vector = self.make_vector(text);
        Ok(Embedding {
            dimension: vector.len(),
            vector,
            model_name: self.cfg.model_name.clone(),
            normalized: self.cfg.normalize,
        })
    }

    fn dimension(&self) -> usize {
        self.cfg.dimension
    }
}
