use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;

/// Runtime configuration for the embedding port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider selector: `"stub"` (deterministic, offline) or `"remote"`.
    #[serde(default = "EmbeddingConfig::default_mode")]
    pub mode: String,
    /// Friendly label surfaced on every [`crate::Embedding`].
    #[serde(default = "EmbeddingConfig::default_model_name")]
    pub model_name: String,
    /// Output dimensionality.
    #[serde(default = "EmbeddingConfig::default_dimension")]
    pub dimension: usize,
    /// L2-normalize vectors (recommended for cosine similarity).
    #[serde(default = "EmbeddingConfig::default_normalize")]
    pub normalize: bool,
    /// Per-call deadline in seconds for remote providers.
    #[serde(default = "EmbeddingConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    pub(crate) fn default_mode() -> String {
        "stub".into()
    }

    pub(crate) fn default_model_name() -> String {
        "stub-sinusoid".into()
    }

    pub(crate) fn default_dimension() -> usize {
        384
    }

    pub(crate) fn default_normalize() -> bool {
        true
    }

    pub(crate) fn default_timeout_secs() -> u64 {
        10
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        match self.mode.as_str() {
            "stub" | "remote" => {}
            other => {
                return Err(EmbeddingError::InvalidConfig(format!(
                    "mode must be \"stub\" or \"remote\", got {other:?}"
                )))
            }
        }
        if self.dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            mode: Self::default_mode(),
            model_name: Self::default_model_name(),
            dimension: Self::default_dimension(),
            normalize: Self::default_normalize(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}
