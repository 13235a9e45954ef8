use serde::{Deserialize, Serialize};

/// A fixed-length embedding vector plus the provenance needed to compare it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    /// Friendly label of the model that produced the vector.
    pub model_name: String,
    pub dimension: usize,
    /// Whether the vector was L2-normalized (recommended for cosine search).
    pub normalized: bool,
}
