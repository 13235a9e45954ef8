use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::{CatalogProduct, Category, ColorClass};

/// Errors surfaced by catalog lookups.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// The catalog cannot be reached at all. This is the only error the
    /// batch engine treats as fatal.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    /// A single lookup exceeded its deadline.
    #[error("catalog lookup timed out after {0}ms")]
    Timeout(u64),
    /// Backend-specific failure on one lookup.
    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// A product paired with a lookup relevance score in `[0.0, 1.0]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredProduct {
    pub product: CatalogProduct,
    pub score: f32,
}

/// Read-only lookup interface over a supplier product catalog.
///
/// Implementations must be deterministic for a fixed snapshot: the same
/// query against the same data returns the same products in the same order.
/// Ranked methods break score ties by SKU lexical order.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Exact lookup: case/whitespace-normalized equality of any of `values`
    /// against any identifier field.
    async fn find_by_identifier(
        &self,
        values: &[String],
    ) -> Result<Vec<CatalogProduct>, CatalogError>;

    /// Exact lookup by case-insensitive product name equality.
    async fn find_by_name(&self, name: &str) -> Result<Vec<CatalogProduct>, CatalogError>;

    /// Fuzzy identifier lookup: separator-squashed substring/equality over
    /// identifier fields.
    async fn find_by_fuzzy_identifier(
        &self,
        value: &str,
    ) -> Result<Vec<CatalogProduct>, CatalogError>;

    /// Substring scan over product names.
    async fn search_name_contains(
        &self,
        value: &str,
    ) -> Result<Vec<CatalogProduct>, CatalogError>;

    /// Substring scan over long-form descriptions.
    async fn search_description_contains(
        &self,
        value: &str,
    ) -> Result<Vec<CatalogProduct>, CatalogError>;

    /// Ranked full-text search over name + description with IDF-weighted
    /// term matching. Scores are normalized to `[0.0, 1.0]`.
    async fn search_text(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredProduct>, CatalogError>;

    /// Nearest-neighbor search over indexed product embeddings by cosine
    /// similarity.
    async fn nearest_by_vector(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredProduct>, CatalogError>;

    /// Replacement candidates sharing brand, category, and color, optionally
    /// restricted to a product family.
    async fn find_replacement_candidates(
        &self,
        brand: &str,
        category: Category,
        color: ColorClass,
        family: Option<&str>,
    ) -> Result<Vec<CatalogProduct>, CatalogError>;

    /// Cheap liveness check run once per batch before any matching starts.
    async fn probe(&self) -> Result<(), CatalogError>;
}
