use catalog::{CatalogError, CatalogProduct};
use embedding::EmbeddingError;
use extract::ExtractError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind tag for a candidate identifier carried by a line item.
///
/// Ordering matters: exact and fuzzy identifier tiers try identifiers in
/// descending [`IdentifierKind::priority`] order, preferring manufacturer
/// codes over distributor and vendor codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Manufacturer (OEM) part code.
    Manufacturer,
    /// The document's primary product code column.
    Primary,
    /// Distributor part code.
    Distributor,
    /// Secondary vendor code.
    Vendor,
}

impl IdentifierKind {
    /// Lookup priority; higher is tried first.
    pub fn priority(self) -> u8 {
        match self {
            IdentifierKind::Manufacturer => 3,
            IdentifierKind::Primary => 2,
            IdentifierKind::Distributor => 1,
            IdentifierKind::Vendor => 0,
        }
    }
}

/// One candidate identifier string, tagged with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemIdentifier {
    pub kind: IdentifierKind,
    pub value: String,
}

impl ItemIdentifier {
    pub fn new(kind: IdentifierKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A normalized order line item, produced by the upstream document parser.
/// Immutable once received; the engine never inspects raw tabular data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Stable identity within the batch; results are merged by this key.
    pub id: String,
    /// Raw product name as extracted.
    pub raw_name: String,
    /// Zero or more candidate identifiers.
    #[serde(default)]
    pub identifiers: Vec<ItemIdentifier>,
    pub quantity: u32,
    /// Customer-paid unit price, when the parser found one. Always `>= 0`.
    #[serde(default)]
    pub unit_price: Option<f64>,
    /// Upstream extraction confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: f32,
}

impl LineItem {
    /// Identifiers in descending lookup priority, stable within a kind.
    pub fn identifiers_by_priority(&self) -> Vec<&ItemIdentifier> {
        let mut out: Vec<&ItemIdentifier> = self.identifiers.iter().collect();
        out.sort_by(|a, b| b.kind.priority().cmp(&a.kind.priority()));
        out
    }

    /// Best-effort brand inference: the first purely alphabetic token of the
    /// raw name. Used only as a tie-break signal, never as a hard filter.
    pub fn inferred_brand(&self) -> Option<String> {
        self.raw_name
            .split_whitespace()
            .find(|t| t.len() > 1 && t.chars().all(char::is_alphabetic))
            .map(str::to_lowercase)
    }
}

/// Which strategy found a candidate. Only the first two are trusted by the
/// validation gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    ExactIdentifier,
    ExactName,
    FuzzyIdentifier,
    CombinedText,
    Substring,
    Description,
    FullText,
    Semantic,
    AttributeAssisted,
}

impl MatchMethod {
    /// True for the methods the validator is allowed to commit.
    pub fn is_exact(self) -> bool {
        matches!(self, MatchMethod::ExactIdentifier | MatchMethod::ExactName)
    }
}

/// A catalog product proposed by one matching tier. Transient: produced and
/// consumed within a single matching attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchCandidate {
    pub product: CatalogProduct,
    pub method: MatchMethod,
    /// Similarity score in `[0, 1]`.
    pub score: f32,
}

/// Informational record of the best candidate the validator refused to
/// commit. Carried for audit and report rendering; never purchasable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShadowCandidate {
    pub sku: String,
    pub name: String,
    pub method: MatchMethod,
    pub score: f32,
}

/// The committed outcome of matching one line item.
///
/// Invariant: `validated == true` only when `method` is exact-identifier or
/// exact-name and `score == 1.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub product: Option<CatalogProduct>,
    pub method: Option<MatchMethod>,
    pub score: f32,
    pub validated: bool,
    /// Best discarded non-exact candidate, for audit only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowCandidate>,
}

impl MatchResult {
    /// The terminal "no trusted match" outcome.
    pub fn unmatched() -> Self {
        Self {
            product: None,
            method: None,
            score: 0.0,
            validated: false,
            shadow: None,
        }
    }
}

/// Tuning knobs for the tiered matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherConfig {
    /// Minimum cosine similarity for the semantic tier to accept a hit.
    #[serde(default = "MatcherConfig::default_semantic_floor")]
    pub semantic_floor: f32,
    /// Result limit for ranked text searches.
    #[serde(default = "MatcherConfig::default_text_limit")]
    pub text_limit: usize,
    /// Neighbor count for vector search.
    #[serde(default = "MatcherConfig::default_vector_k")]
    pub vector_k: usize,
}

impl MatcherConfig {
    pub(crate) fn default_semantic_floor() -> f32 {
        // Empirical: below this, nearest-neighbor hits are mostly noise.
        0.70
    }

    pub(crate) fn default_text_limit() -> usize {
        10
    }

    pub(crate) fn default_vector_k() -> usize {
        5
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=1.0).contains(&self.semantic_floor) {
            return Err(MatchError::InvalidConfig(
                "semantic_floor must be within [0.0, 1.0]".into(),
            ));
        }
        if self.text_limit == 0 {
            return Err(MatchError::InvalidConfig(
                "text_limit must be greater than zero".into(),
            ));
        }
        if self.vector_k == 0 {
            return Err(MatchError::InvalidConfig(
                "vector_k must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            semantic_floor: Self::default_semantic_floor(),
            text_limit: Self::default_text_limit(),
            vector_k: Self::default_vector_k(),
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid configuration.
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
    /// Catalog lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Embedding port failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    /// Attribute extraction port failed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),
}
