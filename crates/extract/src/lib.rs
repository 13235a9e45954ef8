//! Cartwise attribute-extraction port.
//!
//! Last-resort matching tier: given ambiguous free text, return a
//! best-effort structured guess (brand, product type, model, color, size).
//! Production deploys put a generative model behind [`AttributeExtractor`];
//! because that dependency is non-deterministic, the trait is the seam that
//! lets tests swap in the deterministic [`StubExtractor`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Best-effort structured read of a free-text product description.
/// Every field is optional; absent means "no confident guess".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedAttributes {
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl ExtractedAttributes {
    /// True when no field carries a guess.
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.product_type.is_none()
            && self.model.is_none()
            && self.color.is_none()
            && self.size.is_none()
    }
}

/// Errors surfaced by attribute extraction providers.
#[derive(Debug, Error, Clone)]
pub enum ExtractError {
    /// The provider did not answer within its deadline.
    #[error("attribute extraction timed out after {0}ms")]
    Timeout(u64),
    /// Remote provider failure.
    #[error("attribute extraction provider error: {0}")]
    Provider(String),
}

/// Structured-guess extraction over ambiguous free text.
#[async_trait]
pub trait AttributeExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ExtractedAttributes, ExtractError>;
}

/// Known cartridge brands recognized by the stub. A generative provider is
/// not limited to this list; the stub only needs to be deterministic.
const KNOWN_BRANDS: &[&str] = &[
    "brother", "canon", "dell", "epson", "hp", "kyocera", "lexmark", "okidata", "ricoh",
    "samsung", "sharp", "xerox",
];

const KNOWN_COLORS: &[&str] = &[
    "black", "cyan", "magenta", "yellow", "tricolor", "tri-color", "photo",
];

/// Deterministic heuristic extractor for tests and offline runs.
///
/// Brand and color come from fixed keyword lists, the model is the first
/// token containing a digit, the type from "toner"/"ink" keywords, and the
/// size from XL/XXL markers. Crude on purpose: the engine only weighs
/// attribute overlap, so a coarse deterministic guess exercises the same
/// code paths a generative provider would.
#[derive(Debug, Clone, Default)]
pub struct StubExtractor;

#[async_trait]
impl AttributeExtractor for StubExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractedAttributes, ExtractError> {
        let mut attrs = ExtractedAttributes::default();
        for token in text.split(|c: char| !c.is_alphanumeric() && c != '-') {
            if token.is_empty() {
                continue;
            }
            let lower = token.to_lowercase();
            if attrs.brand.is_none() && KNOWN_BRANDS.contains(&lower.as_str()) {
                attrs.brand = Some(lower.clone());
            }
            if attrs.color.is_none() && KNOWN_COLORS.contains(&lower.as_str()) {
                attrs.color = Some(lower.trim_matches('-').replace('-', ""));
            }
            if attrs.product_type.is_none() && (lower == "toner" || lower == "ink") {
                attrs.product_type = Some(lower.clone());
            }
            if attrs.size.is_none() && (lower == "xl" || lower == "xxl") {
                attrs.size = Some(lower.clone());
            }
            if attrs.model.is_none() && lower.chars().any(|c| c.is_ascii_digit()) {
                attrs.model = Some(lower);
            }
        }
        Ok(attrs)
    }
}
