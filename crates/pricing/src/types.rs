use matcher::{LineItem, MatchResult};
use serde::{Deserialize, Serialize};

/// Where the effective unit price came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PriceSource {
    /// Price extracted from the customer's own document.
    Customer,
    /// Catalog partner list price.
    CatalogList,
    /// Catalog unit price with an estimated market markup applied.
    EstimatedUnit,
    /// Wholesale acquisition cost with an estimated market markup applied.
    EstimatedCost,
    /// No usable price anywhere in the cascade.
    Unavailable,
}

impl PriceSource {
    /// True when the price is an assumption rather than an observed figure.
    pub fn is_estimated(self) -> bool {
        matches!(self, PriceSource::EstimatedUnit | PriceSource::EstimatedCost)
    }
}

/// A line item annotated with its match outcome and resolved price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedLineItem {
    pub item: LineItem,
    pub match_result: MatchResult,
    /// Effective per-unit price, absent when the cascade found nothing.
    pub unit_price: Option<f64>,
    pub source: PriceSource,
    /// User-facing note attached to estimated or unavailable prices.
    pub disclosure: Option<String>,
}

impl PricedLineItem {
    /// Per-unit price with unavailable treated as zero.
    pub fn effective_unit_price(&self) -> f64 {
        self.unit_price.unwrap_or(0.0)
    }

    /// Contribution of this item to the batch baseline spend.
    pub fn baseline_total(&self) -> f64 {
        self.effective_unit_price() * f64::from(self.item.quantity)
    }
}
