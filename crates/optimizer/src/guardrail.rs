//! Substitution compatibility guardrail.
//!
//! Every rule here is a hard stop: a single failing rule vetoes the
//! candidate, and a blocked candidate is never surfaced as a recommendation.
//! The rules encode printer-compatibility reality (brand, category, color)
//! plus two plausibility checks that catch catalog data errors before they
//! turn into absurd recommendations.

use std::fmt;

use catalog::CatalogProduct;
use serde::{Deserialize, Serialize};

/// Why a candidate replacement was vetoed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BlockReason {
    /// Candidate brand differs from the original.
    CrossBrand,
    /// Candidate is ink where the original is toner, or vice versa.
    CrossCategory,
    /// Candidate color class differs from the original.
    ColorMismatch,
    /// Candidate yield class ranks below the original.
    YieldDowngrade,
    /// Candidate page yield exceeds the original by an implausible factor.
    UnrealisticYieldRatio,
    /// Cost-per-page improvement too good to be true.
    SuspiciousCppImprovement,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockReason::CrossBrand => "cross-brand",
            BlockReason::CrossCategory => "cross-category",
            BlockReason::ColorMismatch => "color-mismatch",
            BlockReason::YieldDowngrade => "yield-downgrade",
            BlockReason::UnrealisticYieldRatio => "unrealistic-yield-ratio",
            BlockReason::SuspiciousCppImprovement => "suspicious-cpp-improvement",
        };
        f.write_str(s)
    }
}

/// Plausibility thresholds for the two data-quality rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GuardrailConfig {
    /// Maximum allowed candidate-to-original page-yield ratio.
    #[serde(default = "GuardrailConfig::default_max_yield_ratio")]
    pub max_yield_ratio: f64,
    /// Maximum allowed fractional cost-per-page improvement.
    #[serde(default = "GuardrailConfig::default_max_cpp_improvement")]
    pub max_cpp_improvement: f64,
}

impl GuardrailConfig {
    pub(crate) fn default_max_yield_ratio() -> f64 {
        // The largest genuine standard-to-super-high jump in the catalog
        // is around 6x; anything past 8x is a data error.
        8.0
    }

    pub(crate) fn default_max_cpp_improvement() -> f64 {
        0.90
    }
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            max_yield_ratio: Self::default_max_yield_ratio(),
            max_cpp_improvement: Self::default_max_cpp_improvement(),
        }
    }
}

/// Evaluate one original/candidate pair against every rule.
///
/// Returns the first failing rule in declaration order, or `None` when the
/// substitution is safe. The yield-ratio and cost-per-page rules only fire
/// when both sides carry the data they need.
pub fn check_pair(
    original: &CatalogProduct,
    original_unit_price: f64,
    candidate: &CatalogProduct,
    candidate_unit_price: f64,
    cfg: &GuardrailConfig,
) -> Option<BlockReason> {
    if !original.brand.eq_ignore_ascii_case(&candidate.brand) {
        return Some(BlockReason::CrossBrand);
    }
    if original.category != candidate.category {
        return Some(BlockReason::CrossCategory);
    }
    if original.color != candidate.color {
        return Some(BlockReason::ColorMismatch);
    }
    if candidate.yield_class.rank() < original.yield_class.rank() {
        return Some(BlockReason::YieldDowngrade);
    }

    if let (Some(original_yield), Some(candidate_yield)) =
        (original.page_yield, candidate.page_yield)
    {
        if original_yield > 0
            && f64::from(candidate_yield) / f64::from(original_yield) > cfg.max_yield_ratio
        {
            return Some(BlockReason::UnrealisticYieldRatio);
        }

        if original_unit_price > 0.0 && candidate_unit_price > 0.0 {
            let original_cpp = original_unit_price / f64::from(original_yield.max(1));
            let candidate_cpp = candidate_unit_price / f64::from(candidate_yield.max(1));
            if original_cpp > 0.0 {
                let improvement = (original_cpp - candidate_cpp) / original_cpp;
                if improvement > cfg.max_cpp_improvement {
                    return Some(BlockReason::SuspiciousCppImprovement);
                }
            }
        }
    }

    None
}

/// Drop every blocked candidate, logging an audit event per veto.
pub fn filter_candidates(
    original: &CatalogProduct,
    original_unit_price: f64,
    candidates: Vec<(CatalogProduct, f64)>,
    cfg: &GuardrailConfig,
) -> Vec<(CatalogProduct, f64)> {
    candidates
        .into_iter()
        .filter(|(candidate, candidate_price)| {
            match check_pair(original, original_unit_price, candidate, *candidate_price, cfg) {
                Some(reason) => {
                    tracing::info!(
                        original = %original.sku,
                        candidate = %candidate.sku,
                        reason = %reason,
                        "blocked: replacement candidate vetoed"
                    );
                    false
                }
                None => true,
            }
        })
        .collect()
}
