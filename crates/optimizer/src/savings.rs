use std::cmp::Ordering;

use catalog::CatalogProduct;
use pricing::{PricedLineItem, ESTIMATED_MARKUP};
use serde::{Deserialize, Serialize};

use crate::environment::{impact_for, EnvironmentalImpact};
use crate::guardrail::{check_pair, filter_candidates, BlockReason, GuardrailConfig};

/// The optimizer's verdict for one line item.
///
/// `product` may equal the matched product, which means "no change". A
/// populated `blocked` means a better candidate existed but every survivor
/// of the ranking was vetoed by the guardrail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub product: Option<CatalogProduct>,
    /// Units to order. Sized so the replacement covers the same page volume.
    pub quantity: u32,
    pub per_unit_savings: f64,
    pub total_savings: f64,
    pub impact: EnvironmentalImpact,
    pub blocked: Option<BlockReason>,
    /// User-facing outcome text.
    pub message: String,
}

impl Recommendation {
    pub fn no_change(quantity: u32, message: impl Into<String>) -> Self {
        Self {
            product: None,
            quantity,
            per_unit_savings: 0.0,
            total_savings: 0.0,
            impact: EnvironmentalImpact::zero(),
            blocked: None,
            message: message.into(),
        }
    }

    pub fn blocked(quantity: u32, reason: BlockReason) -> Self {
        Self {
            blocked: Some(reason),
            ..Self::no_change(
                quantity,
                "no compatible upgrade available; keeping current selection",
            )
        }
    }
}

/// What the customer would pay for a catalog product through this channel.
/// Same cascade as the price resolver minus the customer-document tier.
pub fn street_price(product: &CatalogProduct) -> Option<f64> {
    if let Some(list) = product.list_price.filter(|p| *p > 0.0) {
        return Some(list);
    }
    if let Some(unit) = product.unit_price.filter(|p| *p > 0.0) {
        return Some(unit * ESTIMATED_MARKUP);
    }
    product
        .wholesale_cost
        .filter(|p| *p > 0.0)
        .map(|w| w * ESTIMATED_MARKUP)
}

/// Cost per printed page. `None` without a positive yield and price.
pub fn cost_per_page(unit_price: f64, page_yield: Option<u32>) -> Option<f64> {
    let pages = page_yield.filter(|y| *y > 0)?;
    (unit_price > 0.0).then(|| unit_price / f64::from(pages))
}

/// Choose the best compatible replacement for a priced line item.
///
/// Candidates are ranked by cost per page, the guardrail vetoes unsafe
/// pairs, and the survivor with the lowest cost per page wins. The
/// replacement order is sized to cover the original page volume, rounded
/// up to whole units. Savings are clamped at zero; a worse candidate
/// yields a "no change" recommendation, never a negative number.
pub fn recommend(
    priced: &PricedLineItem,
    candidates: Vec<CatalogProduct>,
    cfg: &GuardrailConfig,
) -> Recommendation {
    let quantity = priced.item.quantity;
    let Some(original) = priced.match_result.product.as_ref() else {
        return Recommendation::no_change(quantity, "no compatible match found");
    };
    let Some(original_price) = priced.unit_price.filter(|p| *p > 0.0) else {
        return Recommendation::no_change(quantity, "pricing information needed");
    };
    let Some(original_yield) = original.page_yield.filter(|y| *y > 0) else {
        return Recommendation::no_change(quantity, "no yield data for current selection");
    };
    if quantity == 0 {
        return Recommendation::no_change(0, "no units ordered");
    }

    // Rank by cost per page before the guardrail so a veto of the whole
    // list can report the reason for the best-ranked candidate.
    let mut ranked: Vec<(CatalogProduct, f64, f64)> = candidates
        .into_iter()
        .filter(|c| c.sku != original.sku)
        .filter_map(|c| {
            let price = street_price(&c)?;
            let cpp = cost_per_page(price, c.page_yield)?;
            Some((c, price, cpp))
        })
        .collect();
    ranked.sort_unstable_by(|a, b| {
        a.2.partial_cmp(&b.2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.sku.cmp(&b.0.sku))
    });

    if ranked.is_empty() {
        return Recommendation::no_change(quantity, "no compatible upgrade available");
    }

    let best_ranked_reason = check_pair(original, original_price, &ranked[0].0, ranked[0].1, cfg);
    let survivors = filter_candidates(
        original,
        original_price,
        ranked.into_iter().map(|(c, p, _)| (c, p)).collect(),
        cfg,
    );
    let Some((candidate, candidate_price)) = survivors.into_iter().next() else {
        // Ranking preserved order, so the first survivor would have been
        // the best-ranked candidate; report why it fell.
        let reason = best_ranked_reason.unwrap_or(BlockReason::CrossBrand);
        tracing::info!(
            item = %priced.item.id,
            original = %original.sku,
            reason = %reason,
            "blocked: no compatible upgrade"
        );
        return Recommendation::blocked(quantity, reason);
    };

    let Some(candidate_yield) = candidate.page_yield.filter(|y| *y > 0) else {
        return Recommendation::no_change(quantity, "no compatible upgrade available");
    };
    let replacement_qty = replacement_quantity(quantity, original_yield, candidate_yield);
    let baseline = original_price * f64::from(quantity);
    let optimized = candidate_price * f64::from(replacement_qty);
    let raw_savings = baseline - optimized;

    if raw_savings < 0.0 {
        return Recommendation::no_change(
            quantity,
            "no change: current selection is already the best value",
        );
    }

    let same_yield_substitution = candidate_yield == original_yield && raw_savings.abs() < 1e-9;
    let cartridges_avoided = if same_yield_substitution {
        // A channel substitution at identical yield and cost still keeps
        // the replaced units out of a landfill.
        quantity
    } else {
        quantity.saturating_sub(replacement_qty)
    };
    let impact = impact_for(original.category, cartridges_avoided);
    let total_savings = raw_savings.max(0.0);
    let message = if total_savings > 0.0 {
        format!(
            "switch to {} to save ${:.2} on this line",
            candidate.sku, total_savings
        )
    } else {
        format!("equivalent substitution available: {}", candidate.sku)
    };

    tracing::info!(
        item = %priced.item.id,
        original = %original.sku,
        replacement = %candidate.sku,
        quantity = replacement_qty,
        savings = total_savings,
        "replacement recommended"
    );
    Recommendation {
        product: Some(candidate),
        quantity: replacement_qty,
        per_unit_savings: total_savings / f64::from(quantity),
        total_savings,
        impact,
        blocked: None,
        message,
    }
}

/// Units of the replacement needed to cover the original page volume.
fn replacement_quantity(quantity: u32, original_yield: u32, candidate_yield: u32) -> u32 {
    let pages = f64::from(quantity) * f64::from(original_yield);
    (pages / f64::from(candidate_yield.max(1))).ceil() as u32
}
