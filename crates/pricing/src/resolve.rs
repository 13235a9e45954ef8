use matcher::{LineItem, MatchResult};

use crate::types::{PriceSource, PricedLineItem};

/// Upstream extraction sometimes misreads a totals or part-number column as
/// a unit price. Anything above this is treated as absent.
pub const MAX_PLAUSIBLE_UNIT_PRICE: f64 = 5_000.0;

/// Markup applied when estimating a street price from catalog unit price or
/// wholesale cost.
pub const ESTIMATED_MARKUP: f64 = 1.30;

const DISCLOSURE_LIST: &str = "assumed from catalog list price";
const DISCLOSURE_ESTIMATED: &str = "assumed from estimated market markup over wholesale";
const DISCLOSURE_UNAVAILABLE: &str = "pricing information needed";

/// Resolve the effective unit price for one line item.
///
/// Cascade, first hit wins: customer-extracted price, catalog list price,
/// catalog unit price with markup, wholesale cost with markup. Implausible
/// extracted prices are discarded before the cascade runs.
pub fn resolve_price(item: &LineItem, match_result: &MatchResult) -> PricedLineItem {
    let customer_price = match item.unit_price {
        Some(price) if price > MAX_PLAUSIBLE_UNIT_PRICE => {
            tracing::warn!(
                item = %item.id,
                price,
                ceiling = MAX_PLAUSIBLE_UNIT_PRICE,
                "implausible extracted unit price discarded"
            );
            None
        }
        other => other,
    };

    let (unit_price, source, disclosure) = if let Some(price) = customer_price.filter(|p| *p > 0.0)
    {
        (Some(price), PriceSource::Customer, None)
    } else if let Some(price) = catalog_fallback(match_result) {
        price
    } else {
        (
            None,
            PriceSource::Unavailable,
            Some(DISCLOSURE_UNAVAILABLE.to_string()),
        )
    };

    tracing::debug!(item = %item.id, source = ?source, price = ?unit_price, "price resolved");
    PricedLineItem {
        item: item.clone(),
        match_result: match_result.clone(),
        unit_price,
        source,
        disclosure,
    }
}

fn catalog_fallback(
    match_result: &MatchResult,
) -> Option<(Option<f64>, PriceSource, Option<String>)> {
    let product = match_result.product.as_ref()?;
    if let Some(list) = product.list_price.filter(|p| *p > 0.0) {
        return Some((
            Some(list),
            PriceSource::CatalogList,
            Some(DISCLOSURE_LIST.to_string()),
        ));
    }
    if let Some(unit) = product.unit_price.filter(|p| *p > 0.0) {
        return Some((
            Some(unit * ESTIMATED_MARKUP),
            PriceSource::EstimatedUnit,
            Some(DISCLOSURE_ESTIMATED.to_string()),
        ));
    }
    if let Some(wholesale) = product.wholesale_cost.filter(|p| *p > 0.0) {
        return Some((
            Some(wholesale * ESTIMATED_MARKUP),
            PriceSource::EstimatedCost,
            Some(DISCLOSURE_ESTIMATED.to_string()),
        ));
    }
    None
}
