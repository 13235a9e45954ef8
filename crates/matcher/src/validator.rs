//! Candidate commitment policy.
//!
//! The matcher explores aggressively; this module decides what the engine is
//! allowed to act on. Only exact-corroborated candidates survive: an exact
//! identifier or exact name hit at a perfect score. Everything else is
//! discarded and demoted to a shadow record for diagnostics.
//!
//! This gate was introduced after fuzzy matches caused real wrong-product
//! purchases. Do not loosen it without a product-level decision.

use crate::types::{LineItem, MatchCandidate, MatchResult, ShadowCandidate};

/// Apply the commitment policy to the matcher's best candidate.
///
/// Returns a committed [`MatchResult`] when the candidate is exact at score
/// 1.0, otherwise an unmatched result carrying the discarded candidate as a
/// shadow.
pub fn validate(item: &LineItem, candidate: Option<MatchCandidate>) -> MatchResult {
    match candidate {
        Some(c) if c.method.is_exact() && c.score >= 1.0 => {
            tracing::debug!(item = %item.id, sku = %c.product.sku, method = ?c.method, "candidate committed");
            MatchResult {
                product: Some(c.product),
                method: Some(c.method),
                score: 1.0,
                validated: true,
                shadow: None,
            }
        }
        Some(c) => {
            tracing::debug!(
                item = %item.id,
                sku = %c.product.sku,
                method = ?c.method,
                score = c.score,
                "candidate discarded by commitment policy"
            );
            let mut result = MatchResult::unmatched();
            result.shadow = Some(ShadowCandidate {
                sku: c.product.sku,
                name: c.product.name,
                method: c.method,
                score: c.score,
            });
            result
        }
        None => MatchResult::unmatched(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IdentifierKind, ItemIdentifier, MatchMethod};
    use catalog::{CatalogProduct, Category, ColorClass, YieldClass};

    fn product(sku: &str) -> CatalogProduct {
        CatalogProduct {
            sku: sku.into(),
            oem_code: None,
            dealer_code: None,
            alt_codes: Vec::new(),
            name: format!("{sku} cartridge"),
            description: String::new(),
            brand: "Brother".into(),
            category: Category::Toner,
            color: ColorClass::Black,
            yield_class: YieldClass::Standard,
            page_yield: None,
            unit_price: None,
            wholesale_cost: None,
            list_price: None,
            family: None,
            compat_group: None,
            model_pattern: None,
            active_priority: 0,
            embedding: None,
        }
    }

    fn item() -> LineItem {
        LineItem {
            id: "item-1".into(),
            raw_name: "TN730 cartridge".into(),
            identifiers: vec![ItemIdentifier::new(IdentifierKind::Primary, "TN730")],
            quantity: 1,
            unit_price: None,
            confidence: 1.0,
        }
    }

    #[test]
    fn exact_identifier_at_perfect_score_commits() {
        let result = validate(
            &item(),
            Some(MatchCandidate {
                product: product("TN730"),
                method: MatchMethod::ExactIdentifier,
                score: 1.0,
            }),
        );
        assert!(result.validated);
        assert_eq!(result.product.expect("product").sku, "TN730");
        assert!(result.shadow.is_none());
    }

    #[test]
    fn exact_name_at_perfect_score_commits() {
        let result = validate(
            &item(),
            Some(MatchCandidate {
                product: product("TN730"),
                method: MatchMethod::ExactName,
                score: 1.0,
            }),
        );
        assert!(result.validated);
    }

    #[test]
    fn fuzzy_candidate_is_discarded_even_at_high_score() {
        let result = validate(
            &item(),
            Some(MatchCandidate {
                product: product("TN730"),
                method: MatchMethod::FuzzyIdentifier,
                score: 0.95,
            }),
        );
        assert!(!result.validated);
        assert!(result.product.is_none());
        let shadow = result.shadow.expect("shadow");
        assert_eq!(shadow.sku, "TN730");
        assert_eq!(shadow.method, MatchMethod::FuzzyIdentifier);
    }

    #[test]
    fn perfect_substring_score_is_still_discarded() {
        // A whole-name substring hit reaches 1.0 but is not exact-corroborated.
        let result = validate(
            &item(),
            Some(MatchCandidate {
                product: product("TN730"),
                method: MatchMethod::Substring,
                score: 1.0,
            }),
        );
        assert!(!result.validated);
        assert!(result.shadow.is_some());
    }

    #[test]
    fn exact_method_below_perfect_score_is_discarded() {
        let result = validate(
            &item(),
            Some(MatchCandidate {
                product: product("TN730"),
                method: MatchMethod::ExactIdentifier,
                score: 0.99,
            }),
        );
        assert!(!result.validated);
    }

    #[test]
    fn absent_candidate_yields_unmatched_without_shadow() {
        let result = validate(&item(), None);
        assert!(!result.validated);
        assert!(result.product.is_none());
        assert!(result.shadow.is_none());
    }
}
