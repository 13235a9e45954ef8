use std::cmp::Ordering;
use std::sync::Arc;

use catalog::{
    squash_identifier, normalize_identifier, CatalogPort, CatalogProduct, Category, ColorClass,
    ScoredProduct, YieldClass,
};
use embedding::Embedder;
use extract::{AttributeExtractor, ExtractedAttributes};

use crate::types::{LineItem, MatchCandidate, MatchError, MatchMethod, MatcherConfig};

#[cfg(test)]
mod tests;

/// Attribute-overlap weights for the last-resort tier. Brand carries the
/// most signal; size the least.
const WEIGHT_BRAND: f32 = 0.40;
const WEIGHT_MODEL: f32 = 0.25;
const WEIGHT_TYPE: f32 = 0.15;
const WEIGHT_COLOR: f32 = 0.12;
const WEIGHT_SIZE: f32 = 0.08;

/// Resolves one line item to zero-or-one catalog candidate.
///
/// Nine strategies run in strict priority order. A tier is only attempted if
/// no prior tier produced a perfect-score candidate; otherwise the best
/// candidate across all tiers wins, with earlier tiers winning score ties.
pub struct TieredMatcher {
    catalog: Arc<dyn CatalogPort>,
    embedder: Arc<dyn Embedder>,
    extractor: Arc<dyn AttributeExtractor>,
    cfg: MatcherConfig,
}

impl TieredMatcher {
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn AttributeExtractor>,
        cfg: MatcherConfig,
    ) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self {
            catalog,
            embedder,
            extractor,
            cfg,
        })
    }

    /// Run the full cascade for one line item.
    pub async fn resolve(&self, item: &LineItem) -> Result<Option<MatchCandidate>, MatchError> {
        let mut best: Option<MatchCandidate> = None;

        if Self::consider(&mut best, self.tier_exact_identifier(item).await?) {
            return Ok(best);
        }
        if Self::consider(&mut best, self.tier_exact_name(item).await?) {
            return Ok(best);
        }
        if Self::consider(&mut best, self.tier_fuzzy_identifier(item).await?) {
            return Ok(best);
        }
        if Self::consider(&mut best, self.tier_combined_text(item).await?) {
            return Ok(best);
        }
        if Self::consider(&mut best, self.tier_substring(item).await?) {
            return Ok(best);
        }
        if Self::consider(&mut best, self.tier_description(item).await?) {
            return Ok(best);
        }
        if Self::consider(&mut best, self.tier_full_text(item).await?) {
            return Ok(best);
        }
        if Self::consider(&mut best, self.tier_semantic(item).await?) {
            return Ok(best);
        }
        Self::consider(&mut best, self.tier_attribute_assisted(item).await?);

        if let Some(candidate) = &best {
            tracing::debug!(
                item = %item.id,
                sku = %candidate.product.sku,
                method = ?candidate.method,
                score = candidate.score,
                "matcher produced candidate"
            );
        } else {
            tracing::debug!(item = %item.id, "matcher exhausted all tiers");
        }
        Ok(best)
    }

    /// Fold a tier's outcome into the running best. Returns true when the
    /// cascade may stop because a perfect-score candidate exists. Earlier
    /// tiers win score ties (strict greater-than).
    fn consider(best: &mut Option<MatchCandidate>, candidate: Option<MatchCandidate>) -> bool {
        if let Some(c) = candidate {
            let better = best.as_ref().is_none_or(|b| c.score > b.score);
            if better {
                *best = Some(c);
            }
        }
        best.as_ref().is_some_and(|b| b.score >= 1.0)
    }

    /// Tier 1: normalized equality of any candidate identifier against any
    /// identifier field, identifiers tried in descending kind priority.
    async fn tier_exact_identifier(
        &self,
        item: &LineItem,
    ) -> Result<Option<MatchCandidate>, MatchError> {
        for ident in item.identifiers_by_priority() {
            if ident.value.trim().is_empty() {
                continue;
            }
            let hits = self
                .catalog
                .find_by_identifier(&[ident.value.clone()])
                .await?;
            if !hits.is_empty() {
                let scored = hits.into_iter().map(|p| (p, 1.0)).collect();
                return Ok(self.pick_best(scored, item, MatchMethod::ExactIdentifier));
            }
        }
        Ok(None)
    }

    /// Tier 2: case-insensitive exact product-name equality.
    async fn tier_exact_name(&self, item: &LineItem) -> Result<Option<MatchCandidate>, MatchError> {
        if item.raw_name.trim().is_empty() {
            return Ok(None);
        }
        let hits = self.catalog.find_by_name(&item.raw_name).await?;
        if hits.is_empty() {
            return Ok(None);
        }
        let scored = hits.into_iter().map(|p| (p, 1.0)).collect();
        Ok(self.pick_best(scored, item, MatchMethod::ExactName))
    }

    /// Tier 3: separator-squashed substring/equality over identifier
    /// fields. Ties are broken by longest common identifier length before
    /// the standard within-tier tie-breaks.
    async fn tier_fuzzy_identifier(
        &self,
        item: &LineItem,
    ) -> Result<Option<MatchCandidate>, MatchError> {
        let mut candidates: Vec<(CatalogProduct, f32, usize)> = Vec::new();
        for ident in item.identifiers_by_priority() {
            let needle = squash_identifier(&ident.value);
            if needle.is_empty() {
                continue;
            }
            for product in self.catalog.find_by_fuzzy_identifier(&ident.value).await? {
                if let Some((score, common)) = Self::fuzzy_score(&needle, &product) {
                    candidates.push((product, score, common));
                }
            }
        }
        if candidates.is_empty() {
            return Ok(None);
        }

        let brand = item.inferred_brand();
        candidates.sort_unstable_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.2.cmp(&a.2))
                .then_with(|| Self::tie_break(&a.0, &b.0, brand.as_deref()))
        });
        let (product, score, _) = candidates.swap_remove(0);
        Ok(Some(MatchCandidate {
            product,
            method: MatchMethod::FuzzyIdentifier,
            score,
        }))
    }

    /// Score one fuzzy needle against a product's identifier fields.
    /// Equality after squashing scores 0.95; containment scales from 0.85
    /// with the shared-length ratio.
    fn fuzzy_score(needle: &str, product: &CatalogProduct) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        for value in product.identifier_values() {
            let squashed = squash_identifier(value);
            if squashed.is_empty() {
                continue;
            }
            let (score, common) = if squashed == needle {
                (0.95, needle.len())
            } else if squashed.contains(needle) || needle.contains(squashed.as_str()) {
                let common = needle.len().min(squashed.len());
                let ratio = common as f32 / needle.len().max(squashed.len()) as f32;
                (0.85 + 0.10 * ratio, common)
            } else {
                continue;
            };
            if best.is_none_or(|(s, c)| score > s || (score == s && common > c)) {
                best = Some((score, common));
            }
        }
        best
    }

    /// Tier 4: identifiers plus free-text terms issued as one ranked query;
    /// score by term-overlap ratio within the 0.70..0.95 band.
    async fn tier_combined_text(
        &self,
        item: &LineItem,
    ) -> Result<Option<MatchCandidate>, MatchError> {
        let mut query = item
            .identifiers
            .iter()
            .map(|i| i.value.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if !item.raw_name.trim().is_empty() {
            query.push(' ');
            query.push_str(&item.raw_name);
        }
        if query.trim().is_empty() {
            return Ok(None);
        }
        let hits = self.catalog.search_text(&query, self.cfg.text_limit).await?;
        let scored = hits
            .into_iter()
            .map(|ScoredProduct { product, score }| {
                (product, (0.70 + 0.25 * score).clamp(0.70, 0.95))
            })
            .collect();
        Ok(self.pick_best(scored, item, MatchMethod::CombinedText))
    }

    /// Tier 5: substring scan over product names. A whole-input to
    /// whole-name match scores 1.0 (still routed through the validator as
    /// unvalidated); partial containment scores by length ratio.
    async fn tier_substring(&self, item: &LineItem) -> Result<Option<MatchCandidate>, MatchError> {
        let needle = normalize_identifier(&item.raw_name);
        if needle.is_empty() {
            return Ok(None);
        }
        let hits = self.catalog.search_name_contains(&item.raw_name).await?;
        let scored = hits
            .into_iter()
            .map(|product| {
                let name = normalize_identifier(&product.name);
                let score = if name == needle {
                    1.0
                } else {
                    (needle.len() as f32 / name.len().max(1) as f32).min(0.99)
                };
                (product, score)
            })
            .collect();
        Ok(self.pick_best(scored, item, MatchMethod::Substring))
    }

    /// Tier 6: identifier appearing inside long-form descriptions; longer
    /// identifiers are more specific and score higher within 0.60..0.85.
    async fn tier_description(
        &self,
        item: &LineItem,
    ) -> Result<Option<MatchCandidate>, MatchError> {
        let mut scored: Vec<(CatalogProduct, f32)> = Vec::new();
        for ident in item.identifiers_by_priority() {
            let squashed = squash_identifier(&ident.value);
            if squashed.len() < 3 {
                continue;
            }
            let score = 0.60 + 0.25 * (squashed.len() as f32 / 10.0).min(1.0);
            for product in self
                .catalog
                .search_description_contains(&ident.value)
                .await?
            {
                scored.push((product, score));
            }
        }
        Ok(self.pick_best(scored, item, MatchMethod::Description))
    }

    /// Tier 7: IDF-weighted ranked full-text over name + description.
    async fn tier_full_text(&self, item: &LineItem) -> Result<Option<MatchCandidate>, MatchError> {
        if item.raw_name.trim().is_empty() {
            return Ok(None);
        }
        let hits = self
            .catalog
            .search_text(&item.raw_name, self.cfg.text_limit)
            .await?;
        let scored = hits
            .into_iter()
            .map(|ScoredProduct { product, score }| (product, (0.95 * score).clamp(0.0, 0.95)))
            .collect();
        Ok(self.pick_best(scored, item, MatchMethod::FullText))
    }

    /// Tier 8: embed the free text and take cosine neighbors above the
    /// configured similarity floor.
    async fn tier_semantic(&self, item: &LineItem) -> Result<Option<MatchCandidate>, MatchError> {
        if item.raw_name.trim().is_empty() {
            return Ok(None);
        }
        let query = self.embedder.embed(&item.raw_name).await?;
        let hits = self
            .catalog
            .nearest_by_vector(&query.vector, self.cfg.vector_k)
            .await?;
        let scored = hits
            .into_iter()
            .filter(|hit| hit.score >= self.cfg.semantic_floor)
            .map(|ScoredProduct { product, score }| (product, score.clamp(0.0, 1.0).min(0.99)))
            .collect();
        Ok(self.pick_best(scored, item, MatchMethod::Semantic))
    }

    /// Tier 9, last resort: ask the attribute-extraction port for a
    /// structured guess and score candidates by weighted attribute overlap.
    async fn tier_attribute_assisted(
        &self,
        item: &LineItem,
    ) -> Result<Option<MatchCandidate>, MatchError> {
        let mut text = item.raw_name.clone();
        for ident in &item.identifiers {
            text.push(' ');
            text.push_str(&ident.value);
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        let attrs = self.extractor.extract(&text).await?;
        if attrs.is_empty() {
            return Ok(None);
        }

        let query = [
            attrs.brand.as_deref(),
            attrs.product_type.as_deref(),
            attrs.model.as_deref(),
            attrs.color.as_deref(),
            attrs.size.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        let hits = self.catalog.search_text(&query, self.cfg.text_limit).await?;
        let scored = hits
            .into_iter()
            .filter_map(|ScoredProduct { product, .. }| {
                let overlap = Self::attribute_overlap(&attrs, &product)?;
                Some((product, 0.65 + 0.30 * overlap))
            })
            .collect();
        Ok(self.pick_best(scored, item, MatchMethod::AttributeAssisted))
    }

    /// Weighted fraction of extracted attributes the product agrees with,
    /// over the attributes actually present. `None` when nothing was
    /// extracted.
    fn attribute_overlap(attrs: &ExtractedAttributes, product: &CatalogProduct) -> Option<f32> {
        let mut present = 0.0f32;
        let mut matched = 0.0f32;

        if let Some(brand) = &attrs.brand {
            present += WEIGHT_BRAND;
            if product.brand.eq_ignore_ascii_case(brand) {
                matched += WEIGHT_BRAND;
            }
        }
        if let Some(model) = &attrs.model {
            present += WEIGHT_MODEL;
            let needle = squash_identifier(model);
            let hit = !needle.is_empty()
                && (product
                    .identifier_values()
                    .iter()
                    .any(|v| squash_identifier(v).contains(&needle))
                    || squash_identifier(&product.name).contains(&needle));
            if hit {
                matched += WEIGHT_MODEL;
            }
        }
        if let Some(product_type) = &attrs.product_type {
            present += WEIGHT_TYPE;
            let category = match product_type.as_str() {
                "toner" => Some(Category::Toner),
                "ink" => Some(Category::Ink),
                _ => None,
            };
            if category == Some(product.category) {
                matched += WEIGHT_TYPE;
            }
        }
        if let Some(color) = &attrs.color {
            present += WEIGHT_COLOR;
            if Self::color_class_of(color) == Some(product.color) {
                matched += WEIGHT_COLOR;
            }
        }
        if let Some(_size) = &attrs.size {
            present += WEIGHT_SIZE;
            // XL/XXL markers imply at least a high-yield class.
            if product.yield_class.rank() >= YieldClass::High.rank() {
                matched += WEIGHT_SIZE;
            }
        }

        (present > 0.0).then_some(matched / present)
    }

    fn color_class_of(color: &str) -> Option<ColorClass> {
        match color.to_lowercase().as_str() {
            "black" => Some(ColorClass::Black),
            "cyan" => Some(ColorClass::Cyan),
            "magenta" => Some(ColorClass::Magenta),
            "yellow" => Some(ColorClass::Yellow),
            "tricolor" => Some(ColorClass::Tricolor),
            "photo" => Some(ColorClass::Photo),
            _ => None,
        }
    }

    /// Within-tier selection: highest score, then exact brand match on the
    /// item's inferred brand, then highest catalog priority, then lowest
    /// SKU lexical order. Fully deterministic for reproducible runs.
    fn pick_best(
        &self,
        mut scored: Vec<(CatalogProduct, f32)>,
        item: &LineItem,
        method: MatchMethod,
    ) -> Option<MatchCandidate> {
        if scored.is_empty() {
            return None;
        }
        let brand = item.inferred_brand();
        scored.sort_unstable_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| Self::tie_break(&a.0, &b.0, brand.as_deref()))
        });
        let (product, score) = scored.swap_remove(0);
        Some(MatchCandidate {
            product,
            method,
            score: score.clamp(0.0, 1.0),
        })
    }

    fn tie_break(a: &CatalogProduct, b: &CatalogProduct, brand: Option<&str>) -> Ordering {
        let brand_rank = |p: &CatalogProduct| {
            brand.is_some_and(|wanted| p.brand.eq_ignore_ascii_case(wanted))
        };
        brand_rank(b)
            .cmp(&brand_rank(a))
            .then_with(|| b.active_priority.cmp(&a.active_priority))
            .then_with(|| a.sku.cmp(&b.sku))
    }
}
