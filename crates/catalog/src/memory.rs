use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;

use crate::port::{CatalogError, CatalogPort, ScoredProduct};
use crate::product::{CatalogProduct, Category, ColorClass};
use crate::text::{normalize_identifier, squash_identifier, tokenize_terms};

/// Snapshot-backed catalog for tests and single-run batch jobs.
///
/// All indexes are built once at construction; lookups never mutate state,
/// so the type is trivially `Send + Sync` behind an `Arc`.
pub struct InMemoryCatalog {
    products: Vec<CatalogProduct>,
    /// Normalized identifier value -> product offsets.
    ident_index: HashMap<String, Vec<usize>>,
    /// Separator-squashed identifier values per product, for fuzzy lookup.
    squashed: Vec<Vec<String>>,
    /// Lowercased name -> product offsets.
    name_index: HashMap<String, Vec<usize>>,
    /// Term -> product offsets over name + description.
    postings: HashMap<String, Vec<usize>>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        let mut ident_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut name_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        let mut squashed = Vec::with_capacity(products.len());

        for (offset, product) in products.iter().enumerate() {
            let mut squashed_values = Vec::new();
            for value in product.identifier_values() {
                ident_index
                    .entry(normalize_identifier(value))
                    .or_default()
                    .push(offset);
                squashed_values.push(squash_identifier(value));
            }
            squashed.push(squashed_values);

            name_index
                .entry(product.name.to_lowercase())
                .or_default()
                .push(offset);

            let mut seen = Vec::new();
            for term in tokenize_terms(&product.name)
                .into_iter()
                .chain(tokenize_terms(&product.description))
            {
                // One posting per term per document.
                if !seen.contains(&term) {
                    postings.entry(term.clone()).or_default().push(offset);
                    seen.push(term);
                }
            }
        }

        tracing::debug!(
            products = products.len(),
            identifiers = ident_index.len(),
            terms = postings.len(),
            "catalog snapshot indexed"
        );

        Self {
            products,
            ident_index,
            squashed,
            name_index,
            postings,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn collect(&self, offsets: &[usize]) -> Vec<CatalogProduct> {
        let mut seen = Vec::new();
        let mut out = Vec::new();
        for &offset in offsets {
            if !seen.contains(&offset) {
                seen.push(offset);
                out.push(self.products[offset].clone());
            }
        }
        out
    }

    /// Inverse document frequency of a term over this snapshot.
    fn idf(&self, term: &str) -> f32 {
        let df = self.postings.get(term).map_or(0, Vec::len);
        if df == 0 {
            return 0.0;
        }
        (1.0 + self.products.len() as f32 / df as f32).ln()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }
        let mut dot = 0.0f32;
        let mut norm_a = 0.0f32;
        let mut norm_b = 0.0f32;
        for (&x, &y) in a.iter().zip(b.iter()) {
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }

    /// Order hits by score descending, breaking ties by SKU so a fixed
    /// snapshot always returns the same ordering.
    fn rank(mut hits: Vec<ScoredProduct>, limit: usize) -> Vec<ScoredProduct> {
        hits.sort_unstable_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.product.sku.cmp(&b.product.sku))
        });
        hits.truncate(limit);
        hits
    }
}

#[async_trait]
impl CatalogPort for InMemoryCatalog {
    async fn find_by_identifier(
        &self,
        values: &[String],
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        let mut offsets = Vec::new();
        for value in values {
            if let Some(found) = self.ident_index.get(&normalize_identifier(value)) {
                offsets.extend_from_slice(found);
            }
        }
        Ok(self.collect(&offsets))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<CatalogProduct>, CatalogError> {
        let offsets = self
            .name_index
            .get(&name.trim().to_lowercase())
            .cloned()
            .unwrap_or_default();
        Ok(self.collect(&offsets))
    }

    async fn find_by_fuzzy_identifier(
        &self,
        value: &str,
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        let needle = squash_identifier(value);
        if needle.len() < 3 {
            // Two characters of squashed identifier match half the catalog.
            return Ok(Vec::new());
        }
        let mut offsets = Vec::new();
        for (offset, values) in self.squashed.iter().enumerate() {
            if values
                .iter()
                .any(|v| !v.is_empty() && (v.contains(&needle) || needle.contains(v.as_str())))
            {
                offsets.push(offset);
            }
        }
        Ok(self.collect(&offsets))
    }

    async fn search_name_contains(
        &self,
        value: &str,
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        let needle = normalize_identifier(value);
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let mut offsets = Vec::new();
        for (offset, product) in self.products.iter().enumerate() {
            if normalize_identifier(&product.name).contains(&needle) {
                offsets.push(offset);
            }
        }
        Ok(self.collect(&offsets))
    }

    async fn search_description_contains(
        &self,
        value: &str,
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        let needle = normalize_identifier(value);
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let mut offsets = Vec::new();
        for (offset, product) in self.products.iter().enumerate() {
            if normalize_identifier(&product.description).contains(&needle) {
                offsets.push(offset);
            }
        }
        Ok(self.collect(&offsets))
    }

    async fn search_text(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredProduct>, CatalogError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let terms = tokenize_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let total_weight: f32 = terms.iter().map(|t| self.idf(t).max(0.1)).sum();
        let mut scores: HashMap<usize, f32> = HashMap::new();
        for term in &terms {
            if let Some(offsets) = self.postings.get(term) {
                let weight = self.idf(term).max(0.1);
                for &offset in offsets {
                    *scores.entry(offset).or_insert(0.0) += weight;
                }
            }
        }

        let hits = scores
            .into_iter()
            .map(|(offset, weight)| ScoredProduct {
                product: self.products[offset].clone(),
                score: (weight / total_weight).clamp(0.0, 1.0),
            })
            .collect();
        Ok(Self::rank(hits, limit))
    }

    async fn nearest_by_vector(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredProduct>, CatalogError> {
        if k == 0 || vector.is_empty() {
            return Ok(Vec::new());
        }
        let hits = self
            .products
            .iter()
            .filter_map(|product| {
                let embedding = product.embedding.as_ref()?;
                let score = Self::cosine_similarity(vector, embedding);
                (score > 0.0).then(|| ScoredProduct {
                    product: product.clone(),
                    score,
                })
            })
            .collect();
        Ok(Self::rank(hits, k))
    }

    async fn find_replacement_candidates(
        &self,
        brand: &str,
        category: Category,
        color: ColorClass,
        family: Option<&str>,
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        let brand = brand.to_lowercase();
        let mut out: Vec<CatalogProduct> = self
            .products
            .iter()
            .filter(|p| {
                p.brand.to_lowercase() == brand
                    && p.category == category
                    && p.color == color
                    && match family {
                        Some(f) => p
                            .family
                            .as_deref()
                            .is_some_and(|pf| pf.eq_ignore_ascii_case(f)),
                        None => true,
                    }
            })
            .cloned()
            .collect();
        out.sort_unstable_by(|a, b| a.sku.cmp(&b.sku));
        Ok(out)
    }

    async fn probe(&self) -> Result<(), CatalogError> {
        if self.products.is_empty() {
            tracing::warn!("catalog probe passed on an empty snapshot");
        } else {
            tracing::debug!(products = self.products.len(), "catalog probe ok");
        }
        Ok(())
    }
}
