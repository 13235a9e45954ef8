//! Per-item pipeline and bounded-concurrency batch engine.
//!
//! One line item flows matcher, validator, price resolver, guardrail,
//! optimizer, in that order. Every per-item failure is recovered locally
//! into a terminal [`ItemStatus`]; the only fatal error is a catalog that
//! cannot be reached at all, since no matching is possible without it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use catalog::{CatalogError, CatalogPort};
use embedding::Embedder;
use extract::AttributeExtractor;
use matcher::{validate, LineItem, MatchError, MatcherConfig, TieredMatcher};
use optimizer::{recommend, GuardrailConfig, Recommendation};
use pricing::{resolve_price, PricedLineItem};

use crate::aggregate::{summarize, BatchProgress, SavingsSummary};
use crate::metrics::MetricsSpan;

/// Fatal pipeline errors. Everything else degrades per item.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The catalog health probe failed; no matching is possible.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
    /// Engine configuration rejected at construction.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::InvalidConfig(value.to_string())
    }
}

/// Terminal state of one line item after the full pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    /// Validated match with a money-saving replacement.
    Matched,
    /// No exact-corroborated match; item keeps its own pricing in the
    /// baseline and contributes zero savings.
    Unmatched,
    /// Matched but no price could be resolved anywhere in the cascade.
    NoPricing,
    /// A better candidate existed but the guardrail vetoed it.
    Blocked,
    /// Matched and priced; the current selection is already the best value.
    NoChange,
    /// Port failure or empty input; the item was not processed.
    Skipped,
}

/// Everything downstream rendering needs for one line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemOutcome {
    pub item_id: String,
    pub status: ItemStatus,
    pub priced: PricedLineItem,
    pub recommendation: Recommendation,
    /// User-facing outcome text, never a raw error.
    pub message: String,
}

/// Engine tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Concurrent item pipelines per batch.
    #[serde(default = "EngineConfig::default_max_concurrency")]
    pub max_concurrency: usize,
    /// Deadline for each external port call.
    #[serde(default = "EngineConfig::default_port_timeout_secs")]
    pub port_timeout_secs: u64,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub guardrail: GuardrailConfig,
}

impl EngineConfig {
    pub(crate) fn default_max_concurrency() -> usize {
        8
    }

    pub(crate) fn default_port_timeout_secs() -> u64 {
        10
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_concurrency == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_concurrency must be greater than zero".into(),
            ));
        }
        if self.port_timeout_secs == 0 {
            return Err(PipelineError::InvalidConfig(
                "port_timeout_secs must be greater than zero".into(),
            ));
        }
        self.matcher.validate()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Self::default_max_concurrency(),
            port_timeout_secs: Self::default_port_timeout_secs(),
            matcher: MatcherConfig::default(),
            guardrail: GuardrailConfig::default(),
        }
    }
}

/// The result of one batch: per-item outcomes keyed by line-item id plus the
/// order-independent savings summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchResult {
    pub outcomes: HashMap<String, ItemOutcome>,
    pub summary: SavingsSummary,
    pub progress: BatchProgress,
}

/// The full matching and recommendation engine.
#[derive(Clone)]
pub struct Engine {
    catalog: Arc<dyn CatalogPort>,
    matcher: Arc<TieredMatcher>,
    cfg: EngineConfig,
}

impl Engine {
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn AttributeExtractor>,
        cfg: EngineConfig,
    ) -> Result<Self, PipelineError> {
        cfg.validate()?;
        let matcher = Arc::new(TieredMatcher::new(
            Arc::clone(&catalog),
            embedder,
            extractor,
            cfg.matcher.clone(),
        )?);
        Ok(Self {
            catalog,
            matcher,
            cfg,
        })
    }

    fn port_timeout(&self) -> Duration {
        Duration::from_secs(self.cfg.port_timeout_secs)
    }

    /// Run one line item through the full pipeline.
    ///
    /// Never returns an error: every failure degrades to a terminal
    /// [`ItemStatus`] with a user-facing message.
    pub async fn process_item(&self, item: LineItem) -> ItemOutcome {
        if item.raw_name.trim().is_empty() && item.identifiers.is_empty() {
            let priced = resolve_price(&item, &matcher::MatchResult::unmatched());
            return self.finish(ItemOutcome {
                item_id: item.id.clone(),
                status: ItemStatus::Skipped,
                priced,
                recommendation: Recommendation::no_change(
                    item.quantity,
                    "line item carries no identifiers or name",
                ),
                message: "line item carries no identifiers or name".into(),
            });
        }

        let match_span = MetricsSpan::start();
        let (candidate, port_failed) =
            match tokio::time::timeout(self.port_timeout(), self.matcher.resolve(&item)).await {
                Ok(Ok(candidate)) => (candidate, false),
                Ok(Err(err)) => {
                    tracing::warn!(item = %item.id, error = %err, "matching failed, item degraded");
                    (None, true)
                }
                Err(_) => {
                    tracing::warn!(
                        item = %item.id,
                        timeout_secs = self.cfg.port_timeout_secs,
                        "matching timed out, item degraded"
                    );
                    (None, true)
                }
            };

        let result = validate(&item, candidate);
        if let Some(span) = match_span {
            span.record_match(result.validated);
        }

        let pricing_span = MetricsSpan::start();
        let priced = resolve_price(&item, &result);
        if let Some(span) = pricing_span {
            span.record_pricing(priced.source);
        }

        if !result.validated {
            let status = if port_failed {
                ItemStatus::Skipped
            } else {
                ItemStatus::Unmatched
            };
            let message = "no compatible match found".to_string();
            return self.finish(ItemOutcome {
                item_id: item.id,
                status,
                recommendation: Recommendation::no_change(priced.item.quantity, message.clone()),
                priced,
                message,
            });
        }

        if priced.unit_price.is_none() {
            let message = "pricing information needed".to_string();
            return self.finish(ItemOutcome {
                item_id: item.id,
                status: ItemStatus::NoPricing,
                recommendation: Recommendation::no_change(priced.item.quantity, message.clone()),
                priced,
                message,
            });
        }

        let candidates = self.replacement_candidates(&priced).await;
        let recommendation = recommend(&priced, candidates, &self.cfg.guardrail);
        let status = if recommendation.blocked.is_some() {
            ItemStatus::Blocked
        } else if recommendation.total_savings > 0.0 {
            ItemStatus::Matched
        } else {
            ItemStatus::NoChange
        };
        let message = recommendation.message.clone();
        self.finish(ItemOutcome {
            item_id: item.id,
            status,
            priced,
            recommendation,
            message,
        })
    }

    fn finish(&self, outcome: ItemOutcome) -> ItemOutcome {
        if let Some(recorder) = crate::metrics::metrics_recorder() {
            recorder.record_outcome(outcome.status);
        }
        tracing::debug!(
            item = %outcome.item_id,
            status = ?outcome.status,
            savings = outcome.recommendation.total_savings,
            "item pipeline finished"
        );
        outcome
    }

    /// Same-brand, same-category, same-color candidates for the matched
    /// product. Lookup failures degrade to an empty candidate set.
    async fn replacement_candidates(&self, priced: &PricedLineItem) -> Vec<catalog::CatalogProduct> {
        let Some(product) = priced.match_result.product.as_ref() else {
            return Vec::new();
        };
        let lookup = self.catalog.find_replacement_candidates(
            &product.brand,
            product.category,
            product.color,
            product.family.as_deref(),
        );
        match tokio::time::timeout(self.port_timeout(), lookup).await {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(err)) => {
                tracing::warn!(
                    item = %priced.item.id,
                    error = %err,
                    "replacement lookup failed, keeping current selection"
                );
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    item = %priced.item.id,
                    timeout_secs = self.cfg.port_timeout_secs,
                    "replacement lookup timed out, keeping current selection"
                );
                Vec::new()
            }
        }
    }

    /// Process one batch with bounded concurrent fan-out.
    ///
    /// Items share no mutable state; aggregation happens after the join.
    /// Results are keyed by line-item id, not arrival order.
    pub async fn process_batch(&self, items: Vec<LineItem>) -> Result<BatchResult, PipelineError> {
        self.probe_catalog().await?;

        let started = Instant::now();
        let mut progress = BatchProgress::new(items.len());
        let semaphore = Arc::new(Semaphore::new(self.cfg.max_concurrency));
        let mut tasks = JoinSet::new();

        for item in items {
            let engine = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                // Closing the semaphore is not part of this engine's
                // lifecycle, so acquisition cannot fail.
                let _permit = semaphore.acquire_owned().await;
                engine.process_item(item).await
            });
        }

        let mut outcomes = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    progress.record(outcome.status);
                    outcomes.insert(outcome.item_id.clone(), outcome);
                }
                Err(err) => {
                    tracing::error!(error = %err, "item task failed to join");
                }
            }
        }

        let summary = summarize(outcomes.values());
        tracing::info!(
            items = summary.items_total,
            matched = summary.items_matched,
            savings = summary.total_savings,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );
        Ok(BatchResult {
            outcomes,
            summary,
            progress,
        })
    }

    async fn probe_catalog(&self) -> Result<(), PipelineError> {
        match tokio::time::timeout(self.port_timeout(), self.catalog.probe()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(PipelineError::CatalogUnavailable(err.to_string())),
            Err(_) => Err(PipelineError::CatalogUnavailable(
                CatalogError::Timeout(self.cfg.port_timeout_secs * 1000).to_string(),
            )),
        }
    }
}
