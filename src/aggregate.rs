//! Order-independent batch aggregation.
//!
//! The summary is a pure fold of sums over per-item outcomes, so reordering
//! the input items yields an identical summary. Baseline spend always
//! includes unmatched and unpriced items at their own contribution, keeping
//! the savings percentage stable across runs with different match rates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use optimizer::EnvironmentalImpact;

use crate::pipeline::{ItemOutcome, ItemStatus};

/// Batch-level financial and environmental totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SavingsSummary {
    /// What the customer pays today, across every line item.
    pub baseline_spend: f64,
    /// What the customer would pay after applying every recommendation.
    pub optimized_spend: f64,
    pub total_savings: f64,
    /// Savings as a percentage of baseline spend; zero for a zero baseline.
    pub savings_pct: f64,
    pub impact: EnvironmentalImpact,
    pub items_total: usize,
    /// Items with a validated catalog match.
    pub items_matched: usize,
    /// Items with a resolved price from any cascade tier.
    pub items_priced: usize,
}

/// Fold per-item outcomes into a batch summary. Sums only, so the result
/// does not depend on iteration order.
pub fn summarize<'a>(outcomes: impl IntoIterator<Item = &'a ItemOutcome>) -> SavingsSummary {
    let mut summary = SavingsSummary::default();
    for outcome in outcomes {
        let baseline = outcome.priced.baseline_total();
        summary.baseline_spend += baseline;
        summary.optimized_spend += baseline - outcome.recommendation.total_savings;
        summary.total_savings += outcome.recommendation.total_savings;
        summary.impact.accumulate(&outcome.recommendation.impact);
        summary.items_total += 1;
        if outcome.priced.match_result.validated {
            summary.items_matched += 1;
        }
        if outcome.priced.unit_price.is_some() {
            summary.items_priced += 1;
        }
    }
    if summary.baseline_spend > 0.0 {
        summary.savings_pct = summary.total_savings / summary.baseline_spend * 100.0;
    }
    summary
}

/// Running per-status counters for one batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchProgress {
    pub items_total: usize,
    pub completed: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub no_pricing: usize,
    pub blocked: usize,
    pub no_change: usize,
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchProgress {
    pub fn new(items_total: usize) -> Self {
        Self {
            items_total,
            completed: 0,
            matched: 0,
            unmatched: 0,
            no_pricing: 0,
            blocked: 0,
            no_change: 0,
            skipped: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, status: ItemStatus) {
        self.completed += 1;
        match status {
            ItemStatus::Matched => self.matched += 1,
            ItemStatus::Unmatched => self.unmatched += 1,
            ItemStatus::NoPricing => self.no_pricing += 1,
            ItemStatus::Blocked => self.blocked += 1,
            ItemStatus::NoChange => self.no_change += 1,
            ItemStatus::Skipped => self.skipped += 1,
        }
        if self.completed >= self.items_total {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.items_total
    }
}
