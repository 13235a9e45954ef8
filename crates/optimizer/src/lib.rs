//! Cartwise replacement optimizer.
//!
//! Given a priced, validated line item and a set of same-family catalog
//! candidates, decides whether a compatible higher-yield or lower-cost
//! replacement exists and quantifies the financial and environmental gain
//! of switching.
//!
//! Two stages:
//!
//! - [`guardrail`] vetoes unsafe substitutions outright. Every rule is a
//!   hard stop; a blocked candidate is never surfaced as a recommendation.
//! - [`savings`] ranks the survivors by cost per page, sizes the replacement
//!   order to cover the same page volume, and computes savings and
//!   environmental deltas. Negative savings collapse to a "no change"
//!   recommendation.

pub mod environment;
pub mod guardrail;
pub mod savings;

pub use environment::{impact_for, EnvironmentalImpact, TREE_ABSORPTION_KG_PER_YEAR};
pub use guardrail::{check_pair, filter_candidates, BlockReason, GuardrailConfig};
pub use savings::{cost_per_page, recommend, street_price, Recommendation};
