//! Workspace umbrella crate for Cartwise.
//!
//! Cartwise takes a customer's itemized supplies order, resolves each line
//! item against a supplier catalog, decides whether a cheaper or higher-yield
//! compatible replacement exists, and quantifies the financial and
//! environmental benefit of switching.
//!
//! This crate stitches the member crates together: the [`pipeline::Engine`]
//! runs each item through matching, validation, price resolution, the
//! compatibility guardrail, and the optimizer, then [`aggregate::summarize`]
//! folds the outcomes into an order-independent [`aggregate::SavingsSummary`].

pub mod aggregate;
pub mod config;
pub mod metrics;
pub mod pipeline;

pub use catalog::{
    CatalogError, CatalogPort, CatalogProduct, Category, ColorClass, InMemoryCatalog,
    ScoredProduct, YieldClass,
};
pub use embedding::{Embedder, Embedding, EmbeddingConfig, EmbeddingError, StubEmbedder};
pub use extract::{AttributeExtractor, ExtractError, ExtractedAttributes, StubExtractor};
pub use matcher::{
    validate, IdentifierKind, ItemIdentifier, LineItem, MatchCandidate, MatchError, MatchMethod,
    MatchResult, MatcherConfig, ShadowCandidate, TieredMatcher,
};
pub use optimizer::{
    check_pair, filter_candidates, recommend, BlockReason, EnvironmentalImpact, GuardrailConfig,
    Recommendation,
};
pub use pricing::{resolve_price, PriceSource, PricedLineItem, MAX_PLAUSIBLE_UNIT_PRICE};

pub use aggregate::{summarize, BatchProgress, SavingsSummary};
pub use config::{CartwiseConfig, ConfigLoadError};
pub use metrics::{set_engine_metrics, EngineMetrics};
pub use pipeline::{BatchResult, Engine, EngineConfig, ItemOutcome, ItemStatus, PipelineError};
