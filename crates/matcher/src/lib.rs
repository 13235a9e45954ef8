//! # Cartwise Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` resolves one normalized order line item to zero-or-one supplier
//! catalog product. It sits on top of the three external ports (catalog
//! lookup, embedding, attribute extraction) and applies a fixed-priority
//! cascade of matching strategies followed by a strict acceptance gate.
//!
//! The design is two-phase on purpose:
//!
//! - [`TieredMatcher`] explores: nine strategies run in strict priority
//!   order, each returning `(candidate, method, score)`, short-circuiting as
//!   soon as one produces a perfect-score candidate.
//! - [`validate`] commits: only exact-identifier or exact-name hits with score
//!   `1.0` are trusted. Every other method, including a 0.95-confidence
//!   fuzzy hit, may *propose* but never *commit*; the best rejected
//!   proposal is preserved on the result as an informational shadow.
//!
//! The gate was introduced after high-confidence fuzzy matches caused wrong
//! product purchases. Do not loosen it without a product-level decision.
//!
//! ## Core Types
//!
//! - [`LineItem`]: the immutable input record (name, tagged identifiers,
//!   quantity, optional price, extraction confidence).
//! - [`MatchMethod`]: which strategy found a candidate.
//! - [`MatchCandidate`]: a catalog product + method + score in `[0, 1]`.
//! - [`MatchResult`]: the committed outcome; `validated` is true only for
//!   exact corroboration.
//! - [`MatcherConfig`]: tuning knobs (semantic floor, search limits).

pub mod engine;
pub mod types;
pub mod validator;

pub use crate::engine::TieredMatcher;
pub use crate::types::{
    IdentifierKind, ItemIdentifier, LineItem, MatchCandidate, MatchError, MatchMethod,
    MatchResult, MatcherConfig, ShadowCandidate,
};
pub use crate::validator::validate;
