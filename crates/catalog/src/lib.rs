//! Cartwise supplier catalog.
//!
//! This crate defines the read-only product catalog the matching engine runs
//! against: the [`CatalogProduct`] record, the [`CatalogPort`] lookup trait,
//! and [`InMemoryCatalog`], a snapshot-backed implementation suitable for
//! tests and single-run batch jobs.
//!
//! The catalog is a snapshot: products are loaded once per run and never
//! mutated by the engine. Every lookup method is deterministic: equal-score
//! hits are tie-broken by SKU so repeated runs return identical orderings.

pub mod memory;
pub mod port;
pub mod product;
pub mod text;

pub use memory::InMemoryCatalog;
pub use port::{CatalogError, CatalogPort, ScoredProduct};
pub use product::{CatalogProduct, Category, ColorClass, YieldClass};
pub use text::{normalize_identifier, squash_identifier, tokenize_terms};
