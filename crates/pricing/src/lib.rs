//! Cartwise price resolution.
//!
//! Determines the price a customer is effectively paying today for one line
//! item, via a fixed fallback cascade: the customer's own extracted price,
//! then the catalog partner list price, then marked-up catalog unit price,
//! then marked-up wholesale cost. Estimated sources carry a disclosure
//! message so downstream rendering can flag them as assumptions.
//!
//! Price resolution is total: it never fails, it only degrades to
//! [`PriceSource::Unavailable`]. Unpriced items still count in the batch
//! baseline at a zero contribution.

pub mod resolve;
pub mod types;

pub use resolve::{resolve_price, ESTIMATED_MARKUP, MAX_PLAUSIBLE_UNIT_PRICE};
pub use types::{PriceSource, PricedLineItem};
