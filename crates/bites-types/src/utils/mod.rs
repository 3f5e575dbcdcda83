//! Utility functions shared across the BuffBites crates.

pub mod formatting;

pub use formatting::{format_price, truncate_id, PRICE_DECIMAL_PLACES};
