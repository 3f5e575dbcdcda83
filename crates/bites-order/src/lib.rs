//! Order state for the BuffBites ordering system.
//!
//! This crate holds the two data halves of an order flow: the immutable
//! [`Catalog`] every selection is validated against, and the mutable
//! [`Order`] record that accumulates those selections in step order.

pub mod catalog;
pub mod order;

pub use catalog::{upcoming_delivery_days, Catalog, CatalogError};
pub use order::{Order, OrderError};
