//! Common types module for the BuffBites ordering system.
//!
//! This module defines the data types shared by every BuffBites crate: the
//! steps of the order flow, read-only order views, share payloads, flow
//! events, and the configuration validation framework used by pluggable
//! implementations.

/// Flow events published to observers of an order flow.
pub mod events;
/// Order flow types: steps, actions, snapshots and summaries.
pub mod order;
/// Registry trait implemented by every pluggable implementation.
pub mod registry;
/// Utility functions for display formatting.
pub mod utils;
/// Configuration validation types for implementation-specific TOML tables.
pub mod validation;

// Re-export all types for convenient access
pub use events::*;
pub use order::*;
pub use registry::*;
pub use utils::{format_price, truncate_id};
pub use validation::*;
