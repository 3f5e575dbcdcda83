//! In-memory share backend.
//!
//! Keeps every shared summary in a list, useful for tests and headless
//! harnesses where nothing should leave the process.

use crate::{ShareError, ShareFactory, ShareInterface, ShareRegistry};
use async_trait::async_trait;
use bites_types::{ConfigSchema, ImplementationRegistry, OrderSummary, Schema, ValidationError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle onto the summaries recorded by a [`MemoryShare`].
pub type SharedSummaries = Arc<RwLock<Vec<OrderSummary>>>;

/// In-memory share implementation.
pub struct MemoryShare {
	/// Summaries shared so far, oldest first.
	shared: SharedSummaries,
}

impl MemoryShare {
	/// Creates a new MemoryShare instance.
	pub fn new() -> Self {
		Self {
			shared: Arc::new(RwLock::new(Vec::new())),
		}
	}

	/// Returns a handle that observes everything shared through this backend.
	pub fn handle(&self) -> SharedSummaries {
		Arc::clone(&self.shared)
	}
}

impl Default for MemoryShare {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl ShareInterface for MemoryShare {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryShareSchema)
	}

	async fn share(&self, summary: &OrderSummary) -> Result<String, ShareError> {
		let mut shared = self.shared.write().await;
		shared.push(summary.clone());
		Ok(format!("kept in memory ({} shared)", shared.len()))
	}
}

/// Configuration schema for MemoryShare.
pub struct MemoryShareSchema;

impl ConfigSchema for MemoryShareSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// No fields
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create a memory share backend from configuration.
pub fn create_share(config: &toml::Value) -> Result<Box<dyn ShareInterface>, ShareError> {
	MemoryShareSchema
		.validate(config)
		.map_err(|e| ShareError::Configuration(format!("Invalid memory share config: {}", e)))?;
	Ok(Box::new(MemoryShare::new()))
}

/// Registry for the memory share implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = ShareFactory;

	fn factory() -> Self::Factory {
		create_share
	}
}

impl ShareRegistry for Registry {}
