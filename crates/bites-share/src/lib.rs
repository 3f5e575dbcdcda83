//! Share module for the BuffBites ordering system.
//!
//! A completed order is summarized by the core and then handed to a share
//! backend, the stand-in for a platform share sheet. Backends are pluggable
//! and selected by name from the `[share]` configuration section.

use async_trait::async_trait;
use bites_types::{ConfigSchema, ImplementationRegistry, OrderSummary};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
	pub mod stdout;
}

/// Errors that can occur while sharing a summary.
#[derive(Debug, Error)]
pub enum ShareError {
	/// Error reported by the share backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// Error writing the summary out.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Trait implemented by every share backend.
///
/// `share` returns a short human-readable receipt describing where the
/// summary went, such as a file path.
#[async_trait]
pub trait ShareInterface: Send + Sync {
	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Hands the summary to the external destination.
	async fn share(&self, summary: &OrderSummary) -> Result<String, ShareError>;
}

/// Type alias for share factory functions.
pub type ShareFactory = fn(&toml::Value) -> Result<Box<dyn ShareInterface>, ShareError>;

/// Registry trait for share implementations.
pub trait ShareRegistry: ImplementationRegistry<Factory = ShareFactory> {}

/// Get all registered share implementations.
///
/// Returns a vector of (name, factory) tuples for all available share implementations.
pub fn get_all_implementations() -> Vec<(&'static str, ShareFactory)> {
	use implementations::{file, memory, stdout};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
		(stdout::Registry::NAME, stdout::Registry::factory()),
	]
}

/// Service that forwards summaries to the configured backend.
pub struct ShareService {
	backend: Box<dyn ShareInterface>,
	name: String,
}

impl ShareService {
	/// Creates a new ShareService around the named backend.
	pub fn new(name: impl Into<String>, backend: Box<dyn ShareInterface>) -> Self {
		Self {
			backend,
			name: name.into(),
		}
	}

	/// Name of the backend in use.
	pub fn backend_name(&self) -> &str {
		&self.name
	}

	/// Shares a summary and logs the outcome.
	pub async fn share(&self, summary: &OrderSummary) -> Result<String, ShareError> {
		match self.backend.share(summary).await {
			Ok(receipt) => {
				tracing::info!(
					order_id = %bites_types::truncate_id(&summary.order_id),
					backend = %self.name,
					receipt = %receipt,
					"Shared order"
				);
				Ok(receipt)
			},
			Err(e) => {
				tracing::error!(
					order_id = %bites_types::truncate_id(&summary.order_id),
					backend = %self.name,
					error = %e,
					"Failed to share order"
				);
				Err(e)
			},
		}
	}
}

/// Renders a summary as plain text, subject first.
pub(crate) fn render(summary: &OrderSummary) -> String {
	format!("{}\n\n{}\n", summary.subject, summary.body)
}
