//! File share backend.
//!
//! Writes each summary to `<directory>/order-<id>.txt`, creating the
//! directory on first use. Sharing the same order twice overwrites the file.

use crate::{render, ShareError, ShareFactory, ShareInterface, ShareRegistry};
use async_trait::async_trait;
use bites_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, OrderSummary, Schema, ValidationError,
};
use std::path::PathBuf;
use tokio::fs;

/// Share backend that writes one text file per order.
pub struct FileShare {
	/// Directory the summaries are written into.
	directory: PathBuf,
}

impl FileShare {
	/// Creates a new FileShare writing into `directory`.
	pub fn new(directory: PathBuf) -> Self {
		Self { directory }
	}

	/// Converts an order id to a filesystem-safe file path.
	fn get_file_path(&self, order_id: &str) -> PathBuf {
		let safe_id = order_id.replace(['/', '\\', ':', '.'], "_");
		self.directory.join(format!("order-{}.txt", safe_id))
	}
}

#[async_trait]
impl ShareInterface for FileShare {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileShareSchema)
	}

	async fn share(&self, summary: &OrderSummary) -> Result<String, ShareError> {
		fs::create_dir_all(&self.directory).await?;

		let path = self.get_file_path(&summary.order_id);
		fs::write(&path, render(summary)).await?;
		tracing::debug!(path = %path.display(), "Wrote order summary");

		Ok(format!("written to {}", path.display()))
	}
}

/// Configuration schema for FileShare.
pub struct FileShareSchema;

impl ConfigSchema for FileShareSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("directory", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(dir) if dir.trim().is_empty() => {
						Err("directory cannot be empty".to_string())
					},
					_ => Ok(()),
				}
			})],
			vec![],
		);
		schema.validate(config)
	}
}

/// Factory function to create a file share backend from configuration.
///
/// Configuration parameters:
/// - `directory`: directory the summaries are written into (required)
pub fn create_share(config: &toml::Value) -> Result<Box<dyn ShareInterface>, ShareError> {
	FileShareSchema
		.validate(config)
		.map_err(|e| ShareError::Configuration(format!("Invalid file share config: {}", e)))?;

	let directory = config
		.get("directory")
		.and_then(|v| v.as_str())
		.ok_or_else(|| ShareError::Configuration("directory is required".into()))?;

	Ok(Box::new(FileShare::new(PathBuf::from(directory))))
}

/// Registry for the file share implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = ShareFactory;

	fn factory() -> Self::Factory {
		create_share
	}
}

impl ShareRegistry for Registry {}
