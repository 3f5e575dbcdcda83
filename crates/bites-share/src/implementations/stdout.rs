//! Standard output share backend.

use crate::{render, ShareError, ShareFactory, ShareInterface, ShareRegistry};
use async_trait::async_trait;
use bites_types::{ConfigSchema, ImplementationRegistry, OrderSummary, Schema, ValidationError};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Share backend that prints the summary to a writer, stdout by default.
pub struct StdoutShare<W = tokio::io::Stdout> {
	writer: Mutex<W>,
}

impl StdoutShare {
	/// Creates a backend printing to the process's standard output.
	pub fn new() -> Self {
		Self::with_writer(tokio::io::stdout())
	}
}

impl Default for StdoutShare {
	fn default() -> Self {
		Self::new()
	}
}

impl<W> StdoutShare<W>
where
	W: AsyncWrite + Unpin + Send,
{
	pub fn with_writer(writer: W) -> Self {
		Self {
			writer: Mutex::new(writer),
		}
	}

	/// Consumes the backend and returns the writer.
	pub fn into_writer(self) -> W {
		self.writer.into_inner()
	}
}

#[async_trait]
impl<W> ShareInterface for StdoutShare<W>
where
	W: AsyncWrite + Unpin + Send,
{
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(StdoutShareSchema)
	}

	async fn share(&self, summary: &OrderSummary) -> Result<String, ShareError> {
		let mut writer = self.writer.lock().await;
		writer.write_all(b"\n").await?;
		writer.write_all(render(summary).as_bytes()).await?;
		writer.flush().await?;
		Ok("printed to standard output".to_string())
	}
}

/// Configuration schema for StdoutShare.
pub struct StdoutShareSchema;

impl ConfigSchema for StdoutShareSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create a stdout share backend from configuration.
pub fn create_share(config: &toml::Value) -> Result<Box<dyn ShareInterface>, ShareError> {
	StdoutShareSchema
		.validate(config)
		.map_err(|e| ShareError::Configuration(format!("Invalid stdout share config: {}", e)))?;
	Ok(Box::new(StdoutShare::new()))
}

/// Registry for the stdout share implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "stdout";
	type Factory = ShareFactory;

	fn factory() -> Self::Factory {
		create_share
	}
}

impl ShareRegistry for Registry {}
