//! Configuration module for the BuffBites ordering system.
//!
//! This module loads the catalog (quantities, restaurants, delivery slots and
//! unit price), the summary presentation settings and the share backend
//! selection from TOML. Configuration is loaded once at startup and never
//! changes while an order flow is running.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["catalog.toml", "share.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

pub mod builders;
mod loader;

pub use builders::config::ConfigBuilder;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of generated delivery days accepted.
pub const MAX_UPCOMING_DAYS: u32 = 14;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for BuffBites.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Application identity.
	pub app: AppConfig,
	/// Reference data the order flow validates selections against.
	pub catalog: CatalogConfig,
	/// How completed orders are rendered for sharing.
	#[serde(default)]
	pub summary: SummaryConfig,
	/// Which share backend receives completed orders.
	pub share: ShareConfig,
}

/// Application identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
	/// Display name of the application.
	pub name: String,
}

/// Catalog reference data.
///
/// Content rules (positive quantities, unique names, positive price) are
/// enforced when the catalog is built; this section only carries the data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
	/// Price of a single unit.
	pub unit_price: Decimal,
	/// Quantities a customer may order, in display order.
	pub quantity_options: Vec<u32>,
	/// Restaurant names, in display order.
	pub restaurants: Vec<String>,
	/// Fixed delivery slot labels. Mutually exclusive with `upcoming_days`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery_options: Option<Vec<String>>,
	/// Generate one delivery slot per day starting today.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub upcoming_days: Option<u32>,
}

/// Where the delivery slot labels come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliverySource<'a> {
	/// Labels listed verbatim in the configuration.
	Fixed(&'a [String]),
	/// Labels generated for this many consecutive days.
	UpcomingDays(u32),
}

impl CatalogConfig {
	/// Returns the configured delivery slot source.
	///
	/// Exactly one of `delivery_options` and `upcoming_days` must be set.
	pub fn delivery_source(&self) -> Result<DeliverySource<'_>, ConfigError> {
		match (&self.delivery_options, self.upcoming_days) {
			(Some(options), None) => Ok(DeliverySource::Fixed(options)),
			(None, Some(days)) => Ok(DeliverySource::UpcomingDays(days)),
			(Some(_), Some(_)) => Err(ConfigError::Validation(
				"catalog.delivery_options and catalog.upcoming_days are mutually exclusive"
					.into(),
			)),
			(None, None) => Err(ConfigError::Validation(
				"catalog requires either delivery_options or upcoming_days".into(),
			)),
		}
	}
}

/// Summary presentation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummaryConfig {
	/// Subject line used when sharing an order.
	#[serde(default = "default_subject")]
	pub subject: String,
	/// Currency symbol placed before prices.
	#[serde(default = "default_currency_symbol")]
	pub currency_symbol: String,
}

impl Default for SummaryConfig {
	fn default() -> Self {
		Self {
			subject: default_subject(),
			currency_symbol: default_currency_symbol(),
		}
	}
}

fn default_subject() -> String {
	"New order".to_string()
}

fn default_currency_symbol() -> String {
	"$".to_string()
}

/// Configuration for share backends.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShareConfig {
	/// Which implementation receives completed orders.
	pub primary: String,
	/// Map of share implementation names to their raw TOML configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, resolving includes and environment
	/// variables.
	///
	/// Each top-level section must be unique across all configuration files.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let base_dir = path
			.parent()
			.filter(|p| !p.as_os_str().is_empty())
			.unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path.file_name().ok_or_else(|| {
			ConfigError::Validation(format!("Invalid path: {}", path.display()))
		})?;
		loader.load_config(file_name).await
	}

	/// Validates the configuration.
	///
	/// Checks:
	/// - App name is not empty
	/// - Exactly one delivery slot source is configured, within bounds
	/// - Summary subject is not empty
	/// - The primary share backend is one of the configured implementations
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.app.name.trim().is_empty() {
			return Err(ConfigError::Validation("App name cannot be empty".into()));
		}

		if let DeliverySource::UpcomingDays(days) = self.catalog.delivery_source()? {
			if days == 0 || days > MAX_UPCOMING_DAYS {
				return Err(ConfigError::Validation(format!(
					"catalog.upcoming_days must be between 1 and {}",
					MAX_UPCOMING_DAYS
				)));
			}
		}

		if self.summary.subject.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Summary subject cannot be empty".into(),
			));
		}

		if self.share.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one share implementation must be configured".into(),
			));
		}
		if self.share.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Share primary implementation cannot be empty".into(),
			));
		}
		if !self.share.implementations.contains_key(&self.share.primary) {
			return Err(ConfigError::Validation(format!(
				"Primary share '{}' not found in implementations",
				self.share.primary
			)));
		}

		Ok(())
	}
}

/// Parses a TOML string, resolving environment variables and validating the
/// result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
