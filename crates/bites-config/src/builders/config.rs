//! Configuration builder for tests and headless harnesses.
//!
//! Produces a `Config` without touching the filesystem. Defaults describe a
//! small two-restaurant catalog shared through the in-memory backend.

use crate::{AppConfig, CatalogConfig, Config, ShareConfig, SummaryConfig};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	app_name: String,
	unit_price: Decimal,
	quantity_options: Vec<u32>,
	restaurants: Vec<String>,
	delivery_options: Option<Vec<String>>,
	upcoming_days: Option<u32>,
	summary: SummaryConfig,
	share_primary: String,
	share_implementations: HashMap<String, toml::Value>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		let mut share_implementations = HashMap::new();
		share_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::Table::new()),
		);

		Self {
			app_name: "BuffBites".to_string(),
			unit_price: Decimal::new(500, 2),
			quantity_options: vec![1, 2, 4],
			restaurants: vec!["A".to_string(), "B".to_string()],
			delivery_options: Some(vec!["Today".to_string(), "Tomorrow".to_string()]),
			upcoming_days: None,
			summary: SummaryConfig::default(),
			share_primary: "memory".to_string(),
			share_implementations,
		}
	}

	/// Sets the application name.
	pub fn app_name(mut self, name: impl Into<String>) -> Self {
		self.app_name = name.into();
		self
	}

	/// Sets the unit price.
	pub fn unit_price(mut self, price: Decimal) -> Self {
		self.unit_price = price;
		self
	}

	/// Sets the orderable quantities.
	pub fn quantity_options(mut self, options: Vec<u32>) -> Self {
		self.quantity_options = options;
		self
	}

	/// Sets the restaurant names.
	pub fn restaurants<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
		self.restaurants = names.into_iter().map(Into::into).collect();
		self
	}

	/// Uses a fixed list of delivery slots.
	pub fn delivery_options<S: Into<String>>(mut self, slots: impl IntoIterator<Item = S>) -> Self {
		self.delivery_options = Some(slots.into_iter().map(Into::into).collect());
		self.upcoming_days = None;
		self
	}

	/// Generates delivery slots for the given number of days.
	pub fn upcoming_days(mut self, days: u32) -> Self {
		self.upcoming_days = Some(days);
		self.delivery_options = None;
		self
	}

	/// Sets the summary subject line.
	pub fn subject(mut self, subject: impl Into<String>) -> Self {
		self.summary.subject = subject.into();
		self
	}

	/// Sets the currency symbol.
	pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
		self.summary.currency_symbol = symbol.into();
		self
	}

	/// Adds a share implementation and makes it primary.
	pub fn share(mut self, name: impl Into<String>, config: toml::Value) -> Self {
		let name = name.into();
		self.share_implementations.insert(name.clone(), config);
		self.share_primary = name;
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			app: AppConfig {
				name: self.app_name,
			},
			catalog: CatalogConfig {
				unit_price: self.unit_price,
				quantity_options: self.quantity_options,
				restaurants: self.restaurants,
				delivery_options: self.delivery_options,
				upcoming_days: self.upcoming_days,
			},
			summary: self.summary,
			share: ShareConfig {
				primary: self.share_primary,
				implementations: self.share_implementations,
			},
		}
	}
}
