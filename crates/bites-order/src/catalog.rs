//! Immutable reference data for order flows.
//!
//! The catalog lists what a customer may choose at each step and what a
//! single unit costs. It is built once at startup and shared read-only
//! between flows, so every content rule is checked on construction.

use bites_config::{CatalogConfig, DeliverySource};
use bites_types::Step;
use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;

/// Label format for generated delivery days, e.g. "Mon Jan 5".
const DELIVERY_DAY_FORMAT: &str = "%a %b %-d";

/// Errors raised while building a catalog.
///
/// These are configuration defects; a catalog that builds successfully
/// never produces an error at runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
	#[error("No options configured for the {0} step")]
	EmptyOptions(Step),
	#[error("Quantity options must be positive")]
	ZeroQuantity,
	#[error("Duplicate option for the {step} step: '{value}'")]
	DuplicateOption { step: Step, value: String },
	#[error("Blank option label for the {0} step")]
	BlankOption(Step),
	#[error("Unit price must be positive, got {0}")]
	NonPositivePrice(Decimal),
	#[error("Price of {quantity} units at {unit_price} overflows")]
	PriceOverflow { quantity: u32, unit_price: Decimal },
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Read-only lookup of valid selections and pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
	quantity_options: Vec<u32>,
	unit_price: Decimal,
	restaurant_names: Vec<String>,
	delivery_options: Vec<String>,
}

impl Catalog {
	/// Builds a catalog, rejecting empty, duplicate or non-positive entries.
	pub fn new(
		quantity_options: Vec<u32>,
		unit_price: Decimal,
		restaurant_names: Vec<String>,
		delivery_options: Vec<String>,
	) -> Result<Self, CatalogError> {
		if quantity_options.is_empty() {
			return Err(CatalogError::EmptyOptions(Step::Start));
		}
		if quantity_options.contains(&0) {
			return Err(CatalogError::ZeroQuantity);
		}
		check_unique(Step::Start, quantity_options.iter().map(u32::to_string))?;

		if unit_price <= Decimal::ZERO {
			return Err(CatalogError::NonPositivePrice(unit_price));
		}
		if let Some(&quantity) = quantity_options
			.iter()
			.find(|&&q| Decimal::from(q).checked_mul(unit_price).is_none())
		{
			return Err(CatalogError::PriceOverflow {
				quantity,
				unit_price,
			});
		}

		check_labels(Step::Restaurant, &restaurant_names)?;
		check_labels(Step::Delivery, &delivery_options)?;

		Ok(Self {
			quantity_options,
			unit_price,
			restaurant_names,
			delivery_options,
		})
	}

	/// Builds a catalog from configuration, generating delivery days from today.
	pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
		Self::from_config_on(config, Local::now().date_naive())
	}

	/// Builds a catalog from configuration, generating delivery days from `today`.
	pub fn from_config_on(config: &CatalogConfig, today: NaiveDate) -> Result<Self, CatalogError> {
		let delivery_options = match config
			.delivery_source()
			.map_err(|e| CatalogError::Config(e.to_string()))?
		{
			DeliverySource::Fixed(options) => options.to_vec(),
			DeliverySource::UpcomingDays(days) => {
				let generated = upcoming_delivery_days(today, days);
				tracing::debug!(days, first = ?generated.first(), "Generated delivery days");
				generated
			},
		};

		Self::new(
			config.quantity_options.clone(),
			config.unit_price,
			config.restaurants.clone(),
			delivery_options,
		)
	}

	/// Orderable quantities in display order.
	pub fn quantity_options(&self) -> &[u32] {
		&self.quantity_options
	}

	/// Price of a single unit.
	pub fn unit_price(&self) -> Decimal {
		self.unit_price
	}

	/// Restaurant names in display order.
	pub fn restaurant_names(&self) -> &[String] {
		&self.restaurant_names
	}

	/// Delivery slot labels in display order.
	pub fn delivery_options(&self) -> &[String] {
		&self.delivery_options
	}

	pub fn has_quantity(&self, quantity: u32) -> bool {
		self.quantity_options.contains(&quantity)
	}

	pub fn has_restaurant(&self, name: &str) -> bool {
		self.restaurant_names.iter().any(|r| r == name)
	}

	pub fn has_delivery_option(&self, slot: &str) -> bool {
		self.delivery_options.iter().any(|d| d == slot)
	}

	/// Options offered at a step, rendered as text. Summary offers none.
	pub fn options_for(&self, step: Step) -> Vec<String> {
		match step {
			Step::Start => self.quantity_options.iter().map(u32::to_string).collect(),
			Step::Restaurant => self.restaurant_names.clone(),
			Step::Delivery => self.delivery_options.clone(),
			Step::Summary => Vec::new(),
		}
	}

	/// Price of `quantity` units.
	///
	/// Cannot overflow for listed quantities; `new` checks every one.
	pub fn price_for(&self, quantity: u32) -> Decimal {
		Decimal::from(quantity) * self.unit_price
	}
}

/// Labels for `days` consecutive days starting at `start`.
pub fn upcoming_delivery_days(start: NaiveDate, days: u32) -> Vec<String> {
	(0..days)
		.map(|offset| {
			(start + Duration::days(i64::from(offset)))
				.format(DELIVERY_DAY_FORMAT)
				.to_string()
		})
		.collect()
}

fn check_labels(step: Step, labels: &[String]) -> Result<(), CatalogError> {
	if labels.is_empty() {
		return Err(CatalogError::EmptyOptions(step));
	}
	if labels.iter().any(|l| l.trim().is_empty()) {
		return Err(CatalogError::BlankOption(step));
	}
	check_unique(step, labels.iter().cloned())
}

fn check_unique(step: Step, values: impl Iterator<Item = String>) -> Result<(), CatalogError> {
	let mut seen = HashSet::new();
	for value in values {
		if !seen.insert(value.clone()) {
			return Err(CatalogError::DuplicateOption { step, value });
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use bites_config::ConfigBuilder;

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	fn sample() -> Catalog {
		Catalog::new(
			vec![1, 2, 4],
			Decimal::new(500, 2),
			strings(&["A", "B"]),
			strings(&["Today", "Tomorrow"]),
		)
		.unwrap()
	}

	#[test]
	fn test_lookups() {
		let catalog = sample();

		assert!(catalog.has_quantity(4));
		assert!(!catalog.has_quantity(3));
		assert!(catalog.has_restaurant("B"));
		assert!(!catalog.has_restaurant("b"));
		assert!(catalog.has_delivery_option("Tomorrow"));
		assert_eq!(catalog.price_for(4), Decimal::new(2000, 2));
	}

	#[test]
	fn test_options_for_each_step() {
		let catalog = sample();

		assert_eq!(catalog.options_for(Step::Start), strings(&["1", "2", "4"]));
		assert_eq!(catalog.options_for(Step::Restaurant), strings(&["A", "B"]));
		assert_eq!(
			catalog.options_for(Step::Delivery),
			strings(&["Today", "Tomorrow"])
		);
		assert!(catalog.options_for(Step::Summary).is_empty());
	}

	#[test]
	fn test_rejects_bad_content() {
		let price = Decimal::new(500, 2);

		assert_eq!(
			Catalog::new(vec![], price, strings(&["A"]), strings(&["Today"])),
			Err(CatalogError::EmptyOptions(Step::Start))
		);
		assert_eq!(
			Catalog::new(vec![0, 1], price, strings(&["A"]), strings(&["Today"])),
			Err(CatalogError::ZeroQuantity)
		);
		assert_eq!(
			Catalog::new(vec![1, 1], price, strings(&["A"]), strings(&["Today"])),
			Err(CatalogError::DuplicateOption {
				step: Step::Start,
				value: "1".to_string()
			})
		);
		assert_eq!(
			Catalog::new(vec![1], Decimal::ZERO, strings(&["A"]), strings(&["Today"])),
			Err(CatalogError::NonPositivePrice(Decimal::ZERO))
		);
		assert_eq!(
			Catalog::new(vec![1], price, strings(&["A", "A"]), strings(&["Today"])),
			Err(CatalogError::DuplicateOption {
				step: Step::Restaurant,
				value: "A".to_string()
			})
		);
		assert_eq!(
			Catalog::new(vec![1], price, strings(&["A"]), vec![]),
			Err(CatalogError::EmptyOptions(Step::Delivery))
		);
		assert_eq!(
			Catalog::new(vec![1], price, strings(&["A"]), strings(&[" "])),
			Err(CatalogError::BlankOption(Step::Delivery))
		);
	}

	#[test]
	fn test_rejects_price_that_overflows() {
		let result = Catalog::new(
			vec![1, 2],
			Decimal::MAX,
			strings(&["A"]),
			strings(&["Today"]),
		);
		assert_eq!(
			result,
			Err(CatalogError::PriceOverflow {
				quantity: 2,
				unit_price: Decimal::MAX
			})
		);

		let catalog =
			Catalog::new(vec![1], Decimal::MAX, strings(&["A"]), strings(&["Today"])).unwrap();
		assert_eq!(catalog.price_for(1), Decimal::MAX);
	}

	#[test]
	fn test_upcoming_delivery_days() {
		let start = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap();
		assert_eq!(
			upcoming_delivery_days(start, 4),
			strings(&["Fri Jan 30", "Sat Jan 31", "Sun Feb 1", "Mon Feb 2"])
		);
	}

	#[test]
	fn test_from_config_with_generated_days() {
		let config = ConfigBuilder::new().upcoming_days(2).build();
		let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

		let catalog = Catalog::from_config_on(&config.catalog, today).unwrap();
		assert_eq!(catalog.delivery_options(), strings(&["Sun Oct 18", "Mon Oct 19"]));
		assert_eq!(catalog.unit_price(), Decimal::new(500, 2));
	}

	#[test]
	fn test_from_config_with_fixed_slots() {
		let config = ConfigBuilder::new()
			.delivery_options(["Lunch", "Dinner"])
			.build();

		let catalog = Catalog::from_config(&config.catalog).unwrap();
		assert_eq!(catalog.delivery_options(), strings(&["Lunch", "Dinner"]));
		assert_eq!(catalog.restaurant_names(), strings(&["A", "B"]));
	}
}
