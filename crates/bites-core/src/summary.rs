//! Turns a completed order into a shareable subject and body.

use bites_config::SummaryConfig;
use bites_order::{Order, OrderError};
use bites_types::{format_price, OrderSummary, Step};

/// Pure formatter for completed orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFormatter {
	subject: String,
	currency_symbol: String,
}

impl Default for SummaryFormatter {
	fn default() -> Self {
		Self::from_config(&SummaryConfig::default())
	}
}

impl SummaryFormatter {
	pub fn new(subject: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
		Self {
			subject: subject.into(),
			currency_symbol: currency_symbol.into(),
		}
	}

	pub fn from_config(config: &SummaryConfig) -> Self {
		Self::new(config.subject.clone(), config.currency_symbol.clone())
	}

	pub fn currency_symbol(&self) -> &str {
		&self.currency_symbol
	}

	/// Formats `order`, which must be complete.
	///
	/// The body lists one `Label: value` line per field, ending with the
	/// subtotal at two decimal places.
	pub fn format(&self, order: &Order) -> Result<OrderSummary, OrderError> {
		let (Some(quantity), Some(restaurant), Some(delivery), Some(subtotal)) = (
			order.quantity(),
			order.restaurant(),
			order.delivery_option(),
			order.subtotal(),
		) else {
			return Err(OrderError::IncompleteOrder {
				missing: order.first_missing().unwrap_or(Step::Start),
			});
		};

		let body = format!(
			"Quantity: {}\nRestaurant: {}\nDelivery: {}\nSubtotal: {}",
			quantity,
			restaurant,
			delivery,
			format_price(subtotal, &self.currency_symbol)
		);

		Ok(OrderSummary {
			order_id: order.id().to_string(),
			subject: self.subject.clone(),
			body,
		})
	}
}
