//! The mutable order record built during one traversal of the flow.

use crate::Catalog;
use bites_types::{OrderSnapshot, Step};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by order setters and by summary formatting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
	#[error("'{value}' is not a valid {step} option")]
	InvalidSelection { step: Step, value: String },
	#[error("Cannot select {step} before {requires}")]
	OutOfSequence { step: Step, requires: Step },
	#[error("Order is incomplete: {missing} not selected")]
	IncompleteOrder { missing: Step },
}

/// An order in progress.
///
/// Fields are only ever filled in step order, and `subtotal` is recomputed
/// in the same call that sets `quantity`. Setters validate before touching
/// any field, so a failed call leaves the order as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
	id: String,
	quantity: Option<u32>,
	restaurant: Option<String>,
	delivery_option: Option<String>,
	subtotal: Option<Decimal>,
}

impl Default for Order {
	fn default() -> Self {
		Self::new()
	}
}

impl Order {
	/// Creates an empty order with a fresh identifier.
	pub fn new() -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			quantity: None,
			restaurant: None,
			delivery_option: None,
			subtotal: None,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn quantity(&self) -> Option<u32> {
		self.quantity
	}

	pub fn restaurant(&self) -> Option<&str> {
		self.restaurant.as_deref()
	}

	pub fn delivery_option(&self) -> Option<&str> {
		self.delivery_option.as_deref()
	}

	pub fn subtotal(&self) -> Option<Decimal> {
		self.subtotal
	}

	/// Sets the quantity and recomputes the subtotal.
	pub fn set_quantity(&mut self, catalog: &Catalog, quantity: u32) -> Result<(), OrderError> {
		if !catalog.has_quantity(quantity) {
			return Err(OrderError::InvalidSelection {
				step: Step::Start,
				value: quantity.to_string(),
			});
		}

		self.quantity = Some(quantity);
		self.subtotal = Some(catalog.price_for(quantity));
		Ok(())
	}

	/// Sets the restaurant. Requires a quantity.
	pub fn set_restaurant(&mut self, catalog: &Catalog, name: &str) -> Result<(), OrderError> {
		if self.quantity.is_none() {
			return Err(OrderError::OutOfSequence {
				step: Step::Restaurant,
				requires: Step::Start,
			});
		}
		if !catalog.has_restaurant(name) {
			return Err(OrderError::InvalidSelection {
				step: Step::Restaurant,
				value: name.to_string(),
			});
		}

		self.restaurant = Some(name.to_string());
		Ok(())
	}

	/// Sets the delivery slot. Requires a restaurant.
	pub fn set_delivery_option(&mut self, catalog: &Catalog, slot: &str) -> Result<(), OrderError> {
		if self.restaurant.is_none() {
			return Err(OrderError::OutOfSequence {
				step: Step::Delivery,
				requires: Step::Restaurant,
			});
		}
		if !catalog.has_delivery_option(slot) {
			return Err(OrderError::InvalidSelection {
				step: Step::Delivery,
				value: slot.to_string(),
			});
		}

		self.delivery_option = Some(slot.to_string());
		Ok(())
	}

	/// Clears every field and mints a new identifier.
	pub fn reset(&mut self) {
		*self = Self::new();
	}

	pub fn is_empty(&self) -> bool {
		self.quantity.is_none() && self.restaurant.is_none() && self.delivery_option.is_none()
	}

	pub fn is_complete(&self) -> bool {
		self.first_missing().is_none()
	}

	/// The earliest step whose selection is still unset.
	pub fn first_missing(&self) -> Option<Step> {
		if self.quantity.is_none() {
			Some(Step::Start)
		} else if self.restaurant.is_none() {
			Some(Step::Restaurant)
		} else if self.delivery_option.is_none() {
			Some(Step::Delivery)
		} else {
			None
		}
	}

	/// Whether the selection owned by `step` is set. Summary owns none.
	pub fn has_selection(&self, step: Step) -> bool {
		match step {
			Step::Start => self.quantity.is_some(),
			Step::Restaurant => self.restaurant.is_some(),
			Step::Delivery => self.delivery_option.is_some(),
			Step::Summary => true,
		}
	}

	pub fn snapshot(&self) -> OrderSnapshot {
		OrderSnapshot {
			id: self.id.clone(),
			quantity: self.quantity,
			restaurant: self.restaurant.clone(),
			delivery_option: self.delivery_option.clone(),
			subtotal: self.subtotal,
		}
	}
}
