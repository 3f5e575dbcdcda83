//! Order flow types for the BuffBites system.
//!
//! This module defines the linear sequence of steps a user walks through
//! while building an order, the actions an adapter may forward to the flow,
//! and the read-only views handed out while an order is in progress and
//! once it is ready to share.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named stage in the order-building sequence.
///
/// Steps are totally ordered and never branch: Start -> Restaurant ->
/// Delivery -> Summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
	/// Choosing how many units to order.
	Start,
	/// Choosing the restaurant.
	Restaurant,
	/// Choosing the delivery time slot.
	Delivery,
	/// Reviewing and sending the completed order.
	Summary,
}

impl Step {
	/// The canonical order of steps.
	pub const ORDER: [Step; 4] = [Step::Start, Step::Restaurant, Step::Delivery, Step::Summary];

	/// Returns the 0-based position of this step in the sequence.
	pub fn index(self) -> usize {
		match self {
			Step::Start => 0,
			Step::Restaurant => 1,
			Step::Delivery => 2,
			Step::Summary => 3,
		}
	}

	/// Returns the step after this one, or None at the end of the sequence.
	pub fn next(self) -> Option<Step> {
		Self::ORDER.get(self.index() + 1).copied()
	}

	/// Returns the step before this one, or None at the start of the sequence.
	pub fn previous(self) -> Option<Step> {
		self.index().checked_sub(1).map(|i| Self::ORDER[i])
	}

	/// Returns true if this step comes strictly before `other`.
	pub fn is_before(self, other: Step) -> bool {
		self.index() < other.index()
	}

	/// Screen title shown by presentation adapters.
	pub fn title(self) -> &'static str {
		match self {
			Step::Start => "Start Order",
			Step::Restaurant => "Choose Meal",
			Step::Delivery => "Choose Delivery Time",
			Step::Summary => "Order Summary",
		}
	}

	/// Stable lowercase identifier used in logs and commands.
	pub fn as_str(self) -> &'static str {
		match self {
			Step::Start => "start",
			Step::Restaurant => "restaurant",
			Step::Delivery => "delivery",
			Step::Summary => "summary",
		}
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Step {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"start" | "quantity" => Ok(Step::Start),
			"restaurant" => Ok(Step::Restaurant),
			"delivery" => Ok(Step::Delivery),
			"summary" => Ok(Step::Summary),
			other => Err(format!("Unknown step: {}", other)),
		}
	}
}

/// User intents a presentation adapter forwards to the order flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowAction {
	/// Record a selection for the active step.
	Select,
	/// Advance to the following step.
	Next,
	/// Return to the previous step without clearing anything.
	Back,
	/// Discard the order and restart.
	Cancel,
	/// Format the completed order and hand it off for sharing.
	Send,
}

impl fmt::Display for FlowAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FlowAction::Select => write!(f, "select"),
			FlowAction::Next => write!(f, "next"),
			FlowAction::Back => write!(f, "back"),
			FlowAction::Cancel => write!(f, "cancel"),
			FlowAction::Send => write!(f, "send"),
		}
	}
}

/// Read-only view of an in-progress order.
///
/// Handed to presentation adapters for rendering; mutating it has no effect
/// on the order it was taken from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
	/// Identifier of the order this snapshot was taken from.
	pub id: String,
	/// Selected quantity, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quantity: Option<u32>,
	/// Selected restaurant, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub restaurant: Option<String>,
	/// Selected delivery time slot, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_option: Option<String>,
	/// Quantity multiplied by the unit price, present whenever quantity is.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subtotal: Option<Decimal>,
}

impl OrderSnapshot {
	/// Returns true if no selection has been recorded.
	pub fn is_empty(&self) -> bool {
		self.quantity.is_none() && self.restaurant.is_none() && self.delivery_option.is_none()
	}

	/// Returns true if every required selection has been recorded.
	pub fn is_complete(&self) -> bool {
		self.quantity.is_some() && self.restaurant.is_some() && self.delivery_option.is_some()
	}

	/// Returns the value recorded for the given step, rendered as text.
	pub fn selection_for(&self, step: Step) -> Option<String> {
		match step {
			Step::Start => self.quantity.map(|q| q.to_string()),
			Step::Restaurant => self.restaurant.clone(),
			Step::Delivery => self.delivery_option.clone(),
			Step::Summary => None,
		}
	}
}

/// Text produced from a completed order for external sharing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
	/// Identifier of the order that was summarized.
	pub order_id: String,
	/// Short label used as the share subject.
	pub subject: String,
	/// Multi-line description of the order.
	pub body: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_step_navigation() {
		assert_eq!(Step::Start.next(), Some(Step::Restaurant));
		assert_eq!(Step::Restaurant.next(), Some(Step::Delivery));
		assert_eq!(Step::Delivery.next(), Some(Step::Summary));
		assert_eq!(Step::Summary.next(), None);

		assert_eq!(Step::Start.previous(), None);
		assert_eq!(Step::Summary.previous(), Some(Step::Delivery));

		assert!(Step::Start.is_before(Step::Delivery));
		assert!(!Step::Summary.is_before(Step::Restaurant));
	}

	#[test]
	fn test_step_parsing() {
		assert_eq!("Restaurant".parse::<Step>().unwrap(), Step::Restaurant);
		assert_eq!(" quantity ".parse::<Step>().unwrap(), Step::Start);
		assert!("checkout".parse::<Step>().is_err());
	}

	#[test]
	fn test_snapshot_selection_for() {
		let snapshot = OrderSnapshot {
			id: "order-1".to_string(),
			quantity: Some(2),
			restaurant: Some("Ramen".to_string()),
			delivery_option: None,
			subtotal: Some(Decimal::new(1000, 2)),
		};

		assert_eq!(snapshot.selection_for(Step::Start).as_deref(), Some("2"));
		assert_eq!(
			snapshot.selection_for(Step::Restaurant).as_deref(),
			Some("Ramen")
		);
		assert_eq!(snapshot.selection_for(Step::Delivery), None);
		assert!(!snapshot.is_complete());
		assert!(!snapshot.is_empty());
	}

	#[test]
	fn test_snapshot_serialization_skips_unset_fields() {
		let snapshot = OrderSnapshot {
			id: "order-1".to_string(),
			..Default::default()
		};

		let json = serde_json::to_value(&snapshot).unwrap();
		assert_eq!(json, serde_json::json!({ "id": "order-1" }));
	}
}
