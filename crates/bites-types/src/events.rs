//! Event types for observing an order flow.
//!
//! The order flow itself is synchronous and query-driven; events are an
//! optional notification channel for presentation layers and logs that
//! want to react to changes instead of polling snapshots.

use crate::{FlowAction, OrderSummary, Step};
use serde::{Deserialize, Serialize};

/// Events published by an order flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlowEvent {
	/// A selection was recorded for a step.
	SelectionChanged {
		order_id: String,
		step: Step,
		value: String,
	},
	/// The active step changed.
	StepChanged { from: Step, to: Step },
	/// The order was discarded and replaced by a fresh empty one.
	OrderReset {
		previous_order_id: String,
		order_id: String,
	},
	/// A completed order was summarized for sharing.
	OrderSent { summary: OrderSummary },
	/// A requested transition was refused.
	TransitionRejected {
		step: Step,
		action: FlowAction,
		reason: String,
	},
}
