//! Order flow controller.
//!
//! Sequences the steps Start -> Restaurant -> Delivery -> Summary, routes
//! selections into the owned [`Order`] and refuses any transition whose
//! guard does not hold. Every operation is synchronous; a rejected call
//! leaves both the step and the order exactly as they were.

pub mod transitions;

use crate::event_bus::EventBus;
use crate::summary::SummaryFormatter;
use bites_order::{Catalog, Order, OrderError};
use bites_types::{truncate_id, FlowAction, FlowEvent, OrderSnapshot, OrderSummary, Step};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by flow operations.
///
/// All of them are caller-correctable; the flow is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
	#[error(transparent)]
	Order(#[from] OrderError),
	#[error("Nothing selected for the {0} step yet")]
	MissingSelection(Step),
	#[error("Cannot {action} from the {step} step")]
	InvalidTransition { step: Step, action: FlowAction },
	#[error("The {requested} step is not active (currently at {active}); go back first")]
	StepNotActive { requested: Step, active: Step },
}

/// State machine driving one order at a time.
pub struct OrderFlow {
	catalog: Arc<Catalog>,
	formatter: SummaryFormatter,
	order: Order,
	step: Step,
	event_bus: Option<EventBus>,
}

impl OrderFlow {
	/// Creates a flow at the Start step with an empty order.
	pub fn new(catalog: Arc<Catalog>, formatter: SummaryFormatter) -> Self {
		let order = Order::new();
		tracing::info!(order_id = %truncate_id(order.id()), "Started order");
		Self {
			catalog,
			formatter,
			order,
			step: Step::Start,
			event_bus: None,
		}
	}

	/// Attaches an event bus that receives a [`FlowEvent`] for every change.
	pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
		self.event_bus = Some(event_bus);
		self
	}

	pub fn current_step(&self) -> Step {
		self.step
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	pub fn currency_symbol(&self) -> &str {
		self.formatter.currency_symbol()
	}

	/// Options offered at `step`.
	pub fn available_options(&self, step: Step) -> Vec<String> {
		self.catalog.options_for(step)
	}

	/// Read-only view of the order in progress.
	pub fn snapshot(&self) -> OrderSnapshot {
		self.order.snapshot()
	}

	/// Records a selection for `step`, which must be the active step.
	///
	/// Re-selecting on a step that already has a value replaces it; later
	/// selections are kept.
	pub fn select(&mut self, step: Step, value: &str) -> Result<(), FlowError> {
		self.check_allowed(FlowAction::Select)?;

		if step != self.step {
			let err = if self.step.is_before(step) {
				FlowError::Order(OrderError::OutOfSequence {
					step,
					requires: self.step,
				})
			} else {
				FlowError::StepNotActive {
					requested: step,
					active: self.step,
				}
			};
			return Err(self.reject(FlowAction::Select, err));
		}

		let value = value.trim();
		// quantities are recorded in canonical form, so "02" and "+2" become "2"
		let result = match step {
			Step::Start => match value.parse::<u32>() {
				Ok(quantity) => self
					.order
					.set_quantity(&self.catalog, quantity)
					.map(|()| quantity.to_string()),
				Err(_) => Err(OrderError::InvalidSelection {
					step,
					value: value.to_string(),
				}),
			},
			Step::Restaurant => self
				.order
				.set_restaurant(&self.catalog, value)
				.map(|()| value.to_string()),
			Step::Delivery => self
				.order
				.set_delivery_option(&self.catalog, value)
				.map(|()| value.to_string()),
			Step::Summary => {
				return Err(self.reject(
					FlowAction::Select,
					FlowError::InvalidTransition {
						step,
						action: FlowAction::Select,
					},
				))
			},
		};

		let recorded = match result {
			Ok(recorded) => recorded,
			Err(e) => return Err(self.reject(FlowAction::Select, e.into())),
		};

		tracing::debug!(
			order_id = %truncate_id(self.order.id()),
			step = %step,
			value = %recorded,
			"Recorded selection"
		);
		self.publish(FlowEvent::SelectionChanged {
			order_id: self.order.id().to_string(),
			step,
			value: recorded,
		});
		Ok(())
	}

	/// Moves to the next step once the current step has a selection.
	pub fn advance(&mut self) -> Result<Step, FlowError> {
		self.check_allowed(FlowAction::Next)?;

		if !self.order.has_selection(self.step) {
			let err = FlowError::MissingSelection(self.step);
			return Err(self.reject(FlowAction::Next, err));
		}

		let Some(next) = self.step.next() else {
			let err = FlowError::InvalidTransition {
				step: self.step,
				action: FlowAction::Next,
			};
			return Err(self.reject(FlowAction::Next, err));
		};

		self.move_to(next);
		Ok(next)
	}

	/// Returns to the previous step, keeping every selection.
	pub fn back(&mut self) -> Result<Step, FlowError> {
		self.check_allowed(FlowAction::Back)?;

		let Some(previous) = self.step.previous() else {
			let err = FlowError::InvalidTransition {
				step: self.step,
				action: FlowAction::Back,
			};
			return Err(self.reject(FlowAction::Back, err));
		};

		self.move_to(previous);
		Ok(previous)
	}

	/// Discards the order and returns to Start. Always succeeds.
	pub fn cancel(&mut self) -> Step {
		tracing::info!(
			order_id = %truncate_id(self.order.id()),
			step = %self.step,
			"Cancelled order"
		);
		self.restart();
		self.step
	}

	/// Formats the completed order without sending it.
	pub fn preview(&self) -> Result<OrderSummary, FlowError> {
		self.check_allowed(FlowAction::Send)?;

		self.formatter
			.format(&self.order)
			.map_err(|e| self.reject(FlowAction::Send, e.into()))
	}

	/// Formats the completed order and starts a fresh one.
	///
	/// The returned summary is the caller's to hand to a share backend.
	pub fn send(&mut self) -> Result<OrderSummary, FlowError> {
		let summary = self.preview()?;

		tracing::info!(
			order_id = %truncate_id(&summary.order_id),
			subtotal = ?self.order.subtotal(),
			"Sent order"
		);
		self.publish(FlowEvent::OrderSent {
			summary: summary.clone(),
		});
		self.restart();
		Ok(summary)
	}

	/// Actions the current step accepts whose guard currently holds.
	pub fn permitted_actions(&self) -> Vec<FlowAction> {
		transitions::allowed_actions(self.step)
			.into_iter()
			.filter(|action| match action {
				FlowAction::Next => self.can_advance(),
				FlowAction::Send => self.order.is_complete(),
				_ => true,
			})
			.collect()
	}

	/// Whether `advance` would succeed right now.
	pub fn can_advance(&self) -> bool {
		self.step.next().is_some() && self.order.has_selection(self.step)
	}

	fn check_allowed(&self, action: FlowAction) -> Result<(), FlowError> {
		if transitions::is_allowed(self.step, action) {
			return Ok(());
		}
		let err = FlowError::InvalidTransition {
			step: self.step,
			action,
		};
		Err(self.reject(action, err))
	}

	fn move_to(&mut self, to: Step) {
		let from = self.step;
		self.step = to;
		tracing::debug!(from = %from, to = %to, "Changed step");
		self.publish(FlowEvent::StepChanged { from, to });
	}

	fn restart(&mut self) {
		let previous_order_id = self.order.id().to_string();
		self.order.reset();
		if self.step != Step::Start {
			self.move_to(Step::Start);
		}
		self.publish(FlowEvent::OrderReset {
			previous_order_id,
			order_id: self.order.id().to_string(),
		});
	}

	fn reject(&self, action: FlowAction, err: FlowError) -> FlowError {
		tracing::warn!(step = %self.step, action = %action, error = %err, "Rejected action");
		self.publish(FlowEvent::TransitionRejected {
			step: self.step,
			action,
			reason: err.to_string(),
		});
		err
	}

	fn publish(&self, event: FlowEvent) {
		if let Some(bus) = &self.event_bus {
			bus.publish(event).ok();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal::Decimal;

	fn catalog() -> Arc<Catalog> {
		Arc::new(
			Catalog::new(
				vec![1, 2, 4],
				Decimal::new(500, 2),
				vec!["A".to_string(), "B".to_string()],
				vec!["Today".to_string(), "Tomorrow".to_string()],
			)
			.unwrap(),
		)
	}

	fn flow() -> OrderFlow {
		OrderFlow::new(catalog(), SummaryFormatter::default())
	}

	fn flow_at_summary() -> OrderFlow {
		let mut flow = flow();
		flow.select(Step::Start, "2").unwrap();
		flow.advance().unwrap();
		flow.select(Step::Restaurant, "B").unwrap();
		flow.advance().unwrap();
		flow.select(Step::Delivery, "Tomorrow").unwrap();
		flow.advance().unwrap();
		flow
	}

	#[test]
	fn test_scenario_full_order_then_send() {
		let mut flow = flow_at_summary();
		assert_eq!(flow.current_step(), Step::Summary);
		assert_eq!(flow.snapshot().subtotal, Some(Decimal::new(1000, 2)));

		let summary = flow.send().unwrap();
		for expected in ["2", "B", "Tomorrow", "10.00"] {
			assert!(summary.body.contains(expected), "missing {expected}");
		}

		assert_eq!(flow.current_step(), Step::Start);
		assert!(flow.snapshot().is_empty());
		assert_ne!(flow.snapshot().id, summary.order_id);
	}

	#[test]
	fn test_preview_does_not_reset() {
		let flow = flow_at_summary();
		let preview = flow.preview().unwrap();

		assert_eq!(preview.order_id, flow.snapshot().id);
		assert_eq!(flow.current_step(), Step::Summary);
		assert!(flow.snapshot().is_complete());
	}

	#[test]
	fn test_scenario_cancel_at_restaurant() {
		let mut flow = flow();
		flow.select(Step::Start, "1").unwrap();
		flow.advance().unwrap();

		assert_eq!(flow.cancel(), Step::Start);
		assert!(flow.snapshot().is_empty());

		// Restaurant comes after the active step again.
		assert_eq!(
			flow.select(Step::Restaurant, "A"),
			Err(FlowError::Order(OrderError::OutOfSequence {
				step: Step::Restaurant,
				requires: Step::Start
			}))
		);

		flow.select(Step::Start, "1").unwrap();
		flow.advance().unwrap();
		assert!(flow.select(Step::Restaurant, "A").is_ok());
	}

	#[test]
	fn test_cancel_from_every_step_resets() {
		for steps_forward in 0..4 {
			let mut flow = flow_at_summary();
			for _ in 0..(3 - steps_forward) {
				flow.back().unwrap();
			}

			assert_eq!(flow.cancel(), Step::Start);
			assert_eq!(flow.current_step(), Step::Start);
			assert!(flow.snapshot().is_empty());
		}
	}

	#[test]
	fn test_advance_without_selection_never_moves() {
		let mut flow = flow();
		let before = flow.snapshot();

		for _ in 0..3 {
			assert_eq!(
				flow.advance(),
				Err(FlowError::MissingSelection(Step::Start))
			);
			assert_eq!(flow.current_step(), Step::Start);
			assert_eq!(flow.snapshot(), before);
		}
		assert!(!flow.can_advance());
	}

	#[test]
	fn test_invalid_selection_leaves_flow_unchanged() {
		let mut flow = flow();
		flow.select(Step::Start, "2").unwrap();

		for bad in ["3", "zero", "-1", ""] {
			assert!(matches!(
				flow.select(Step::Start, bad),
				Err(FlowError::Order(OrderError::InvalidSelection { .. }))
			));
		}
		assert_eq!(flow.snapshot().quantity, Some(2));
		assert_eq!(flow.snapshot().subtotal, Some(Decimal::new(1000, 2)));
	}

	#[test]
	fn test_earlier_step_requires_going_back() {
		let mut flow = flow();
		flow.select(Step::Start, "1").unwrap();
		flow.advance().unwrap();

		assert_eq!(
			flow.select(Step::Start, "2"),
			Err(FlowError::StepNotActive {
				requested: Step::Start,
				active: Step::Restaurant
			})
		);
		assert_eq!(flow.snapshot().quantity, Some(1));
	}

	#[test]
	fn test_back_is_non_destructive() {
		let mut flow = flow_at_summary();
		assert_eq!(flow.back().unwrap(), Step::Delivery);
		assert_eq!(flow.back().unwrap(), Step::Restaurant);
		assert_eq!(flow.snapshot().restaurant.as_deref(), Some("B"));

		assert_eq!(flow.advance().unwrap(), Step::Delivery);
		assert_eq!(flow.advance().unwrap(), Step::Summary);
		assert!(flow.send().is_ok());
	}

	#[test]
	fn test_reselect_keeps_later_selections() {
		let mut flow = flow_at_summary();
		flow.back().unwrap();
		flow.back().unwrap();
		flow.back().unwrap();

		flow.select(Step::Start, "4").unwrap();
		let snapshot = flow.snapshot();
		assert_eq!(snapshot.subtotal, Some(Decimal::new(2000, 2)));
		assert_eq!(snapshot.delivery_option.as_deref(), Some("Tomorrow"));
	}

	#[test]
	fn test_edges_rejected_as_invalid_transitions() {
		let mut flow = flow();
		assert_eq!(
			flow.back(),
			Err(FlowError::InvalidTransition {
				step: Step::Start,
				action: FlowAction::Back
			})
		);
		assert_eq!(
			flow.send(),
			Err(FlowError::InvalidTransition {
				step: Step::Start,
				action: FlowAction::Send
			})
		);

		let mut flow = flow_at_summary();
		assert_eq!(
			flow.advance(),
			Err(FlowError::InvalidTransition {
				step: Step::Summary,
				action: FlowAction::Next
			})
		);
		assert_eq!(
			flow.select(Step::Summary, "anything"),
			Err(FlowError::InvalidTransition {
				step: Step::Summary,
				action: FlowAction::Select
			})
		);
		assert_eq!(flow.current_step(), Step::Summary);
	}

	#[test]
	fn test_permitted_actions_follow_guards() {
		let mut flow = flow();
		assert_eq!(
			flow.permitted_actions(),
			vec![FlowAction::Select, FlowAction::Cancel]
		);

		flow.select(Step::Start, "1").unwrap();
		assert!(flow.can_advance());
		assert_eq!(
			flow.permitted_actions(),
			vec![FlowAction::Select, FlowAction::Next, FlowAction::Cancel]
		);

		let flow = flow_at_summary();
		assert!(!flow.can_advance());
		assert_eq!(
			flow.permitted_actions(),
			vec![FlowAction::Back, FlowAction::Cancel, FlowAction::Send]
		);
	}

	#[test]
	fn test_available_options_delegate_to_catalog() {
		let flow = flow();
		assert_eq!(flow.available_options(Step::Start), vec!["1", "2", "4"]);
		assert!(flow.available_options(Step::Summary).is_empty());
	}

	#[tokio::test]
	async fn test_events_published() {
		let bus = EventBus::default();
		let mut receiver = bus.subscribe();
		let mut flow = flow().with_event_bus(bus);
		let first_id = flow.snapshot().id;

		flow.select(Step::Start, "2").unwrap();
		flow.advance().unwrap();
		flow.advance().unwrap_err();
		flow.cancel();

		assert_eq!(
			receiver.recv().await.unwrap(),
			FlowEvent::SelectionChanged {
				order_id: first_id.clone(),
				step: Step::Start,
				value: "2".to_string()
			}
		);
		assert_eq!(
			receiver.recv().await.unwrap(),
			FlowEvent::StepChanged {
				from: Step::Start,
				to: Step::Restaurant
			}
		);
		assert!(matches!(
			receiver.recv().await.unwrap(),
			FlowEvent::TransitionRejected {
				step: Step::Restaurant,
				action: FlowAction::Next,
				..
			}
		));
		assert_eq!(
			receiver.recv().await.unwrap(),
			FlowEvent::StepChanged {
				from: Step::Restaurant,
				to: Step::Start
			}
		);
		match receiver.recv().await.unwrap() {
			FlowEvent::OrderReset {
				previous_order_id,
				order_id,
			} => {
				assert_eq!(previous_order_id, first_id);
				assert_eq!(order_id, flow.snapshot().id);
			},
			other => panic!("unexpected event: {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_selection_event_uses_canonical_quantity() {
		let bus = EventBus::default();
		let mut receiver = bus.subscribe();
		let mut flow = flow().with_event_bus(bus);

		flow.select(Step::Start, " +2").unwrap();
		flow.select(Step::Start, "04").unwrap();

		for expected in ["2", "4"] {
			match receiver.recv().await.unwrap() {
				FlowEvent::SelectionChanged { value, .. } => assert_eq!(value, expected),
				other => panic!("unexpected event: {other:?}"),
			}
		}
		assert_eq!(flow.snapshot().quantity, Some(4));
	}
}
