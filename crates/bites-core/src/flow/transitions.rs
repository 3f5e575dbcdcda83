//! Which user actions each step accepts.
//!
//! The table only answers "is this action meaningful here". Data guards,
//! such as needing a selection before `next`, are checked by the flow.

use bites_types::{FlowAction, Step};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static TRANSITIONS: Lazy<HashMap<Step, HashSet<FlowAction>>> = Lazy::new(|| {
	use FlowAction::*;

	let mut m = HashMap::new();
	m.insert(Step::Start, HashSet::from([Select, Next, Cancel]));
	m.insert(Step::Restaurant, HashSet::from([Select, Next, Back, Cancel]));
	m.insert(Step::Delivery, HashSet::from([Select, Next, Back, Cancel]));
	m.insert(Step::Summary, HashSet::from([Back, Cancel, Send]));
	m
});

/// Display order for permitted actions.
const ACTION_ORDER: [FlowAction; 5] = [
	FlowAction::Select,
	FlowAction::Next,
	FlowAction::Back,
	FlowAction::Cancel,
	FlowAction::Send,
];

/// Checks if `action` is accepted at `step`.
pub fn is_allowed(step: Step, action: FlowAction) -> bool {
	TRANSITIONS
		.get(&step)
		.is_some_and(|actions| actions.contains(&action))
}

/// Actions accepted at `step`, in a stable order.
pub fn allowed_actions(step: Step) -> Vec<FlowAction> {
	ACTION_ORDER
		.into_iter()
		.filter(|action| is_allowed(step, *action))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_every_step_can_cancel() {
		for step in Step::ORDER {
			assert!(is_allowed(step, FlowAction::Cancel), "{step}");
		}
	}

	#[test]
	fn test_edges_of_the_sequence() {
		assert!(!is_allowed(Step::Start, FlowAction::Back));
		assert!(!is_allowed(Step::Summary, FlowAction::Next));
		assert!(!is_allowed(Step::Summary, FlowAction::Select));
		assert!(is_allowed(Step::Summary, FlowAction::Send));
		assert!(!is_allowed(Step::Delivery, FlowAction::Send));
	}

	#[test]
	fn test_allowed_actions_are_ordered() {
		assert_eq!(
			allowed_actions(Step::Restaurant),
			vec![
				FlowAction::Select,
				FlowAction::Next,
				FlowAction::Back,
				FlowAction::Cancel
			]
		);
		assert_eq!(
			allowed_actions(Step::Summary),
			vec![FlowAction::Back, FlowAction::Cancel, FlowAction::Send]
		);
	}
}
