//! Event bus for observing order flows.
//!
//! A thin wrapper over a tokio broadcast channel. Publishing never blocks and
//! never fails the caller; slow subscribers lag and drop old events.

use bites_types::FlowEvent;
use tokio::sync::broadcast;

/// Default number of buffered events per subscriber.
const DEFAULT_CAPACITY: usize = 256;

/// Broadcast channel carrying [`FlowEvent`]s.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<FlowEvent>,
}

impl EventBus {
	/// Creates a new event bus with the given buffer capacity.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Subscribes to events published after this call.
	pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns an error when nobody is listening; callers usually ignore it.
	pub fn publish(
		&self,
		event: FlowEvent,
	) -> Result<usize, broadcast::error::SendError<FlowEvent>> {
		self.sender.send(event)
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}
}
