//! An order flow wired to a share backend.

use crate::event_bus::EventBus;
use crate::flow::{FlowError, OrderFlow};
use bites_share::{ShareError, ShareService};
use bites_types::OrderSummary;
use std::sync::Arc;
use thiserror::Error;

/// Errors from sending an order through a session.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error(transparent)]
	Flow(#[from] FlowError),
	#[error("Share failed: {0}")]
	Share(#[from] ShareError),
}

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentOrder {
	pub summary: OrderSummary,
	/// Backend receipt, e.g. the file written.
	pub receipt: String,
}

/// Owns the flow for one user plus the services it hands off to.
pub struct OrderSession {
	flow: OrderFlow,
	share: Arc<ShareService>,
	event_bus: EventBus,
}

impl OrderSession {
	pub fn new(flow: OrderFlow, share: Arc<ShareService>, event_bus: EventBus) -> Self {
		Self {
			flow,
			share,
			event_bus,
		}
	}

	pub fn flow(&self) -> &OrderFlow {
		&self.flow
	}

	pub fn flow_mut(&mut self) -> &mut OrderFlow {
		&mut self.flow
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	pub fn share_service(&self) -> &ShareService {
		&self.share
	}

	/// Shares the completed order, then resets the flow.
	///
	/// If the backend fails the flow stays on the summary step with the
	/// order intact, so the send can be retried.
	pub async fn send(&mut self) -> Result<SentOrder, SessionError> {
		let summary = self.flow.preview()?;
		let receipt = self.share.share(&summary).await?;
		let summary = self.flow.send()?;

		Ok(SentOrder { summary, receipt })
	}
}
