//! Builder for constructing order sessions from configuration.
//!
//! Instantiates every configured share implementation through its factory,
//! picks the primary one and wires it to a flow built over the catalog.

use crate::event_bus::EventBus;
use crate::flow::OrderFlow;
use crate::session::OrderSession;
use crate::summary::SummaryFormatter;
use bites_config::Config;
use bites_order::Catalog;
use bites_share::{ShareError, ShareInterface, ShareService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building a session.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for an [`OrderSession`] with a pluggable share backend.
pub struct SessionBuilder {
	config: Config,
	event_bus: Option<EventBus>,
}

impl SessionBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			event_bus: None,
		}
	}

	/// Uses an existing event bus instead of creating one.
	pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
		self.event_bus = Some(event_bus);
		self
	}

	/// Builds the catalog and flow only.
	pub fn build_flow(&self) -> Result<OrderFlow, BuilderError> {
		let catalog = Catalog::from_config(&self.config.catalog)
			.map_err(|e| BuilderError::Config(format!("Invalid catalog: {}", e)))?;
		tracing::info!(
			quantities = catalog.quantity_options().len(),
			restaurants = catalog.restaurant_names().len(),
			delivery_options = catalog.delivery_options().len(),
			unit_price = %catalog.unit_price(),
			"Loaded catalog"
		);

		let formatter = SummaryFormatter::from_config(&self.config.summary);
		let flow = OrderFlow::new(Arc::new(catalog), formatter);
		Ok(match &self.event_bus {
			Some(bus) => flow.with_event_bus(bus.clone()),
			None => flow,
		})
	}

	/// Builds the session using the given share factories.
	pub fn build<SF>(self, share_factories: HashMap<String, SF>) -> Result<OrderSession, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn ShareInterface>, ShareError>,
	{
		let mut share_impls = HashMap::new();
		for (name, config) in &self.config.share.implementations {
			let Some(factory) = share_factories.get(name) else {
				tracing::warn!(component = "share", implementation = %name, "Unknown implementation, skipped");
				continue;
			};
			match factory(config) {
				Ok(implementation) => {
					if let Err(e) = implementation.config_schema().validate(config) {
						tracing::error!(
							component = "share",
							implementation = %name,
							error = %e,
							"Invalid configuration for share implementation"
						);
						return Err(BuilderError::Config(format!(
							"Invalid configuration for share implementation '{}': {}",
							name, e
						)));
					}
					let is_primary = &self.config.share.primary == name;
					tracing::info!(component = "share", implementation = %name, enabled = %is_primary, "Loaded");
					share_impls.insert(name.clone(), implementation);
				},
				Err(e) => {
					tracing::error!(
						component = "share",
						implementation = %name,
						error = %e,
						"Failed to create share implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create share implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		if share_impls.is_empty() {
			return Err(BuilderError::MissingComponent(
				"No valid share implementations available".into(),
			));
		}

		let primary = &self.config.share.primary;
		let backend = share_impls.remove(primary).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary share '{}' failed to load or has invalid configuration",
				primary
			))
		})?;
		let share = Arc::new(ShareService::new(primary.clone(), backend));

		let event_bus = self.event_bus.clone().unwrap_or_default();
		let flow = self.build_flow()?.with_event_bus(event_bus.clone());

		Ok(OrderSession::new(flow, share, event_bus))
	}
}
