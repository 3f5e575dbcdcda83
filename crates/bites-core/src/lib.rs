//! Core order flow for the BuffBites ordering system.
//!
//! This crate holds the state machine that walks a user through building an
//! order, the formatter that turns a completed order into a shareable
//! summary, and the session that hands that summary to a share backend.

pub mod builder;
pub mod event_bus;
pub mod flow;
pub mod session;
pub mod summary;

pub use builder::{BuilderError, SessionBuilder};
pub use event_bus::EventBus;
pub use flow::{FlowError, OrderFlow};
pub use session::{OrderSession, SentOrder, SessionError};
pub use summary::SummaryFormatter;
