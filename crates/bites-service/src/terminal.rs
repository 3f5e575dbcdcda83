//! Line-oriented terminal front end for an order session.
//!
//! Reads one command per line, forwards it to the session and redraws the
//! active step. Rejected actions are reported and the loop carries on.

use bites_core::{FlowError, OrderSession, SessionError};
use bites_types::{format_price, truncate_id, FlowAction, Step};
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::instrument;

const HELP: &str = "\
Commands:
  select <value>  (s)  choose an option for the current step
  next            (n)  continue to the next step
  back            (b)  return to the previous step
  cancel          (c)  discard the order and start over
  send                 share the finished order
  options              list the options for this step
  order                show the order so far
  help                 show this message
  quit            (q)  exit
";

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Select(String),
	Next,
	Back,
	Cancel,
	Send,
	Options,
	Order,
	Help,
	Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
	#[error("Empty command")]
	Empty,
	#[error("Unknown command '{0}', type 'help' for a list")]
	Unknown(String),
	#[error("'select' needs a value")]
	MissingValue,
}

impl FromStr for Command {
	type Err = CommandError;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let line = line.trim();
		let (word, rest) = match line.split_once(char::is_whitespace) {
			Some((word, rest)) => (word, rest.trim()),
			None => (line, ""),
		};

		match word.to_ascii_lowercase().as_str() {
			"" => Err(CommandError::Empty),
			"select" | "s" if rest.is_empty() => Err(CommandError::MissingValue),
			"select" | "s" => Ok(Command::Select(rest.to_string())),
			"next" | "n" => Ok(Command::Next),
			"back" | "b" => Ok(Command::Back),
			"cancel" | "c" => Ok(Command::Cancel),
			"send" => Ok(Command::Send),
			"options" => Ok(Command::Options),
			"order" => Ok(Command::Order),
			"help" | "?" => Ok(Command::Help),
			"quit" | "q" | "exit" => Ok(Command::Quit),
			other => Err(CommandError::Unknown(other.to_string())),
		}
	}
}

/// Terminal adapter driving an [`OrderSession`].
pub struct TerminalAdapter<R, W> {
	session: OrderSession,
	input: R,
	output: W,
	app_name: String,
}

impl<R, W> TerminalAdapter<R, W>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	pub fn new(session: OrderSession, input: R, output: W, app_name: impl Into<String>) -> Self {
		Self {
			session,
			input,
			output,
			app_name: app_name.into(),
		}
	}

	pub fn session(&self) -> &OrderSession {
		&self.session
	}

	/// Consumes the adapter, returning the session and output writer.
	pub fn into_parts(self) -> (OrderSession, W) {
		(self.session, self.output)
	}

	/// Runs until `quit` or end of input.
	pub async fn run(&mut self) -> std::io::Result<()> {
		let banner = format!("Welcome to {}! Type 'help' for commands.\n\n", self.app_name);
		self.output.write_all(banner.as_bytes()).await?;
		self.write_screen().await?;

		let mut line = String::new();
		loop {
			self.output.write_all(b"> ").await?;
			self.output.flush().await?;

			line.clear();
			if self.input.read_line(&mut line).await? == 0 {
				break;
			}

			let command = match line.parse::<Command>() {
				Ok(command) => command,
				Err(CommandError::Empty) => continue,
				Err(e) => {
					self.output.write_all(format!("{}\n", e).as_bytes()).await?;
					continue;
				},
			};

			if command == Command::Quit {
				break;
			}
			let message = self.dispatch(command).await;
			self.output.write_all(message.as_bytes()).await?;
		}

		self.output.write_all(b"Bye!\n").await?;
		self.output.flush().await
	}

	/// Applies a command and returns the text to print.
	#[instrument(skip_all, fields(step = %self.session.flow().current_step()))]
	async fn dispatch(&mut self, command: Command) -> String {
		tracing::debug!(?command, "Dispatching command");

		let outcome = match command {
			Command::Send => return self.send().await,
			Command::Options => return self.render_options(),
			Command::Order => return self.render_order(),
			Command::Help => return HELP.to_string(),
			Command::Quit => return String::new(),
			Command::Select(value) => {
				let flow = self.session.flow_mut();
				let step = flow.current_step();
				flow.select(step, &value).map(|_| None)
			},
			Command::Next => self.session.flow_mut().advance().map(|_| None),
			Command::Back => self.session.flow_mut().back().map(|_| None),
			Command::Cancel => {
				self.session.flow_mut().cancel();
				Ok(Some("Order cancelled.\n".to_string()))
			},
		};

		match outcome {
			Ok(note) => {
				let mut text = note.unwrap_or_default();
				text.push_str(&self.render_screen());
				text
			},
			Err(e) => blocked(&e),
		}
	}

	async fn send(&mut self) -> String {
		match self.session.send().await {
			Ok(sent) => {
				let mut text = format!(
					"Sent order {} via {}: {}\n\n",
					truncate_id(&sent.summary.order_id),
					self.session.share_service().backend_name(),
					sent.receipt
				);
				text.push_str(&self.render_screen());
				text
			},
			Err(SessionError::Flow(e)) => blocked(&e),
			Err(SessionError::Share(e)) => {
				format!("Could not share the order ({}). It is still here; try 'send' again.\n", e)
			},
		}
	}

	async fn write_screen(&mut self) -> std::io::Result<()> {
		let screen = self.render_screen();
		self.output.write_all(screen.as_bytes()).await
	}

	/// Title, options, subtotal and available actions for the active step.
	fn render_screen(&self) -> String {
		let flow = self.session.flow();
		let step = flow.current_step();
		let mut text = format!("== {} ==\n", step.title());

		if step == Step::Summary {
			match flow.preview() {
				Ok(summary) => {
					for line in summary.body.lines() {
						text.push_str(&format!("  {}\n", line));
					}
				},
				Err(e) => text.push_str(&format!("  {}\n", e)),
			}
		} else {
			text.push_str(&self.render_options());
			if let Some(subtotal) = flow.snapshot().subtotal {
				text.push_str(&format!(
					"Subtotal: {}\n",
					format_price(subtotal, flow.currency_symbol())
				));
			}
		}

		let actions: Vec<String> = flow
			.permitted_actions()
			.iter()
			.map(FlowAction::to_string)
			.collect();
		text.push_str(&format!("Actions: {}\n\n", actions.join(", ")));
		text
	}

	fn render_options(&self) -> String {
		let flow = self.session.flow();
		let step = flow.current_step();
		let options = flow.available_options(step);
		if options.is_empty() {
			return "  (no options at this step)\n".to_string();
		}

		let selected = flow.snapshot().selection_for(step);
		options
			.iter()
			.map(|option| {
				let mark = if selected.as_deref() == Some(option.as_str()) {
					"x"
				} else {
					" "
				};
				format!("  [{}] {}\n", mark, option)
			})
			.collect()
	}

	fn render_order(&self) -> String {
		let flow = self.session.flow();
		let snapshot = flow.snapshot();
		if snapshot.is_empty() {
			return "Nothing selected yet.\n".to_string();
		}

		let mut text = format!("Order {}\n", truncate_id(&snapshot.id));
		for step in [Step::Start, Step::Restaurant, Step::Delivery] {
			let label = match step {
				Step::Start => "Quantity",
				Step::Restaurant => "Restaurant",
				_ => "Delivery",
			};
			let value = snapshot.selection_for(step).unwrap_or_else(|| "-".to_string());
			text.push_str(&format!("  {}: {}\n", label, value));
		}
		if let Some(subtotal) = snapshot.subtotal {
			text.push_str(&format!(
				"  Subtotal: {}\n",
				format_price(subtotal, flow.currency_symbol())
			));
		}
		text
	}
}

fn blocked(err: &FlowError) -> String {
	format!("Blocked: {}\n", err)
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use bites_config::ConfigBuilder;
	use bites_core::SessionBuilder;
	use bites_share::implementations::memory::{MemoryShare, SharedSummaries};
	use bites_share::{ShareError, ShareInterface, ShareService};
	use bites_types::{ConfigSchema, OrderSummary};
	use mockall::mock;
	use std::sync::Arc;

	mock! {
		pub Share {}

		#[async_trait]
		impl ShareInterface for Share {
			fn config_schema(&self) -> Box<dyn ConfigSchema>;
			async fn share(&self, summary: &OrderSummary) -> Result<String, ShareError>;
		}
	}

	fn session_with(backend: Box<dyn ShareInterface>) -> OrderSession {
		let flow = SessionBuilder::new(ConfigBuilder::new().build())
			.build_flow()
			.unwrap();
		OrderSession::new(
			flow,
			Arc::new(ShareService::new("test", backend)),
			bites_core::EventBus::default(),
		)
	}

	fn memory_session() -> (OrderSession, SharedSummaries) {
		let backend = MemoryShare::new();
		let handle = backend.handle();
		(session_with(Box::new(backend)), handle)
	}

	async fn run_script(session: OrderSession, script: &str) -> (OrderSession, String) {
		let mut adapter = TerminalAdapter::new(session, script.as_bytes(), Vec::new(), "BuffBites");
		adapter.run().await.unwrap();
		let (session, output) = adapter.into_parts();
		(session, String::from_utf8(output).unwrap())
	}

	#[test]
	fn test_parse_commands() {
		assert_eq!(
			"select Tomorrow".parse::<Command>(),
			Ok(Command::Select("Tomorrow".to_string()))
		);
		assert_eq!(
			"s  Tomorrow noon ".parse::<Command>(),
			Ok(Command::Select("Tomorrow noon".to_string()))
		);
		assert_eq!("N".parse::<Command>(), Ok(Command::Next));
		assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
		assert_eq!("select".parse::<Command>(), Err(CommandError::MissingValue));
		assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
		assert_eq!(
			"checkout".parse::<Command>(),
			Err(CommandError::Unknown("checkout".to_string()))
		);
	}

	#[tokio::test]
	async fn test_full_order_is_shared() {
		let (session, shared) = memory_session();
		let script = "select 2\nnext\nselect B\nnext\nselect Tomorrow\nnext\nsend\nquit\n";

		let (session, output) = run_script(session, script).await;

		assert!(output.contains("== Choose Meal =="));
		assert!(output.contains("  [x] B"));
		assert!(output.contains("Subtotal: $10.00"));
		assert!(output.contains("Sent order"));
		assert!(output.ends_with("Bye!\n"));

		let shared = shared.read().await;
		assert_eq!(shared.len(), 1);
		assert!(shared[0].body.contains("Restaurant: B"));
		assert_eq!(session.flow().current_step(), Step::Start);
	}

	#[test]
	fn test_rendered_layout() {
		let (mut session, _) = memory_session();
		session.flow_mut().select(Step::Start, "2").unwrap();
		session.flow_mut().advance().unwrap();
		let order_id = truncate_id(&session.flow().snapshot().id);

		let adapter = TerminalAdapter::new(session, &b""[..], Vec::new(), "BuffBites");

		assert_eq!(
			adapter.render_screen(),
			"== Choose Meal ==\n  [ ] A\n  [ ] B\nSubtotal: $10.00\nActions: select, back, cancel\n\n"
		);

		assert_eq!(
			adapter.render_order(),
			format!(
				"Order {}\n  Quantity: 2\n  Restaurant: -\n  Delivery: -\n  Subtotal: $10.00\n",
				order_id
			)
		);
	}

	#[tokio::test]
	async fn test_blocked_actions_do_not_stop_the_loop() {
		let (session, shared) = memory_session();
		let script = "next\nback\nselect 3\nfly\nselect 1\nnext\n";

		let (session, output) = run_script(session, script).await;

		assert!(output.contains("Blocked: Nothing selected for the start step yet"));
		assert!(output.contains("Blocked: Cannot back from the start step"));
		assert!(output.contains("Blocked: '3' is not a valid start option"));
		assert!(output.contains("Unknown command 'fly'"));
		assert_eq!(session.flow().current_step(), Step::Restaurant);
		assert!(shared.read().await.is_empty());
	}

	#[tokio::test]
	async fn test_cancel_and_order_views() {
		let (session, _) = memory_session();
		let script = "order\nselect 4\nnext\norder\ncancel\norder\n";

		let (session, output) = run_script(session, script).await;

		assert!(output.contains("  Quantity: 4"));
		assert!(output.contains("  Restaurant: -"));
		assert!(output.contains("Order cancelled."));
		assert_eq!(output.matches("Nothing selected yet.").count(), 2);
		assert!(session.flow().snapshot().is_empty());
	}

	#[tokio::test]
	async fn test_share_failure_is_reported() {
		let mut backend = MockShare::new();
		backend
			.expect_share()
			.times(1)
			.returning(|_| Err(ShareError::Backend("no share target".to_string())));

		let script = "s 1\nn\ns A\nn\ns Today\nn\nsend\n";
		let (session, output) = run_script(session_with(Box::new(backend)), script).await;

		assert!(output.contains("Could not share the order (Backend error: no share target)"));
		assert_eq!(session.flow().current_step(), Step::Summary);
		assert!(session.flow().snapshot().is_complete());
	}
}
