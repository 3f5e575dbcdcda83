//! Main entry point for the BuffBites ordering app.
//!
//! Loads the configuration, wires the configured share backend into an order
//! session and runs the terminal front end on stdin/stdout. Logs go to
//! stderr so they never mix with the screen.

use bites_config::Config;
use bites_core::{OrderSession, SessionBuilder};
use bites_types::FlowEvent;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;

mod terminal;

use bites_share::implementations::file::create_share as create_file_share;
use bites_share::implementations::memory::create_share as create_memory_share;
use bites_share::implementations::stdout::create_share as create_stdout_share;
use terminal::TerminalAdapter;

/// Command-line arguments for the ordering app.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml", env = "BITES_CONFIG")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,
}

/// Main entry point.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging on stderr
/// 3. Loads configuration from file
/// 4. Builds the order session with the configured share backend
/// 5. Runs the terminal front end until quit or end of input
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();

	let config = Config::from_file(&args.config).await?;
	tracing::info!(app = %config.app.name, path = %args.config.display(), "Loaded configuration");

	let app_name = config.app.name.clone();
	let session = build_session(config)?;
	spawn_event_logger(&session);

	let input = BufReader::new(tokio::io::stdin());
	let mut adapter = TerminalAdapter::new(session, input, tokio::io::stdout(), app_name);
	adapter.run().await?;

	tracing::info!("Stopped");
	Ok(())
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the order session with every available share backend registered.
fn build_session(config: Config) -> Result<OrderSession, Box<dyn std::error::Error>> {
	let share_factories = create_factory_map!(
		bites_share::ShareInterface,
		bites_share::ShareError,
		"file" => create_file_share,
		"memory" => create_memory_share,
		"stdout" => create_stdout_share,
	);

	Ok(SessionBuilder::new(config).build(share_factories)?)
}

/// Mirrors flow events into the log at debug level.
fn spawn_event_logger(session: &OrderSession) {
	let mut receiver = session.event_bus().subscribe();
	tokio::spawn(async move {
		use tokio::sync::broadcast::error::RecvError;

		loop {
			match receiver.recv().await {
				Ok(FlowEvent::OrderSent { summary }) => {
					tracing::debug!(order_id = %summary.order_id, "Event: order sent");
				},
				Ok(event) => tracing::debug!(?event, "Event"),
				Err(RecvError::Lagged(skipped)) => {
					tracing::warn!(skipped, "Event logger lagged");
				},
				Err(RecvError::Closed) => break,
			}
		}
	});
}
