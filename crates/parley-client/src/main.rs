//! Parley console client.
//!
//! Connects to a chat server, forwards stdin lines to it, and prints every
//! received message to stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Text lines, announce as "alice"
//! parley --server 127.0.0.1:4455 --name alice
//!
//! # Framed records, custom keyword
//! parley --server 127.0.0.1:4455 --mode object --terminate-keyword quit
//! ```

use std::time::Duration;

use clap::Parser;
use parley_client::{Session, SessionConfig, TransportMode};
use parley_proto::vocabulary::BYE;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Blocking stdin reads cannot be cancelled; give up on them after this.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// Parley chat client
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Duplex chat client")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:4455")]
    server: String,

    /// Name sent to the server after connecting
    #[arg(short, long)]
    name: Option<String>,

    /// Server stream framing (text or object)
    #[arg(short, long, default_value_t = TransportMode::Text)]
    mode: TransportMode,

    /// A sent line containing this ends the session (empty disables)
    #[arg(long, default_value = BYE)]
    terminate_keyword: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result = runtime.block_on(run(args));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Parley client starting");

    // stdout is a terminal or a pipe of lines, whatever the server speaks.
    let config = SessionConfig {
        mode: args.mode,
        echo_mode: TransportMode::Text,
        terminate_keyword: args.terminate_keyword,
        user_name: args.name,
    };
    let handle = Session::new(config)
        .with_echo(Box::new(tokio::io::stdout()))
        .connect(args.server.as_str(), tokio::io::stdin())
        .await?;

    let report = handle.join().await?;
    if report.is_failure() {
        tracing::warn!(?report, "session ended with a failure");
    }

    Ok(())
}
