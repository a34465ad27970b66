//! Docrelay CLI
//!
//! Command-line interface for the remote document-processing service:
//! upload and download documents, start operations and wait for them.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use docrelay_core::config::DEFAULT_BASE_URL;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docrelay")]
#[command(about = "Document service CLI", long_about = None)]
struct Cli {
    /// Document service base URL
    #[arg(long, env = "DOCRELAY_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Client identifier sent with every request
    #[arg(long, env = "DOCRELAY_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// Client secret sent with every request
    #[arg(long, env = "DOCRELAY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// How long to wait for a task, in milliseconds
    #[arg(long, env = "DOCRELAY_TIMEOUT_MS", default_value_t = 300_000)]
    timeout_ms: u64,

    /// Delay between task status checks, in milliseconds
    #[arg(long, env = "DOCRELAY_POLL_INTERVAL_MS", default_value_t = 2_000)]
    poll_interval_ms: u64,

    /// Upper bound for a single HTTP request, in seconds
    #[arg(long, env = "DOCRELAY_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    request_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docrelay=info,docrelay_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    debug!("Service endpoint: {}", cli.base_url);

    let config = Config::new(
        &cli.base_url,
        cli.client_id.as_deref(),
        cli.client_secret.as_deref(),
        cli.timeout_ms,
        cli.poll_interval_ms,
        cli.request_timeout_secs,
    );

    handle_command(cli.command, &config).await
}
