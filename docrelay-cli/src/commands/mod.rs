//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod document;
mod operation;
mod task;

pub use document::DocumentCommands;
pub use operation::RunArgs;
pub use task::TaskCommands;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use docrelay_client::ClientError;
use tokio::sync::watch;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Document upload, download and deletion
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// Task inspection
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Start an operation and wait for its result
    Run(RunArgs),
    /// List the available operations
    Operations,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Document { command } => document::handle_document_command(command, config).await,
        Commands::Task { command } => task::handle_task_command(command, config).await,
        Commands::Run(args) => operation::run_operation(args, config).await,
        Commands::Operations => {
            operation::list_operations();
            Ok(())
        }
    }
}

/// A cancellation flag raised on Ctrl-C
fn cancel_on_ctrl_c() -> watch::Receiver<bool> {
    let (cancel_tx, cancel_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "Cancelling, the remote task may keep running".yellow());
            let _ = cancel_tx.send(true);
        }
    });

    cancel_rx
}

/// Print the fields of a client failure before it is returned
fn print_failure(err: &ClientError) {
    eprintln!("{} {}", "✗".red().bold(), err.to_string().red());
    eprintln!("  Code:    {}", err.code().yellow());
    if let Some(status) = err.status() {
        eprintln!("  Status:  {}", status);
    }
    if let Some(task_id) = err.task_id() {
        eprintln!("  Task ID: {}", task_id.cyan());
    }
    if let Some(details) = err.details() {
        eprintln!("  Details: {}", details.to_string().dimmed());
    }
}

/// Report a client failure and hand it back as an `anyhow` error
fn fail(err: ClientError) -> anyhow::Error {
    print_failure(&err);
    err.into()
}
