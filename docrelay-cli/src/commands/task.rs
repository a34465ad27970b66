//! Task command handlers
//!
//! Handles inspecting and waiting on remote tasks.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use docrelay_client::DocumentClient;
use docrelay_core::domain::task::{TaskOutput, TaskRecord, TaskStatus};
use std::time::Duration;

use super::{cancel_on_ctrl_c, fail};
use crate::config::Config;

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Show the current status of a task
    Status {
        /// Task ID
        task_id: String,
    },
    /// Wait for a task to finish
    Wait {
        /// Task ID
        task_id: String,

        /// Override the configured timeout, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

/// Handle task commands
pub async fn handle_task_command(command: TaskCommands, config: &Config) -> Result<()> {
    let client = config.connect()?;

    match command {
        TaskCommands::Status { task_id } => show_status(&client, &task_id).await,
        TaskCommands::Wait {
            task_id,
            timeout_ms,
        } => wait(&client, &task_id, timeout_ms.map(Duration::from_millis)).await,
    }
}

/// Show a single status read
async fn show_status(client: &DocumentClient, task_id: &str) -> Result<()> {
    let record = client.get_task_status(task_id).await.map_err(fail)?;

    print_task_details(&record);

    Ok(())
}

/// Poll until the task is terminal
async fn wait(client: &DocumentClient, task_id: &str, timeout: Option<Duration>) -> Result<()> {
    let record = client
        .poller()
        .with_cancellation(cancel_on_ctrl_c())
        .poll_until_complete(task_id, timeout)
        .await
        .map_err(fail)?;

    print_task_details(&record);

    Ok(())
}

/// Print detailed task information
pub(super) fn print_task_details(record: &TaskRecord) {
    println!("{}", "Task Details:".bold());
    println!("  ID:       {}", record.task_id.cyan());
    println!("  Status:   {}", colorize_status(record.status));
    println!("  Progress: {}%", record.progress);
    if let Some(created) = record.created_at {
        println!("  Created:  {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(updated) = record.updated_at {
        println!("  Updated:  {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    if record.status == TaskStatus::Completed {
        match record.output() {
            TaskOutput::Document(id) => println!("  Result:   document {}", id.cyan()),
            TaskOutput::Data(data) => {
                println!("\n{}", "Result data:".bold());
                println!("{}", "─".repeat(80).dimmed());
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
                );
                println!("{}", "─".repeat(80).dimmed());
            }
            TaskOutput::Empty => println!("  Result:   {}", "none".dimmed()),
        }
    }

    if let Some(error) = &record.error {
        println!(
            "  Error:    {} {}",
            error.code.as_deref().unwrap_or("TASK_FAILED").red(),
            error.message.as_deref().unwrap_or_default()
        );
    }
}

/// Colorize task status for display
fn colorize_status(status: TaskStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        TaskStatus::Pending => label.dimmed(),
        TaskStatus::Processing => label.yellow(),
        TaskStatus::Completed => label.green(),
        TaskStatus::Failed => label.red(),
    }
}
