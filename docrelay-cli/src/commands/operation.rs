//! Operation command handlers
//!
//! Starts a document operation, waits for its task and optionally
//! downloads the document it produced.

use anyhow::{Result, bail};
use clap::Args;
use colored::*;
use docrelay_core::Operation;
use docrelay_core::domain::task::TaskOutput;
use docrelay_core::dto::document::DocumentRef;
use docrelay_core::operation::DocumentArity;
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;
use std::time::Duration;

use super::document::download;
use super::task::print_task_details;
use super::{cancel_on_ctrl_c, fail};
use crate::config::Config;

/// Arguments of the `run` command
#[derive(Args)]
pub struct RunArgs {
    /// Operation name (see `docrelay operations`)
    pub operation: Operation,

    /// Input document IDs, in order
    #[arg(short, long = "document-id")]
    pub document_ids: Vec<String>,

    /// Passwords for the input documents, matched by position
    #[arg(long = "password")]
    pub passwords: Vec<String>,

    /// Extra payload fields as key=value; values are read as JSON when they parse
    #[arg(short, long, value_parser = parse_key_val)]
    pub param: Vec<(String, JsonValue)>,

    /// Override the configured timeout, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Download the resulting document to this path
    #[arg(long)]
    pub download: Option<PathBuf>,
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, JsonValue)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    let (key, raw) = (&s[..pos], &s[pos + 1..]);
    if key.is_empty() {
        bail!("invalid KEY=value: empty key in `{}`", s);
    }

    let value =
        serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Pair document IDs with passwords by position
fn document_refs(ids: Vec<String>, passwords: Vec<String>) -> Vec<DocumentRef> {
    let mut passwords = passwords.into_iter();
    ids.into_iter()
        .map(|id| DocumentRef::new(id).with_password(passwords.next()))
        .collect()
}

/// Run an operation to completion
pub async fn run_operation(args: RunArgs, config: &Config) -> Result<()> {
    let client = config.connect()?;
    let operation = args.operation;

    let documents = document_refs(args.document_ids, args.passwords);
    let params: Map<String, JsonValue> = args.param.into_iter().collect();
    let payload = operation.build_payload(&documents, params)?;
    let timeout = args.timeout_ms.map(Duration::from_millis);

    println!(
        "{} {}",
        "Running".bold(),
        operation.name().cyan()
    );

    let record = client
        .poller()
        .with_cancellation(cancel_on_ctrl_c())
        .execute_and_wait(|| client.submit_operation(operation, &payload), timeout)
        .await
        .map_err(fail)?;

    println!(
        "{}",
        format!("✓ {} completed successfully!", operation.name())
            .green()
            .bold()
    );
    print_task_details(&record);

    if let Some(output) = args.download {
        let TaskOutput::Document(document_id) = record.output() else {
            bail!("{} produced no document to download", operation.name());
        };
        println!();
        download(&client, document_id, &output, None).await?;
    }

    Ok(())
}

/// List the operation catalogue
pub fn list_operations() {
    println!(
        "{}",
        format!("{} operation(s) available:", Operation::ALL.len()).bold()
    );
    println!();
    for operation in Operation::ALL {
        let inputs = match operation.arity() {
            DocumentArity::None => "no documents",
            DocumentArity::One => "1 document",
            DocumentArity::Pair => "2 documents",
            DocumentArity::Many => "2+ documents",
        };
        println!(
            "  {} {:<26} {} {}",
            "▸".cyan(),
            operation.name().bold(),
            inputs.dimmed(),
            operation.path().dimmed()
        );
    }
}
