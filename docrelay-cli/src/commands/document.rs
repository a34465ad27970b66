//! Document command handlers
//!
//! Handles uploading, downloading and deleting documents.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use docrelay_client::DocumentClient;
use std::path::{Path, PathBuf};

use super::fail;
use crate::config::Config;

/// Document subcommands
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Upload a local file
    Upload {
        /// Path of the file to upload
        path: PathBuf,

        /// File name reported to the service (defaults to the path's file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Download a document to a local file
    Download {
        /// Document ID (uploaded document or operation result)
        document_id: String,

        /// Where to write the file
        output: PathBuf,

        /// File name the service should report
        #[arg(short, long)]
        filename: Option<String>,
    },
    /// Delete a document from the service
    Delete {
        /// Document ID
        document_id: String,
    },
}

/// Handle document commands
pub async fn handle_document_command(command: DocumentCommands, config: &Config) -> Result<()> {
    let client = config.connect()?;

    match command {
        DocumentCommands::Upload { path, name } => upload(&client, &path, name).await,
        DocumentCommands::Download {
            document_id,
            output,
            filename,
        } => download(&client, &document_id, &output, filename.as_deref()).await,
        DocumentCommands::Delete { document_id } => delete(&client, &document_id).await,
    }
}

/// Upload a local file
async fn upload(client: &DocumentClient, path: &Path, name: Option<String>) -> Result<()> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_name = name.unwrap_or_else(|| default_file_name(path));
    let size = content.len();

    let upload = client
        .upload_document(content, &file_name)
        .await
        .map_err(fail)?;

    println!("{}", "✓ Document uploaded successfully!".green().bold());
    println!("  Document ID: {}", upload.document_id.cyan());
    println!("  File name:   {}", file_name);
    println!("  Size:        {} bytes", size.to_string().dimmed());

    Ok(())
}

/// Download a document to `output`
pub(super) async fn download(
    client: &DocumentClient,
    document_id: &str,
    output: &Path,
    filename: Option<&str>,
) -> Result<()> {
    let content = client
        .download_document(document_id, filename)
        .await
        .map_err(fail)?;

    tokio::fs::write(output, &content)
        .await
        .with_context(|| format!("Failed to write file: {}", output.display()))?;

    println!("{}", "✓ Document downloaded successfully!".green().bold());
    println!("  Document ID: {}", document_id.cyan());
    println!("  Saved to:    {}", output.display());
    println!("  Size:        {} bytes", content.len().to_string().dimmed());

    Ok(())
}

/// Delete a document
async fn delete(client: &DocumentClient, document_id: &str) -> Result<()> {
    client.delete_document(document_id).await.map_err(fail)?;

    println!(
        "{}",
        format!("✓ Document {} deleted successfully!", document_id)
            .green()
            .bold()
    );

    Ok(())
}

fn default_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
