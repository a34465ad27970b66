//! Document lifecycle endpoints

use crate::DocumentClient;
use crate::error::Result;
use docrelay_core::dto::document::DocumentUpload;

impl DocumentClient {
    // =============================================================================
    // Document Lifecycle
    // =============================================================================

    /// Upload a document
    ///
    /// # Arguments
    /// * `content` - Raw file content
    /// * `file_name` - Name reported to the service for the file part
    ///
    /// # Returns
    /// The ID of the stored document, usable in any later operation
    pub async fn upload_document(&self, content: Vec<u8>, file_name: &str) -> Result<DocumentUpload> {
        self.submit_binary("/api/documents/upload", content, file_name)
            .await
    }

    /// Download a document
    ///
    /// # Arguments
    /// * `document_id` - An uploaded document or an operation result
    /// * `filename` - Optional file name the service should report
    pub async fn download_document(
        &self,
        document_id: &str,
        filename: Option<&str>,
    ) -> Result<Vec<u8>> {
        let path = format!("/api/documents/{}/download", document_id);
        match filename {
            Some(name) => self.fetch_binary(&path, &[("filename", name)]).await,
            None => self.fetch_binary(&path, &[]).await,
        }
    }

    /// Delete a document
    ///
    /// # Arguments
    /// * `document_id` - The document to delete
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        let path = format!("/api/documents/{}", document_id);
        self.delete_resource(&path).await
    }
}
