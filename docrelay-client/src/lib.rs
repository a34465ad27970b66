//! Docrelay HTTP Client
//!
//! Authenticated access to the remote document-processing service, plus the
//! polling engine that waits for the service's asynchronous tasks.
//!
//! Every request carries the `client_id` / `client_secret` header pair, and
//! every failure mode (network error, non-success status, unreadable body)
//! comes back as one [`ClientError`] shape.
//!
//! # Example
//!
//! ```no_run
//! use docrelay_client::DocumentClient;
//! use docrelay_core::{ClientConfig, Operation};
//! use docrelay_core::dto::document::DocumentRef;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::new("https://api.example.com", "id", "secret");
//!     let client = DocumentClient::new(config)?;
//!
//!     let upload = client.upload_document(b"%PDF-1.7".to_vec(), "in.pdf").await?;
//!     let payload = Operation::PdfToWord
//!         .build_payload(&[DocumentRef::new(upload.document_id)], Default::default())?;
//!
//!     let record = client.run_operation(Operation::PdfToWord, &payload, None).await?;
//!     println!("Result: {:?}", record.result_document_id);
//!     Ok(())
//! }
//! ```

mod documents;
pub mod error;
pub mod poller;
mod tasks;

#[cfg(test)]
mod fake_service;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poller::{TaskPoller, TaskStatusSource};

use docrelay_core::ClientConfig;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Header carrying the client identifier
pub const CLIENT_ID_HEADER: &str = "client_id";
/// Header carrying the client secret
pub const CLIENT_SECRET_HEADER: &str = "client_secret";

/// HTTP client for the document service API
///
/// Methods are organized into logical groups:
/// - Generic transport (JSON submit, file submit, binary fetch, delete)
/// - Document lifecycle (upload, download, delete)
/// - Tasks (operation submission, status, submit-and-wait)
#[derive(Debug, Clone)]
pub struct DocumentClient {
    /// Shared, read-only configuration
    config: Arc<ClientConfig>,
    /// HTTP client instance
    client: Client,
}

impl DocumentClient {
    /// Create a new client
    ///
    /// The configuration is validated, and the underlying HTTP client is
    /// built with the configured per-request timeout.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::from_shared(Arc::new(config))
    }

    /// Create a new client from an already shared configuration
    pub fn from_shared(config: Arc<ClientConfig>) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ClientError::from_transport)?;

        Ok(Self { config, client })
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. The
    /// configured request timeout is then up to the given client.
    pub fn with_client(config: Arc<ClientConfig>, client: Client) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, client })
    }

    /// Get the client configuration
    pub fn config(&self) -> &Arc<ClientConfig> {
        &self.config
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// A poller bound to this client and its configuration
    pub fn poller(&self) -> TaskPoller<&Self> {
        TaskPoller::from_config(self, &self.config)
    }

    // =============================================================================
    // Generic Transport
    // =============================================================================

    /// POST a JSON payload and decode the JSON response
    pub async fn submit_json<P, T>(&self, path: &str, payload: &P) -> Result<T>
    where
        P: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(payload)).await?;

        self.handle_response(response).await
    }

    /// POST a single file as a multipart body and decode the JSON response
    pub async fn submit_binary<T: DeserializeOwned>(
        &self,
        path: &str,
        content: Vec<u8>,
        file_name: &str,
    ) -> Result<T> {
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(ClientError::from_transport)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .send(self.request(Method::POST, path).multipart(form))
            .await?;

        self.handle_response(response).await
    }

    /// GET a binary body
    pub async fn fetch_binary(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut builder = self.request(Method::GET, path);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = self.send(builder).await?;

        self.handle_bytes_response(response).await
    }

    /// DELETE a resource
    pub async fn delete_resource(&self, path: &str) -> Result<()> {
        let response = self.send(self.request(Method::DELETE, path)).await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Request Plumbing
    // =============================================================================

    /// Start a request against `path`, with the credential headers set
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url(), path);
        debug!("{} {}", method, url);

        self.client
            .request(method, url)
            .header(CLIENT_ID_HEADER, self.config.client_id())
            .header(CLIENT_SECRET_HEADER, self.config.client_secret())
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(ClientError::from_transport)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let body = self.handle_bytes_response(response).await?;

        serde_json::from_slice(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to parse JSON response: {}", e))
        })
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: Response) -> Result<()> {
        self.handle_bytes_response(response).await.map(|_| ())
    }

    /// Handle an API response and return the raw body
    async fn handle_bytes_response(&self, response: Response) -> Result<Vec<u8>> {
        let status = response.status();

        if !status.is_success() {
            debug!("Request failed with status {}", status);
            // An unreadable error body still reports the status
            let body = response.bytes().await.unwrap_or_default();
            return Err(ClientError::from_error_body(status.as_u16(), &body));
        }

        let body = response
            .bytes()
            .await
            .map_err(ClientError::from_transport)?;

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_service::FakeService;
    use serde_json::{Value as JsonValue, json};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// A server that accepts connections and holds them open without answering
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    /// A server that answers 500 and hangs up halfway through the body
    async fn truncating_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 500 Internal Server Error\r\n\
                          content-type: application/json\r\n\
                          content-length: 100\r\n\r\n{\"code\":",
                    )
                    .await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:8080/", "id", "secret")
    }

    #[test]
    fn test_client_creation() {
        let client = DocumentClient::new(config()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.config().max_retries(), 3);
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let err = DocumentClient::new(ClientConfig::new("localhost", "id", "secret")).unwrap_err();
        assert_eq!(err.code(), error::INVALID_CONFIG);

        let err = DocumentClient::new(ClientConfig::new("http://localhost", "", "")).unwrap_err();
        assert_eq!(err.code(), error::INVALID_CONFIG);
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = DocumentClient::with_client(Arc::new(config()), Client::new()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_credentials_are_sent() {
        let service = FakeService::start().await;
        let client = service.client();

        let body: JsonValue = client
            .submit_json("/api/echo", &json!({ "ping": true }))
            .await
            .unwrap();

        assert_eq!(body["clientId"], "test-id");
        assert_eq!(body["clientSecret"], "test-secret");
        assert_eq!(body["payload"], json!({ "ping": true }));
    }

    #[tokio::test]
    async fn test_wrong_credentials_are_rejected() {
        let service = FakeService::start().await;
        let config = ClientConfig::new(service.base_url(), "test-id", "wrong");
        let client = DocumentClient::new(config).unwrap();

        let err = client
            .submit_json::<_, JsonValue>("/api/echo", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "UNAUTHORIZED");
        assert_eq!(err.to_string(), "invalid client credentials");
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_malformed_error_body_degrades() {
        let service = FakeService::start().await;
        let client = service.client();

        let err = client.fetch_binary("/api/broken", &[]).await.unwrap_err();

        assert_eq!(err.code(), "HTTP_502");
        assert_eq!(err.to_string(), "API request failed with status 502");
        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn test_unreadable_success_body() {
        let service = FakeService::start().await;
        let client = service.client();

        let err = client
            .submit_json::<_, docrelay_core::dto::task::JobHandle>("/api/not-json", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.code(), error::INVALID_RESPONSE);
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Port 9 (discard) is almost never listening on loopback
        let config = ClientConfig::new("http://127.0.0.1:9", "id", "secret");
        let client = DocumentClient::new(config).unwrap();

        let err = client.delete_resource("/api/documents/x").await.unwrap_err();
        assert!(matches!(err, ClientError::Request { .. }));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let config = ClientConfig::new(silent_server().await, "id", "secret")
            .with_request_timeout(Duration::from_millis(200));
        let client = DocumentClient::new(config).unwrap();

        let err = client
            .submit_json::<_, JsonValue>("/api/echo", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.code(), error::TIMEOUT);
        assert_ne!(err.code(), error::TASK_TIMEOUT);
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("Request timeout"));
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status() {
        let config = ClientConfig::new(truncating_server().await, "id", "secret");
        let client = DocumentClient::new(config).unwrap();

        let err = client.fetch_binary("/api/anything", &[]).await.unwrap_err();

        assert_eq!(err.code(), "HTTP_500");
        assert_eq!(err.to_string(), "API request failed with status 500");
        assert_eq!(err.status(), Some(500));
    }
}
