//! Task endpoints

use async_trait::async_trait;
use docrelay_core::Operation;
use docrelay_core::domain::task::TaskRecord;
use docrelay_core::dto::task::JobHandle;
use serde_json::Value as JsonValue;
use std::future::Future;
use std::time::Duration;

use crate::DocumentClient;
use crate::error::Result;
use crate::poller::TaskStatusSource;

impl DocumentClient {
    // =============================================================================
    // Task Lifecycle
    // =============================================================================

    /// Get the current status of a task
    ///
    /// # Arguments
    /// * `task_id` - ID returned by an operation submission
    pub async fn get_task_status(&self, task_id: &str) -> Result<TaskRecord> {
        let path = format!("/api/tasks/{}", task_id);
        let response = self.send(self.request(reqwest::Method::GET, &path)).await?;

        self.handle_response(response).await
    }

    /// Submit a document operation
    ///
    /// # Arguments
    /// * `operation` - The remote operation to start
    /// * `payload` - Operation-specific JSON body
    ///
    /// # Returns
    /// The handle of the remote task carrying out the operation
    pub async fn submit_operation(
        &self,
        operation: Operation,
        payload: &JsonValue,
    ) -> Result<JobHandle> {
        self.submit_json(operation.path(), payload).await
    }

    /// Run a submission action and wait for its task to finish
    ///
    /// Uses this client's configuration for the poll interval and, unless
    /// `timeout` overrides it, the deadline.
    pub async fn execute_and_wait<F, Fut>(
        &self,
        action: F,
        timeout: Option<Duration>,
    ) -> Result<TaskRecord>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<JobHandle>> + Send,
    {
        self.poller().execute_and_wait(action, timeout).await
    }

    /// Submit an operation and wait for its task to finish
    pub async fn run_operation(
        &self,
        operation: Operation,
        payload: &JsonValue,
        timeout: Option<Duration>,
    ) -> Result<TaskRecord> {
        self.execute_and_wait(|| self.submit_operation(operation, payload), timeout)
            .await
    }
}

#[async_trait]
impl TaskStatusSource for DocumentClient {
    async fn task_status(&self, task_id: &str) -> Result<TaskRecord> {
        self.get_task_status(task_id).await
    }
}
