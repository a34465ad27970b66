//! Task poller
//!
//! Waits for a remote task to reach a terminal state. One poller loop owns
//! one task ID and its own deadline; nothing is shared between loops except
//! the read-only configuration, so any number can run concurrently.
//!
//! A loop ends in exactly one of four ways:
//! - COMPLETED: the status record is returned
//! - FAILED: a [`ClientError::TaskFailed`] built from the record
//! - deadline passed while PENDING/PROCESSING: [`ClientError::TaskTimeout`]
//! - cancellation signalled: [`ClientError::Cancelled`]
//!
//! Errors raised while reading the status end the loop immediately.
//! In-flight tasks are not persisted: if the process stops mid-poll the
//! remote task keeps running but nobody will collect it.

use async_trait::async_trait;
use docrelay_core::ClientConfig;
use docrelay_core::domain::task::{TaskRecord, TaskStatus};
use docrelay_core::dto::task::JobHandle;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::error::{ClientError, Result};

/// Anything that can report the status of a remote task
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    /// Read the current status record of `task_id`
    async fn task_status(&self, task_id: &str) -> Result<TaskRecord>;
}

#[async_trait]
impl<T: TaskStatusSource + ?Sized> TaskStatusSource for &T {
    async fn task_status(&self, task_id: &str) -> Result<TaskRecord> {
        (**self).task_status(task_id).await
    }
}

#[async_trait]
impl<T: TaskStatusSource + ?Sized> TaskStatusSource for Arc<T> {
    async fn task_status(&self, task_id: &str) -> Result<TaskRecord> {
        (**self).task_status(task_id).await
    }
}

/// Polls a [`TaskStatusSource`] until a task finishes
pub struct TaskPoller<S> {
    source: S,
    timeout: Duration,
    poll_interval: Duration,
    cancel: Option<watch::Receiver<bool>>,
}

impl<S: TaskStatusSource> TaskPoller<S> {
    /// Creates a poller with explicit timings
    pub fn new(source: S, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            source,
            timeout,
            poll_interval,
            cancel: None,
        }
    }

    /// Creates a poller using the configured default timeout and poll interval
    pub fn from_config(source: S, config: &ClientConfig) -> Self {
        Self::new(source, config.default_timeout(), config.poll_interval())
    }

    /// Stop waiting as soon as `true` is published on this channel
    ///
    /// The flag is checked before every status read and while sleeping
    /// between reads. A dropped sender never cancels.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Deadline used when a call does not override it
    pub fn default_timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a submission action once, then wait for the task it started
    ///
    /// An error from the action is returned as is; no polling happens.
    pub async fn execute_and_wait<F, Fut>(
        &self,
        action: F,
        timeout: Option<Duration>,
    ) -> Result<TaskRecord>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<JobHandle>>,
    {
        let handle = action().await?;
        debug!("Submitted task {}", handle.task_id());

        self.poll_until_complete(handle.task_id(), timeout).await
    }

    /// Wait for `task_id` to reach a terminal state
    ///
    /// The deadline is `timeout` if given, else the poller's default, and is
    /// measured from the start of this call. It is checked after each
    /// non-terminal read, so the last read happens at or after the deadline.
    pub async fn poll_until_complete(
        &self,
        task_id: &str,
        timeout: Option<Duration>,
    ) -> Result<TaskRecord> {
        let timeout = timeout.unwrap_or(self.timeout);
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            if self.is_cancelled() {
                return Err(Self::cancelled(task_id));
            }

            let record = self.source.task_status(task_id).await?;
            polls += 1;

            match record.status {
                TaskStatus::Completed => {
                    info!(
                        "Task {} completed after {} poll(s) in {:?}",
                        task_id,
                        polls,
                        started.elapsed()
                    );
                    return Ok(record);
                }
                TaskStatus::Failed => {
                    return Err(ClientError::task_failed(task_id, record.error));
                }
                TaskStatus::Pending | TaskStatus::Processing => {}
            }

            if started.elapsed() >= timeout {
                return Err(ClientError::TaskTimeout {
                    task_id: task_id.to_string(),
                    timeout,
                });
            }

            debug!(
                "Task {} is {} ({}%), polling again in {:?}",
                task_id, record.status, record.progress, self.poll_interval
            );

            self.pause(task_id).await?;
        }
    }

    /// Sleep one poll interval, waking early only on cancellation
    async fn pause(&self, task_id: &str) -> Result<()> {
        let Some(cancel) = &self.cancel else {
            time::sleep(self.poll_interval).await;
            return Ok(());
        };

        let mut cancel = cancel.clone();
        let sleep = time::sleep(self.poll_interval);
        tokio::pin!(sleep);

        let cancelled = tokio::select! {
            _ = &mut sleep => false,
            signal = cancel.wait_for(|cancelled| *cancelled) => signal.is_ok(),
        };

        if cancelled {
            return Err(Self::cancelled(task_id));
        }
        if !sleep.is_elapsed() {
            // Sender went away without cancelling
            sleep.await;
        }
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|cancel| *cancel.borrow())
    }

    fn cancelled(task_id: &str) -> ClientError {
        ClientError::Cancelled {
            task_id: task_id.to_string(),
        }
    }
}
