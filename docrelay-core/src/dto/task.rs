//! Task DTOs

use serde::{Deserialize, Serialize};

/// Handle returned by an operation submission
///
/// Identifies the remote task that will carry out the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    pub task_id: String,
}

impl JobHandle {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_handle_wire_name() {
        let handle: JobHandle = serde_json::from_str(r#"{"taskId":"t1"}"#).unwrap();
        assert_eq!(handle.task_id(), "t1");
        assert_eq!(
            serde_json::to_string(&JobHandle::new("t2")).unwrap(),
            r#"{"taskId":"t2"}"#
        );
    }
}
