use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TaskError;

/// A task as listed by the portal. `task_input` is base64-encoded JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub task_id: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub task_type: String,
    #[serde(default)]
    pub task_sub_type: String,
    #[serde(default)]
    pub task_status: String,
    pub task_input: String,
}

impl TaskRecord {
    /// Parse one raw record. Numeric task ids are accepted and stringified.
    pub fn from_value(raw: &Value) -> Result<Self, TaskError> {
        let mut raw = raw.clone();
        if let Some(id) = task_id_of(&raw) {
            raw["taskId"] = Value::String(id);
        }
        serde_json::from_value(raw).map_err(|e| TaskError::decode(format!("task record: {e}")))
    }
}

/// Pull the task id out of a raw record before anything else can fail.
pub fn task_id_of(raw: &Value) -> Option<String> {
    match raw.get("taskId")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Body of `GET {base}/getTasks`.
///
/// Records stay raw so a malformed one only fails its own task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub result: Option<TaskListResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListResult {
    /// `null` and absent both mean no tasks.
    #[serde(default)]
    pub tasks: Option<Vec<Vec<Value>>>,
}

impl TaskListResponse {
    /// Flatten the batches in listing order. Unsuccessful responses yield nothing.
    pub fn into_records(self) -> Vec<Value> {
        if self.success != Some(true) {
            return Vec::new();
        }
        self.result
            .and_then(|r| r.tasks)
            .map(|batches| batches.into_iter().flatten().collect())
            .unwrap_or_default()
    }
}
