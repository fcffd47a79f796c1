use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TaskError;

use super::TaskRecord;

/// Structured form of a task, derived once from a [`TaskRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub task_id: String,
    pub job_type: String,
    pub job_sub_type: String,
    /// Selects the credential variant. Empty when the payload has none.
    pub trigger: String,
    pub template: String,
    pub inventory: String,
    pub extra_args: String,
}

pub fn decode_task(record: &TaskRecord) -> Result<TaskDescriptor, TaskError> {
    let raw = decode_b64(&record.task_input, "taskInput")?;
    let payload: Value = serde_json::from_slice(&raw)
        .map_err(|e| TaskError::decode(format!("taskInput is not valid JSON: {e}")))?;
    if !payload.is_object() {
        return Err(TaskError::decode("taskInput must be a JSON object"));
    }

    let template = decode_text_field(&payload, "template")?;
    let inventory = decode_text_field(&payload, "inventory")?;

    Ok(TaskDescriptor {
        task_id: record.task_id.clone(),
        job_type: record.task_type.clone(),
        job_sub_type: record.task_sub_type.clone(),
        trigger: str_field(&payload, "trigger"),
        template,
        inventory,
        extra_args: str_field(&payload, "eargs"),
    })
}

fn decode_text_field(payload: &Value, field: &'static str) -> Result<String, TaskError> {
    let encoded = payload
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| TaskError::decode(format!("taskInput.{field} missing or not a string")))?;
    let bytes = decode_b64(encoded, field)?;
    String::from_utf8(bytes).map_err(|e| TaskError::decode(format!("{field} is not UTF-8: {e}")))
}

/// Line-wrapped input (MIME, `base64` CLI) is accepted; whitespace is dropped.
fn decode_b64(encoded: &str, field: &str) -> Result<Vec<u8>, TaskError> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| TaskError::decode(format!("{field} is not valid base64: {e}")))
}

fn str_field(payload: &Value, field: &str) -> String {
    payload
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
