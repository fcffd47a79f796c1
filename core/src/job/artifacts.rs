use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::TaskError;

use super::JobDescriptor;

/// Per-task file names under the tasks directory. Fresh for every task.
#[derive(Debug, Clone)]
pub struct TaskArtifacts {
    pub task_file: PathBuf,
    pub inventory_file: PathBuf,
    pub result_file: PathBuf,
}

impl TaskArtifacts {
    pub fn allocate(tasks_dir: &Path) -> Self {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let unique_id = uuid::Uuid::new_v4().to_string();
        Self::with_ids(tasks_dir, &timestamp, &unique_id)
    }

    fn with_ids(tasks_dir: &Path, timestamp: &str, unique_id: &str) -> Self {
        Self {
            task_file: tasks_dir.join(format!("task_{unique_id}_{timestamp}.json")),
            inventory_file: tasks_dir.join(format!("inventory_{timestamp}_{unique_id}.ini")),
            result_file: tasks_dir.join(format!("task_result_{unique_id}_{timestamp}.json")),
        }
    }

    pub async fn write_inventory(&self, inventory: &str) -> Result<(), TaskError> {
        write_file(&self.inventory_file, inventory.as_bytes()).await
    }

    pub async fn write_job(&self, job: &JobDescriptor) -> Result<(), TaskError> {
        write_json(&self.task_file, job).await
    }

    pub async fn write_result<T: Serialize>(&self, result: &T) -> Result<(), TaskError> {
        write_json(&self.result_file, result).await
    }

    /// Best-effort removal; missing files are fine.
    pub async fn remove(&self) {
        for path in [&self.task_file, &self.inventory_file, &self.result_file] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove artifact")
                }
            }
        }
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), TaskError> {
    let body = serde_json::to_vec_pretty(value).map_err(|e| {
        TaskError::artifact(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    write_file(path, &body).await
}

async fn write_file(path: &Path, body: &[u8]) -> Result<(), TaskError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| TaskError::artifact(parent, e))?;
    }
    tokio::fs::write(path, body)
        .await
        .map_err(|e| TaskError::artifact(path, e))?;
    tracing::debug!(path = %path.display(), bytes = body.len(), "artifact written");
    Ok(())
}
