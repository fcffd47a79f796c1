use async_trait::async_trait;

use crate::task::TaskListResponse;

use super::{StatusUpdate, TaskCompletion};

/// The remote task portal: supplies work and receives progress and results.
#[async_trait]
pub trait TaskPortal: Send + Sync {
    fn name(&self) -> &str;
    async fn list_tasks(&self) -> anyhow::Result<TaskListResponse>;
    async fn update_status(&self, update: &StatusUpdate) -> anyhow::Result<()>;
    async fn post_result(&self, completion: &TaskCompletion) -> anyhow::Result<()>;
}
