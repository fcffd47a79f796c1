use async_trait::async_trait;

use crate::job::JobDescriptor;

use super::types::RunnerOutput;

/// The configuration-management engine that applies a playbook to an inventory.
///
/// Implementations own their working/state directory and block until the run
/// terminates.
#[async_trait]
pub trait JobRunner: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self, job: &JobDescriptor) -> anyhow::Result<RunnerOutput>;
}
