use anyhow::{Context, Result};
use async_trait::async_trait;

use fleetrun_core::api::{JobDescriptor, JobRunner, RunnerOutput};
use fleetrun_core::runner::parse_event_lines;

/// Replays a recorded JSON-lines event stream instead of running anything.
pub struct ReplayRunnerPlugin {
    events_file: String,
    rc: i32,
}

impl ReplayRunnerPlugin {
    pub fn new(events_file: String, rc: i32) -> Self {
        Self { events_file, rc }
    }
}

#[async_trait]
impl JobRunner for ReplayRunnerPlugin {
    fn name(&self) -> &str {
        "replay"
    }

    async fn run(&self, job: &JobDescriptor) -> Result<RunnerOutput> {
        let content = tokio::fs::read_to_string(&self.events_file)
            .await
            .with_context(|| format!("read replay events {}", self.events_file))?;
        let events = parse_event_lines(&content);
        tracing::info!(
            target: "fleetrun.runner",
            events_file = %self.events_file,
            events = events.len(),
            playbook = %job.playbook,
            "replaying recorded run"
        );
        Ok(RunnerOutput::from_events(events, Some(self.rc)))
    }
}
