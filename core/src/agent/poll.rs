use std::time::Duration;

use crate::context::AppContext;
use crate::error::CliError;
use crate::task::task_id_of;

/// Counters for one poll-execute-report pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub fetched: usize,
    pub completed: usize,
    pub failed: usize,
    /// Records without a usable task id; nothing can be reported for them.
    pub skipped: usize,
}

/// The poll-execute-report loop. Tasks run strictly one after another.
pub struct Agent<'a> {
    pub(crate) ctx: &'a AppContext,
}

impl<'a> Agent<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    /// Fetch pending tasks and process each of them.
    ///
    /// Only a failed listing is an error; a task's failure is reported to the
    /// portal and the loop moves on to the next one.
    #[tracing::instrument(name = "agent.poll_once", skip(self))]
    pub async fn poll_once(&self) -> Result<PollSummary, CliError> {
        let portal = &self.ctx.services().portal;
        let listing = portal
            .list_tasks()
            .await
            .map_err(|e| CliError::Portal(format!("{e:#}")))?;
        let records = listing.into_records();

        let mut summary = PollSummary {
            fetched: records.len(),
            ..PollSummary::default()
        };
        if records.is_empty() {
            tracing::info!(target: "fleetrun.agent", "no pending tasks");
            return Ok(summary);
        }
        tracing::info!(target: "fleetrun.agent", tasks = records.len(), "tasks fetched");

        for raw in &records {
            let Some(task_id) = task_id_of(raw) else {
                tracing::warn!(target: "fleetrun.agent", "task record without taskId skipped");
                summary.skipped += 1;
                continue;
            };

            match self.process_task(&task_id, raw).await {
                Ok(report) => {
                    tracing::info!(
                        target: "fleetrun.agent",
                        task_id = %task_id,
                        hosts = report.task_status.len(),
                        failed_hosts = report.failed_hosts(),
                        "task completed"
                    );
                    summary.completed += 1;
                }
                Err(failure) => {
                    tracing::error!(
                        target: "fleetrun.agent",
                        task_id = %failure.task_id,
                        stage = %failure.stage,
                        kind = failure.error.kind(),
                        error = ?failure.error,
                        "task failed"
                    );
                    self.report_failure(&failure).await;
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Poll at a fixed interval until Ctrl-C. Listing failures are logged and
    /// retried on the next tick.
    pub async fn watch(&self, interval: Duration) {
        loop {
            match self.poll_once().await {
                Ok(summary) => tracing::info!(target: "fleetrun.agent", ?summary, "poll finished"),
                Err(e) => tracing::error!(target: "fleetrun.agent", error = %e, "poll failed"),
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!(target: "fleetrun.agent", "interrupted, stopping");
                    return;
                }
            }
        }
    }
}
