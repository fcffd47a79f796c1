use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::job::JobDescriptor;

use super::aggregate::{aggregate_events, merge_stats, HostOutcome};
use super::JobRunner;

/// Raw runner output plus the per-host fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub stdout: String,
    pub output: Vec<HostOutcome>,
}

/// Run `job` and aggregate its events.
///
/// A descriptor with an empty playbook or inventory is rejected before the
/// runner is touched.
pub async fn execute_job(
    runner: &dyn JobRunner,
    job: &JobDescriptor,
) -> Result<ExecutionReport, TaskError> {
    if job.playbook.trim().is_empty() {
        return Err(TaskError::InvalidJob(
            "playbook path is empty (unresolved job type)".to_string(),
        ));
    }
    if job.inventory.trim().is_empty() {
        return Err(TaskError::InvalidJob("inventory path is empty".to_string()));
    }

    tracing::info!(
        target: "fleetrun.runner",
        runner = %runner.name(),
        playbook = %job.playbook,
        inventory = %job.inventory,
        "job run starting"
    );
    let output = runner.run(job).await.map_err(TaskError::EngineExecution)?;

    let mut hosts = aggregate_events(&output.events, output.rc);
    merge_stats(&mut hosts, &output.stats);
    tracing::info!(
        target: "fleetrun.runner",
        rc = ?output.rc,
        events = output.events.len(),
        hosts = hosts.len(),
        "job run finished"
    );

    Ok(ExecutionReport {
        stdout: output.stdout,
        output: hosts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{parse_event_lines, RunnerOutput};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct CannedRunner {
        called: AtomicBool,
        stream: &'static str,
        rc: Option<i32>,
        fail: bool,
    }

    impl CannedRunner {
        fn new(stream: &'static str, rc: Option<i32>) -> Self {
            Self {
                called: AtomicBool::new(false),
                stream,
                rc,
                fail: false,
            }
        }
    }

    #[async_trait]
    impl JobRunner for CannedRunner {
        fn name(&self) -> &str {
            "canned"
        }

        async fn run(&self, _job: &JobDescriptor) -> anyhow::Result<RunnerOutput> {
            self.called.store(true, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("ansible-runner: No such file or directory");
            }
            Ok(RunnerOutput::from_events(
                parse_event_lines(self.stream),
                self.rc,
            ))
        }
    }

    fn job(playbook: &str) -> JobDescriptor {
        JobDescriptor {
            playbook: playbook.to_string(),
            inventory: "/tmp/inv.ini".to_string(),
            extra_vars: String::new(),
        }
    }

    #[tokio::test]
    async fn empty_playbook_never_reaches_runner() {
        let runner = CannedRunner::new("", Some(0));
        let err = execute_job(&runner, &job("")).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidJob(_)));
        assert!(!runner.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_inventory_is_rejected() {
        let runner = CannedRunner::new("", Some(0));
        let mut j = job("/p/site.yml");
        j.inventory = String::new();
        assert!(matches!(
            execute_job(&runner, &j).await,
            Err(TaskError::InvalidJob(_))
        ));
        assert!(!runner.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn launch_failure_is_engine_error() {
        let mut runner = CannedRunner::new("", None);
        runner.fail = true;
        let err = execute_job(&runner, &job("/p/site.yml")).await.unwrap_err();
        assert!(matches!(err, TaskError::EngineExecution(_)));
    }

    #[tokio::test]
    async fn aggregates_hosts_and_stats() {
        let runner = CannedRunner::new(
            r#"{"event":"runner_on_ok","stdout":"ok: [a]","event_data":{"host":"a","task":"t","res":{"rc":0,"stdout":"done"}}}
{"event":"runner_on_failed","stdout":"fatal: [b]","event_data":{"host":"b","task":"t","res":{"rc":2}}}
{"event":"playbook_on_stats","event_data":{"ok":{"a":1},"failures":{"b":1},"skipped":{"c":1}}}"#,
            Some(2),
        );
        let report = execute_job(&runner, &job("/p/site.yml")).await.unwrap();
        assert_eq!(report.output.len(), 2);
        assert_eq!(report.output[0].details.return_code, Some(0));
        assert_eq!(report.output[1].details.return_code, Some(2));
        assert!(report.output[1].details.stats.is_some());
        assert_eq!(report.stdout, "ok: [a]\nfatal: [b]");
    }
}
