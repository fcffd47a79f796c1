use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::credential::{CredentialKind, CredentialResolver};
use crate::error::{TaskError, TaskFailure, TaskStage};
use crate::job::{build_job_descriptor, TaskArtifacts};
use crate::portal::{StatusUpdate, TaskCompletion, TaskStatus};
use crate::report::TaskRunReport;
use crate::runner::execute_job;
use crate::task::{decode_task, TaskDescriptor, TaskRecord};

use super::Agent;

pub(crate) const PROGRESS_PREPARED: u8 = 20;
pub(crate) const PROGRESS_EXECUTED: u8 = 75;

impl Agent<'_> {
    /// Decode, prepare, execute, normalize and report one task.
    ///
    /// `task_id` is captured from the raw record before any fallible step so
    /// failures are always reported against the right task.
    pub(crate) async fn process_task(
        &self,
        task_id: &str,
        raw: &Value,
    ) -> Result<TaskRunReport, TaskFailure> {
        let at = |stage: TaskStage| move |error: TaskError| TaskFailure::new(task_id, stage, error);

        let record = TaskRecord::from_value(raw).map_err(at(TaskStage::Decode))?;
        let task = decode_task(&record).map_err(at(TaskStage::Decode))?;
        tracing::info!(
            target: "fleetrun.agent",
            task_id = %task_id,
            task_name = %record.task_name,
            job_type = %task.job_type,
            job_sub_type = %task.job_sub_type,
            trigger = %task.trigger,
            "task decoded"
        );

        let artifacts = TaskArtifacts::allocate(Path::new(&self.ctx.cfg().artifacts.tasks_dir));
        let result = self.run_decoded(&task, &artifacts).await;
        if !self.ctx.cfg().artifacts.keep {
            artifacts.remove().await;
        }
        result
    }

    async fn run_decoded(
        &self,
        task: &TaskDescriptor,
        artifacts: &TaskArtifacts,
    ) -> Result<TaskRunReport, TaskFailure> {
        let cfg = self.ctx.cfg();
        let services = self.ctx.services();
        let task_id = task.task_id.as_str();
        let at = |stage: TaskStage| move |error: TaskError| TaskFailure::new(task_id, stage, error);

        let kind = CredentialKind::for_trigger(&task.trigger);
        let params = CredentialResolver::new(services.credentials.as_ref(), &cfg.credentials)
            .resolve(kind, &task.extra_args)
            .await
            .map_err(at(TaskStage::ResolveCredentials))?;
        tracing::debug!(
            target: "fleetrun.agent",
            task_id = %task_id,
            credential_kind = ?kind,
            params = params.len(),
            "credentials resolved"
        );

        artifacts
            .write_inventory(&task.inventory)
            .await
            .map_err(at(TaskStage::BuildDescriptor))?;
        let job = build_job_descriptor(
            &cfg.playbooks,
            task,
            &params,
            &artifacts.inventory_file,
        );
        artifacts
            .write_job(&job)
            .await
            .map_err(at(TaskStage::BuildDescriptor))?;
        tracing::info!(
            target: "fleetrun.agent",
            task_id = %task_id,
            task_file = %artifacts.task_file.display(),
            playbook = %job.playbook,
            "job descriptor written"
        );

        self.report_progress(
            task_id,
            PROGRESS_PREPARED,
            format!("job prepared: {}", job.playbook),
        )
        .await;

        let execution = execute_job(services.runner.as_ref(), &job)
            .await
            .map_err(at(TaskStage::Execute))?;
        artifacts
            .write_result(&execution)
            .await
            .map_err(at(TaskStage::Execute))?;

        let report = TaskRunReport::new(execution.output.clone());
        tracing::info!(
            target: "fleetrun.agent",
            task_id = %task_id,
            hosts = report.task_status.len(),
            failed_hosts = report.failed_hosts(),
            "task normalized"
        );

        let execution_log =
            to_wire("execution report", &execution).map_err(at(TaskStage::Normalize))?;
        let result = to_wire("task report", &report).map_err(at(TaskStage::Normalize))?;
        self.report_progress(task_id, PROGRESS_EXECUTED, execution_log.to_string())
            .await;

        let completion = TaskCompletion {
            task_id: task_id.to_string(),
            result,
            status: TaskStatus::Completed,
            log_message: execution_log,
        };
        services
            .portal
            .post_result(&completion)
            .await
            .map_err(|e| TaskFailure::new(task_id, TaskStage::ReportResult, TaskError::Portal(e)))?;

        Ok(report)
    }

    /// Progress is advisory: a failed update is logged and the task continues.
    async fn report_progress(&self, task_id: &str, percent: u8, message: String) {
        let update = StatusUpdate {
            task_id: task_id.to_string(),
            status: TaskStatus::InProgress,
            log_message: message,
            progress_percentage: percent,
        };
        if let Err(e) = self.ctx.services().portal.update_status(&update).await {
            tracing::warn!(
                target: "fleetrun.agent",
                task_id = %task_id,
                stage = %TaskStage::ReportProgress,
                progress = percent,
                error = %format!("{e:#}"),
                "progress update failed"
            );
        }
    }

    pub(crate) async fn report_failure(&self, failure: &TaskFailure) {
        let completion = TaskCompletion {
            task_id: failure.task_id.clone(),
            result: json!({
                "error": failure.error.to_string(),
                "kind": failure.error.kind(),
                "stage": failure.stage,
            }),
            status: TaskStatus::Failed,
            log_message: Value::String(failure.to_string()),
        };
        if let Err(e) = self.ctx.services().portal.post_result(&completion).await {
            tracing::error!(
                target: "fleetrun.agent",
                task_id = %failure.task_id,
                error = %format!("{e:#}"),
                "failure report could not be delivered"
            );
        }
    }
}

fn to_wire<T: Serialize>(what: &'static str, value: &T) -> Result<Value, TaskError> {
    serde_json::to_value(value).map_err(|source| TaskError::Report { what, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn unserializable_report_is_a_report_error() {
        let mut bad: BTreeMap<(u8, u8), u8> = BTreeMap::new();
        bad.insert((1, 2), 3);
        let err = to_wire("task report", &bad).unwrap_err();
        assert!(matches!(err, TaskError::Report { what: "task report", .. }));
        assert_eq!(err.kind(), "report");
        assert!(err.to_string().contains("task report"));
    }

    #[test]
    fn report_serializes_to_portal_shape() {
        let v = to_wire("task report", &TaskRunReport::new(Vec::new())).unwrap();
        assert_eq!(v, json!({"taskstatus": [], "data_task_res": []}));
    }
}
