#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use fleetrun_core::api::{
    AppConfig, AppContext, CredentialProvider, JobDescriptor, JobRunner, RunnerOutput, Services,
    StatusUpdate, TaskCompletion, TaskListResponse, TaskPortal,
};
use fleetrun_core::runner::parse_event_lines;

#[derive(Default)]
pub struct FakePortal {
    pub listing: Value,
    pub fail_listing: bool,
    pub fail_updates: bool,
    pub updates: Mutex<Vec<StatusUpdate>>,
    pub completions: Mutex<Vec<TaskCompletion>>,
}

impl FakePortal {
    pub fn with_tasks(tasks: Vec<Value>) -> Self {
        Self {
            listing: json!({"success": true, "result": {"tasks": [tasks]}}),
            ..Self::default()
        }
    }

    pub fn completions(&self) -> Vec<TaskCompletion> {
        self.completions.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskPortal for FakePortal {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_tasks(&self) -> anyhow::Result<TaskListResponse> {
        if self.fail_listing {
            anyhow::bail!("connection refused");
        }
        Ok(serde_json::from_value(self.listing.clone())?)
    }

    async fn update_status(&self, update: &StatusUpdate) -> anyhow::Result<()> {
        self.updates.lock().unwrap().push(update.clone());
        if self.fail_updates {
            anyhow::bail!("portal returned 503");
        }
        Ok(())
    }

    async fn post_result(&self, completion: &TaskCompletion) -> anyhow::Result<()> {
        self.completions.lock().unwrap().push(completion.clone());
        Ok(())
    }
}

pub struct FakeRunner {
    pub stream: String,
    pub rc: Option<i32>,
    pub jobs: Mutex<Vec<JobDescriptor>>,
}

impl FakeRunner {
    pub fn new(stream: &str, rc: Option<i32>) -> Self {
        Self {
            stream: stream.to_string(),
            rc,
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn jobs(&self) -> Vec<JobDescriptor> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRunner for FakeRunner {
    fn name(&self) -> &str {
        "fake"
    }

    async fn run(&self, job: &JobDescriptor) -> anyhow::Result<RunnerOutput> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(RunnerOutput::from_events(parse_event_lines(&self.stream), self.rc))
    }
}

#[derive(Default)]
pub struct FakeCredentials {
    pub fail_service_lookup: bool,
}

#[async_trait]
impl CredentialProvider for FakeCredentials {
    fn name(&self) -> &str {
        "fake"
    }

    async fn access_token(&self, _client_id: &str, _client_secret: &str) -> anyhow::Result<String> {
        Ok("bearer".to_string())
    }

    async fn service_id(&self, _token: &str, account_id: &str) -> anyhow::Result<String> {
        if self.fail_service_lookup {
            anyhow::bail!("No services found for account {account_id}");
        }
        Ok("svc-1".to_string())
    }

    async fn site_token(&self, _api_token: &str, _service_id: &str) -> anyhow::Result<String> {
        Ok("site-tok".to_string())
    }
}

pub const TWO_HOST_STREAM: &str = r#"{"event":"playbook_on_start","stdout":"","event_data":{}}
{"event":"runner_on_ok","stdout":"ok: [A]","event_data":{"host":"A","task":"patch","res":{"rc":0,"stdout":"3 updates installed"}}}
{"event":"runner_on_ok","stdout":"ok: [B]","event_data":{"host":"B","task":"patch","res":{"rc":2,"stdout":"reboot pending"}}}
{"event":"playbook_on_stats","stdout":"PLAY RECAP","event_data":{"ok":{"A":1,"B":1},"failures":{}}}"#;

pub fn b64(s: &str) -> String {
    STANDARD.encode(s)
}

pub fn task_record(task_id: &str, sub_type: &str, trigger: &str, eargs: &str) -> Value {
    let input = json!({
        "template": b64("{}"),
        "inventory": b64("[all]\nA\nB\n"),
        "trigger": trigger,
        "eargs": eargs,
    });
    json!({
        "taskId": task_id,
        "taskName": format!("task {task_id}"),
        "taskType": "PATCH",
        "taskSubType": sub_type,
        "taskStatus": "PENDING",
        "taskInput": b64(&input.to_string()),
    })
}

pub fn context(
    portal: Arc<FakePortal>,
    runner: Arc<FakeRunner>,
    credentials: Arc<FakeCredentials>,
    tasks_dir: &std::path::Path,
) -> AppContext {
    let mut cfg = AppConfig::default();
    cfg.artifacts.tasks_dir = tasks_dir.to_string_lossy().into_owned();
    cfg.playbooks.dir = "/srv/playbooks".to_string();
    AppContext::new(
        cfg,
        Services {
            portal,
            runner,
            credentials,
        },
    )
}
