use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use fleetrun_core::api::{PortalConfig, StatusUpdate, TaskCompletion, TaskListResponse, TaskPortal};

use crate::http::{expect_success, read_json, send, ApiCall};

#[derive(Clone)]
pub struct PortalHttpClient {
    api_key: String,
    http: reqwest::Client,
    url_get_tasks: String,
    url_update_status: String,
    url_completed: String,
}

impl PortalHttpClient {
    pub fn new(cfg: &PortalConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .default_headers(header_map(cfg)?)
            .danger_accept_invalid_certs(cfg.accept_invalid_certs)
            .build()?;
        let normalized = cfg.base_url.trim_end_matches('/');
        Ok(Self {
            api_key: cfg.api_key.clone(),
            http,
            url_get_tasks: format!("{}/getTasks", normalized),
            url_update_status: format!("{}/updateStatus", normalized),
            url_completed: format!("{}/completed", normalized),
        })
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.api_key)
        }
    }
}

fn header_map(cfg: &PortalConfig) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &cfg.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid portal header name {name:?}: {e}"))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| anyhow::anyhow!("invalid value for portal header {}: {e}", name.as_str()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait]
impl TaskPortal for PortalHttpClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_tasks(&self) -> anyhow::Result<TaskListResponse> {
        let (call, url) = (ApiCall::ListTasks, &self.url_get_tasks);
        let resp = send(call, url, self.auth(self.http.get(url))).await?;
        let v = read_json(call, url, resp).await?;
        if v.is_null() {
            return Ok(TaskListResponse::default());
        }
        Ok(serde_json::from_value(v)?)
    }

    async fn update_status(&self, update: &StatusUpdate) -> anyhow::Result<()> {
        let (call, url) = (ApiCall::UpdateStatus, &self.url_update_status);
        tracing::debug!(
            target: "fleetrun.portal",
            task_id = %update.task_id,
            progress = update.progress_percentage,
            "sending progress"
        );
        let resp = send(call, url, self.auth(self.http.post(url).json(update))).await?;
        expect_success(call, url, resp).await?;
        Ok(())
    }

    async fn post_result(&self, completion: &TaskCompletion) -> anyhow::Result<()> {
        let (call, url) = (ApiCall::PostResult, &self.url_completed);
        tracing::debug!(
            target: "fleetrun.portal",
            task_id = %completion.task_id,
            status = ?completion.status,
            "sending task result"
        );
        let resp = send(call, url, self.auth(self.http.post(url).json(completion))).await?;
        expect_success(call, url, resp).await?;
        Ok(())
    }
}
