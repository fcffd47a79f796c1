//! HTTP plumbing shared by the portal and credential clients.
//!
//! Every failure names the remote call it belongs to, so a task failure report
//! reads e.g. `credential.service_id: https://… returned 401: unauthorized`.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

const PREVIEW_CHARS: usize = 512;

/// The remote calls the agent makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    ListTasks,
    UpdateStatus,
    PostResult,
    AccessToken,
    ServiceId,
    SiteToken,
}

impl ApiCall {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListTasks => "portal.get_tasks",
            Self::UpdateStatus => "portal.update_status",
            Self::PostResult => "portal.completed",
            Self::AccessToken => "credential.access_token",
            Self::ServiceId => "credential.service_id",
            Self::SiteToken => "credential.site_token",
        }
    }
}

impl fmt::Display for ApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("{call}: {url} unreachable ({cause}): {source}")]
    Transport {
        call: ApiCall,
        url: String,
        cause: &'static str,
        source: reqwest::Error,
    },
    #[error("{call}: {url} returned {status}: {body}")]
    Status {
        call: ApiCall,
        url: String,
        status: u16,
        body: String,
    },
    #[error("{call}: {url} sent a body that is not JSON: {source} | body={body}")]
    Decode {
        call: ApiCall,
        url: String,
        body: String,
        source: serde_json::Error,
    },
}

impl HttpError {
    pub fn call(&self) -> ApiCall {
        match self {
            Self::Transport { call, .. } | Self::Status { call, .. } | Self::Decode { call, .. } => {
                *call
            }
        }
    }

    fn transport(call: ApiCall, url: &str, source: reqwest::Error) -> Self {
        let cause = if source.is_timeout() {
            "timeout"
        } else if source.is_connect() {
            "connect"
        } else if source.is_body() {
            "body"
        } else {
            "request"
        };
        Self::Transport {
            call,
            url: url.to_string(),
            cause,
            source,
        }
    }
}

/// Trimmed text cut to a bounded number of characters for logs and errors.
pub(crate) fn preview(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "<empty>".to_string();
    }
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub(crate) async fn send(
    call: ApiCall,
    url: &str,
    req: reqwest::RequestBuilder,
) -> Result<reqwest::Response, HttpError> {
    tracing::debug!(target: "fleetrun.http", call = %call, url = %url, "request");
    let resp = req
        .send()
        .await
        .map_err(|e| HttpError::transport(call, url, e))?;
    tracing::debug!(target: "fleetrun.http", call = %call, status = %resp.status(), "response");
    Ok(resp)
}

async fn body_of(call: ApiCall, url: &str, resp: reqwest::Response) -> Result<String, HttpError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| HttpError::transport(call, url, e))?;
    if !status.is_success() {
        return Err(HttpError::Status {
            call,
            url: url.to_string(),
            status: status.as_u16(),
            body: preview(&body),
        });
    }
    Ok(body)
}

/// JSON body of a 2xx response; an empty body is `Value::Null`.
pub(crate) async fn read_json(
    call: ApiCall,
    url: &str,
    resp: reqwest::Response,
) -> Result<Value, HttpError> {
    let body = body_of(call, url, resp).await?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|source| HttpError::Decode {
        call,
        url: url.to_string(),
        body: preview(&body),
        source,
    })
}

/// Accept any 2xx; the body is not inspected.
pub(crate) async fn expect_success(
    call: ApiCall,
    url: &str,
    resp: reqwest::Response,
) -> Result<(), HttpError> {
    body_of(call, url, resp).await.map(|_| ())
}
