//! Installation token exchange for the endpoint-protection installers.
//!
//! Three discrete calls: client credentials to a bearer token, bearer token
//! and account to a service id (GraphQL), service id to a site registration
//! token.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use fleetrun_core::api::{CredentialProvider, CredentialsConfig};

use crate::http::{read_json, send, ApiCall};

const SERVICE_ID_QUERY: &str = r#"query Query($accountId: ID) {
  account(id: $accountId) {
    services {
      serviceId
    }
  }
}"#;

#[derive(Clone)]
pub struct EdrCredentialClient {
    http: reqwest::Client,
    token_url: String,
    graphql_url: String,
    sites_url: String,
}

impl EdrCredentialClient {
    pub fn new(cfg: &CredentialsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            token_url: cfg.token_url.clone(),
            graphql_url: cfg.graphql_url.clone(),
            sites_url: cfg.sites_url.clone(),
        })
    }
}

#[async_trait]
impl CredentialProvider for EdrCredentialClient {
    fn name(&self) -> &str {
        "edr"
    }

    async fn access_token(&self, client_id: &str, client_secret: &str) -> anyhow::Result<String> {
        let url = &self.token_url;
        let req = self.http.post(url).json(&json!({
            "client_id": client_id,
            "client_secret": client_secret,
        }));
        let call = ApiCall::AccessToken;
        let v = read_json(call, url, send(call, url, req).await?).await?;
        v.get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("token response from {url} has no access_token"))
    }

    async fn service_id(&self, access_token: &str, account_id: &str) -> anyhow::Result<String> {
        let url = &self.graphql_url;
        let req = self.http.post(url).bearer_auth(access_token).json(&json!({
            "query": SERVICE_ID_QUERY,
            "variables": {"accountId": account_id},
        }));
        let call = ApiCall::ServiceId;
        let v = read_json(call, url, send(call, url, req).await?).await?;
        if let Some(errors) = v.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                anyhow::bail!("graphql errors for account {account_id}: {}", Value::Array(errors.clone()));
            }
        }
        v.pointer("/data/account/services/0/serviceId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("No services found for account {account_id}"))
    }

    async fn site_token(&self, api_token: &str, service_id: &str) -> anyhow::Result<String> {
        let url = &self.sites_url;
        let req = self
            .http
            .get(url)
            .query(&[("name", service_id), ("state", "active")])
            .header(reqwest::header::AUTHORIZATION, format!("ApiToken {api_token}"));
        let call = ApiCall::SiteToken;
        let v = read_json(call, url, send(call, url, req).await?).await?;
        v.pointer("/data/sites/0/registrationToken")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("No active site found for service ID {service_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpError;
    use mockito::{Matcher, Server};

    fn client(server: &Server) -> EdrCredentialClient {
        EdrCredentialClient::new(&CredentialsConfig {
            token_url: format!("{}/oauth2/app/token", server.url()),
            graphql_url: format!("{}/graphql", server.url()),
            sites_url: format!("{}/web/api/v2.1/sites", server.url()),
            timeout_ms: 1_000,
            ..CredentialsConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_access_token() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/oauth2/app/token")
            .match_body(Matcher::Json(json!({"client_id": "cid", "client_secret": "sec"})))
            .with_status(200)
            .with_body(r#"{"access_token":"tok-1","expires_in":3600}"#)
            .create_async()
            .await;

        let token = client(&server).access_token("cid", "sec").await.unwrap();
        assert_eq!(token, "tok-1");
    }

    #[tokio::test]
    async fn test_access_token_rejected() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/oauth2/app/token")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let err = client(&server).access_token("cid", "bad").await.unwrap_err();
        match err.downcast_ref::<HttpError>() {
            Some(HttpError::Status { call, status, .. }) => {
                assert_eq!(*call, ApiCall::AccessToken);
                assert_eq!(*status, 401);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_service_id() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .match_header("authorization", "Bearer tok-1")
            .match_body(Matcher::PartialJson(json!({"variables": {"accountId": "acct-9"}})))
            .with_status(200)
            .with_body(r#"{"data":{"account":{"services":[{"serviceId":"svc-42"},{"serviceId":"svc-43"}]}}}"#)
            .create_async()
            .await;

        let id = client(&server).service_id("tok-1", "acct-9").await.unwrap();
        assert_eq!(id, "svc-42");
    }

    #[tokio::test]
    async fn test_service_id_missing() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data":{"account":{"services":[]}}}"#)
            .create_async()
            .await;

        let err = client(&server).service_id("tok-1", "acct-9").await.unwrap_err();
        assert!(err.to_string().contains("No services found for account acct-9"));
    }

    #[tokio::test]
    async fn test_site_token() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/web/api/v2.1/sites")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "svc-42".into()),
                Matcher::UrlEncoded("state".into(), "active".into()),
            ]))
            .match_header("authorization", "ApiToken s1-token")
            .with_status(200)
            .with_body(r#"{"data":{"sites":[{"registrationToken":"reg-tok"}]}}"#)
            .create_async()
            .await;

        let token = client(&server).site_token("s1-token", "svc-42").await.unwrap();
        assert_eq!(token, "reg-tok");
    }

    #[tokio::test]
    async fn test_site_token_no_active_site() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/web/api/v2.1/sites")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":{"sites":[]}}"#)
            .create_async()
            .await;

        let err = client(&server).site_token("s1-token", "svc-42").await.unwrap_err();
        assert!(err.to_string().contains("No active site found"));
    }
}
