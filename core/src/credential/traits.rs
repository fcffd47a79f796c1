use async_trait::async_trait;

/// Vendor API issuing installation tokens for endpoint-protection agents.
///
/// Each method is one discrete call; a failure aborts the exchange chain.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Exchange client credentials for a bearer token.
    async fn access_token(&self, client_id: &str, client_secret: &str) -> anyhow::Result<String>;

    /// First service registered under `account_id`.
    async fn service_id(&self, access_token: &str, account_id: &str) -> anyhow::Result<String>;

    /// Registration token of the active site named after `service_id`.
    async fn site_token(&self, api_token: &str, service_id: &str) -> anyhow::Result<String>;
}
