use anyhow::Context;

use crate::config::CredentialsConfig;
use crate::error::TaskError;
use crate::job::CredentialParams;

use super::CredentialProvider;

/// Installer credential requirement, selected by the task trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    None,
    /// Windows EDR installer: needs the customer id only.
    CustomerId,
    /// Linux EDR installer: needs an exchanged site token.
    SiteToken,
}

impl CredentialKind {
    /// Exact match; anything unrecognised needs no credentials.
    pub fn for_trigger(trigger: &str) -> Self {
        match trigger {
            "install_win_edr" => Self::CustomerId,
            "install_linux_edr" => Self::SiteToken,
            _ => Self::None,
        }
    }
}

pub struct CredentialResolver<'a> {
    provider: &'a dyn CredentialProvider,
    cfg: &'a CredentialsConfig,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(provider: &'a dyn CredentialProvider, cfg: &'a CredentialsConfig) -> Self {
        Self { provider, cfg }
    }

    /// `extra_args` carries the customer or account identifier.
    pub async fn resolve(
        &self,
        kind: CredentialKind,
        extra_args: &str,
    ) -> Result<CredentialParams, TaskError> {
        let id = extra_args.trim();
        let mut params = CredentialParams::new();
        match kind {
            CredentialKind::None => {}
            CredentialKind::CustomerId => {
                params.insert("customer_id".to_string(), id.to_string());
                if let Some(src) = self.cfg.win_installer_src.as_deref() {
                    params.insert("src_exe".to_string(), src.to_string());
                }
            }
            CredentialKind::SiteToken => {
                let (service_id, site_token) =
                    self.exchange(id).await.map_err(TaskError::Credential)?;
                params.insert("service_id".to_string(), service_id);
                params.insert("site_token".to_string(), site_token);
                params.insert("api_key".to_string(), self.cfg.sentinel_api_key.clone());
            }
        }
        Ok(params)
    }

    async fn exchange(&self, account_id: &str) -> anyhow::Result<(String, String)> {
        let provider = self.provider.name();
        let token = self
            .provider
            .access_token(&self.cfg.client_id, &self.cfg.client_secret)
            .await
            .context("access token exchange")?;
        tracing::info!(target: "fleetrun.credential", provider = %provider, "obtained access token");

        let service_id = self
            .provider
            .service_id(&token, account_id)
            .await
            .with_context(|| format!("service id lookup for account {account_id}"))?;
        tracing::info!(
            target: "fleetrun.credential",
            provider = %provider,
            service_id = %service_id,
            "resolved service id"
        );

        let site_token = self
            .provider
            .site_token(&self.cfg.sentinel_api_token, &service_id)
            .await
            .with_context(|| format!("site token lookup for service {service_id}"))?;
        tracing::info!(target: "fleetrun.credential", provider = %provider, "obtained site token");

        Ok((service_id, site_token))
    }
}
