use std::sync::Arc;

use anyhow::Result;

use fleetrun_core::api::{
    AppConfig, CredentialProvider, JobRunner, RunnerConfig, Services, TaskPortal,
};

use crate::credential::EdrCredentialClient;
use crate::portal::PortalHttpClient;
use crate::runner::{AnsibleRunnerPlugin, ReplayRunnerPlugin};

pub fn build_portal(cfg: &AppConfig) -> Result<Arc<dyn TaskPortal>> {
    Ok(Arc::new(PortalHttpClient::new(&cfg.portal)?))
}

pub fn build_runner(cfg: &AppConfig) -> Arc<dyn JobRunner> {
    match &cfg.runner {
        RunnerConfig::Ansible(a_cfg) => Arc::new(AnsibleRunnerPlugin::new(a_cfg)),
        RunnerConfig::Replay(r_cfg) => Arc::new(ReplayRunnerPlugin::new(
            r_cfg.events_file.clone(),
            r_cfg.rc,
        )),
    }
}

pub fn build_credentials(cfg: &AppConfig) -> Result<Arc<dyn CredentialProvider>> {
    Ok(Arc::new(EdrCredentialClient::new(&cfg.credentials)?))
}

pub fn build_services(cfg: &AppConfig) -> Result<Services> {
    Ok(Services {
        portal: build_portal(cfg)?,
        runner: build_runner(cfg),
        credentials: build_credentials(cfg)?,
    })
}
