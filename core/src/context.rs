use std::sync::Arc;

use crate::config::AppConfig;
use crate::credential::CredentialProvider;
use crate::portal::TaskPortal;
use crate::runner::JobRunner;

/// External collaborators the agent talks to.
#[derive(Clone)]
pub struct Services {
    pub portal: Arc<dyn TaskPortal>,
    pub runner: Arc<dyn JobRunner>,
    pub credentials: Arc<dyn CredentialProvider>,
}

/// Read-only process state: configuration loaded once plus the services built
/// from it.
#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    services: Services,
}

impl AppContext {
    pub fn new(cfg: AppConfig, services: Services) -> Self {
        Self { cfg, services }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}
