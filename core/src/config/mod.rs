mod load;
mod types;

pub use load::{load, parse, resolve_config_path, CONFIG_ENV, DEFAULT_CONFIG_FILE};
pub use types::{
    AnsibleRunnerConfig, AppConfig, ArtifactsConfig, CredentialsConfig, LoggingConfig,
    PlaybooksConfig, PortalConfig, ReplayRunnerConfig, RunnerConfig,
};
