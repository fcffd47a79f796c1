use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub portal: PortalConfig,

    #[serde(default)]
    pub playbooks: PlaybooksConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "fleetrun_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_portal_base_url")]
    pub base_url: String,

    /// Sent as a bearer token when non-empty.
    #[serde(default)]
    pub api_key: String,

    /// Extra static headers attached to every portal request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default = "default_portal_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_portal_base_url() -> String {
    "http://127.0.0.1:8080/api/agent".to_string()
}

fn default_portal_timeout_ms() -> u64 {
    30_000
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_portal_base_url(),
            api_key: String::new(),
            headers: BTreeMap::new(),
            timeout_ms: default_portal_timeout_ms(),
            accept_invalid_certs: false,
        }
    }
}

/// Playbook file names, relative to `dir`, one per known job subtype.
///
/// An empty entry leaves that subtype unresolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybooksConfig {
    pub dir: String,
    pub mac_updates: String,
    pub linux_updates: String,
    pub windows_updates: String,
    pub linux_edr_install: String,
    pub mac_edr_install: String,
    pub win_edr_install: String,
}

fn default_playbooks_dir() -> String {
    "/ansible/playbooks".to_string()
}

impl Default for PlaybooksConfig {
    fn default() -> Self {
        Self {
            dir: default_playbooks_dir(),
            mac_updates: "mac_updates.yml".to_string(),
            linux_updates: "linux_updates.yml".to_string(),
            windows_updates: "windows_updates.yml".to_string(),
            linux_edr_install: "linux_edr_install.yml".to_string(),
            mac_edr_install: "mac_edr_install.yml".to_string(),
            win_edr_install: "win_edr_install.yml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub sentinel_api_token: String,
    #[serde(default)]
    pub sentinel_api_key: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
    #[serde(default = "default_sites_url")]
    pub sites_url: String,

    #[serde(default = "default_credentials_timeout_ms")]
    pub timeout_ms: u64,

    /// Installer location passed to the Windows EDR playbook as `src_exe`.
    #[serde(default)]
    pub win_installer_src: Option<String>,
}

fn default_token_url() -> String {
    "https://api.v3.clouddna.autodesk.com/oauth2/app/token".to_string()
}

fn default_graphql_url() -> String {
    "https://api.v3.clouddna.autodesk.com/graphql".to_string()
}

fn default_sites_url() -> String {
    "https://autodesk.sentinelone.net/web/api/v2.1/sites".to_string()
}

fn default_credentials_timeout_ms() -> u64 {
    15_000
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            sentinel_api_token: String::new(),
            sentinel_api_key: String::new(),
            token_url: default_token_url(),
            graphql_url: default_graphql_url(),
            sites_url: default_sites_url(),
            timeout_ms: default_credentials_timeout_ms(),
            win_installer_src: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum RunnerConfig {
    Ansible(AnsibleRunnerConfig),
    Replay(ReplayRunnerConfig),
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig::Ansible(AnsibleRunnerConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsibleRunnerConfig {
    #[serde(default = "default_ansible_bin")]
    pub bin: String,

    /// ansible-runner private data dir. Relative paths resolve against the cwd.
    #[serde(default = "default_private_data_dir")]
    pub private_data_dir: String,

    /// Kill the run after this long. Unset waits indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_ansible_bin() -> String {
    "ansible-runner".to_string()
}

fn default_private_data_dir() -> String {
    ".ansible-runner".to_string()
}

impl Default for AnsibleRunnerConfig {
    fn default() -> Self {
        Self {
            bin: default_ansible_bin(),
            private_data_dir: default_private_data_dir(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayRunnerConfig {
    pub events_file: String,

    #[serde(default)]
    pub rc: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: String,

    /// Keep task, inventory and result files after the task is reported.
    #[serde(default = "default_keep_artifacts")]
    pub keep: bool,
}

fn default_tasks_dir() -> String {
    "/tmp/fleetrun/tasks".to_string()
}

fn default_keep_artifacts() -> bool {
    true
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            tasks_dir: default_tasks_dir(),
            keep: default_keep_artifacts(),
        }
    }
}
