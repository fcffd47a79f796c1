use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PlaybooksConfig;
use crate::task::TaskDescriptor;

use super::resolve_playbook;

/// Installation parameters produced by the credential resolver.
pub type CredentialParams = BTreeMap<String, String>;

pub const TARGET_HOSTS_TOKEN: &str = "target_hosts=all";

/// A job ready for the runner. Persisted as the task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Empty when the job type could not be resolved.
    pub playbook: String,
    pub inventory: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra_vars: String,
}

impl JobDescriptor {
    pub fn extra_vars_map(&self) -> BTreeMap<String, String> {
        parse_extra_vars(&self.extra_vars)
    }
}

pub fn build_job_descriptor(
    playbooks: &PlaybooksConfig,
    task: &TaskDescriptor,
    params: &CredentialParams,
    inventory_path: &Path,
) -> JobDescriptor {
    let playbook = resolve_playbook(playbooks, &task.job_type, &task.job_sub_type)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    JobDescriptor {
        playbook,
        inventory: inventory_path.to_string_lossy().into_owned(),
        extra_vars: render_extra_vars(params),
    }
}

/// `target_hosts=all k=v ...`, or empty when there are no parameters.
///
/// Jobs without credentials get no `target_hosts` scoping at all.
pub fn render_extra_vars(params: &CredentialParams) -> String {
    if params.is_empty() {
        return String::new();
    }
    let mut out = String::from(TARGET_HOSTS_TOKEN);
    for (k, v) in params {
        out.push(' ');
        out.push_str(k);
        out.push('=');
        out.push_str(v);
    }
    out
}

/// Split on whitespace, then on the first `=`. Tokens without `=` are dropped.
pub fn parse_extra_vars(s: &str) -> BTreeMap<String, String> {
    s.split_whitespace()
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
