mod artifacts;
mod descriptor;
mod kind;

pub use artifacts::TaskArtifacts;
pub use descriptor::{
    build_job_descriptor, parse_extra_vars, render_extra_vars, CredentialParams, JobDescriptor,
    TARGET_HOSTS_TOKEN,
};
pub use kind::{resolve_playbook, JobSubType};
