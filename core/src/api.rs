//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `fleetrun_core::api` instead of reaching into internal modules.

pub use crate::agent::{Agent, PollSummary};
pub use crate::config::{
    load, AnsibleRunnerConfig, AppConfig, ArtifactsConfig, CredentialsConfig, LoggingConfig,
    PlaybooksConfig, PortalConfig, ReplayRunnerConfig, RunnerConfig,
};
pub use crate::context::{AppContext, Services};
pub use crate::credential::{CredentialKind, CredentialProvider, CredentialResolver};
pub use crate::error::{CliError, TaskError, TaskFailure, TaskStage};
pub use crate::job::{
    build_job_descriptor, parse_extra_vars, render_extra_vars, CredentialParams, JobDescriptor,
    JobSubType, TaskArtifacts,
};
pub use crate::portal::{StatusUpdate, TaskCompletion, TaskPortal, TaskStatus};
pub use crate::report::{normalize, NormalizedResult, TaskRunReport};
pub use crate::runner::{
    execute_job, parse_event_line, parse_event_lines, EngineEvent, ExecutionReport, HostOutcome,
    JobRunner, RunnerOutput,
};
pub use crate::task::{decode_task, task_id_of, TaskDescriptor, TaskListResponse, TaskRecord};
