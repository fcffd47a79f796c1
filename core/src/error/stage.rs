use std::fmt;

use super::TaskError;

/// Pipeline step a task was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStage {
    Decode,
    ResolveCredentials,
    BuildDescriptor,
    Execute,
    Normalize,
    ReportProgress,
    ReportResult,
}

impl TaskStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::ResolveCredentials => "resolve_credentials",
            Self::BuildDescriptor => "build_descriptor",
            Self::Execute => "execute",
            Self::Normalize => "normalize",
            Self::ReportProgress => "report_progress",
            Self::ReportResult => "report_result",
        }
    }
}

impl fmt::Display for TaskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct TaskFailure {
    pub task_id: String,
    pub stage: TaskStage,
    pub error: TaskError,
}

impl TaskFailure {
    pub fn new(task_id: impl Into<String>, stage: TaskStage, error: TaskError) -> Self {
        Self {
            task_id: task_id.into(),
            stage,
            error,
        }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task {} failed at {}: {}",
            self.task_id, self.stage, self.error
        )
    }
}

impl std::error::Error for TaskFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
