use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("portal error: {0}")]
    Portal(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Errors that end the processing of a single task.
///
/// None of these escape the per-task boundary of the agent loop.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("credential resolution failed: {0:#}")]
    Credential(anyhow::Error),
    #[error("invalid job: {0}")]
    InvalidJob(String),
    #[error("job runner failed: {0:#}")]
    EngineExecution(anyhow::Error),
    #[error("portal communication failed: {0:#}")]
    Portal(anyhow::Error),
    #[error("{what} serialization failed: {source}")]
    Report {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("artifact io error: {path}: {source}")]
    Artifact {
        path: String,
        source: std::io::Error,
    },
}

impl TaskError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn artifact(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Artifact {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Credential(_) => "credential",
            Self::InvalidJob(_) => "invalid_job",
            Self::EngineExecution(_) => "engine_execution",
            Self::Portal(_) => "portal",
            Self::Report { .. } => "report",
            Self::Artifact { .. } => "artifact",
        }
    }
}
