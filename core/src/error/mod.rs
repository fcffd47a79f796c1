#[allow(clippy::module_inception)]
pub mod error;
pub mod stage;

pub use error::{CliError, TaskError};
pub use stage::{TaskFailure, TaskStage};
