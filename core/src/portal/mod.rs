mod traits;
mod types;

pub use traits::TaskPortal;
pub use types::{StatusUpdate, TaskCompletion, TaskStatus};
