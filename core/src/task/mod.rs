mod decode;
mod record;

pub use decode::{decode_task, TaskDescriptor};
pub use record::{task_id_of, TaskListResponse, TaskRecord};
