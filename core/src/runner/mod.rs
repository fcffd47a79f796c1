mod aggregate;
mod execute;
mod stream;
mod traits;
pub mod types;

pub use aggregate::{aggregate_events, merge_stats, HostDetails, HostOutcome, TaskEventRecord};
pub use execute::{execute_job, ExecutionReport};
pub use stream::{collect_stats, parse_event_line, parse_event_lines, STATS_EVENT};
pub use traits::JobRunner;
pub use types::{EngineEvent, EventData, RunnerOutput, RUNNER_ON_OK};
