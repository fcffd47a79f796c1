use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::stream::{collect_stats, join_stdout};

pub const RUNNER_ON_OK: &str = "runner_on_ok";

/// One structured event from the runner's stream (ansible-runner job event).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineEvent {
    #[serde(default)]
    pub event: String,

    #[serde(default)]
    pub stdout: String,

    #[serde(default)]
    pub event_data: EventData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rc: Option<Value>,

    /// Everything else, e.g. the per-category counters of the stats event.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EngineEvent {
    /// Host this event is scoped to; blank hosts count as none.
    pub fn host(&self) -> Option<&str> {
        self.event_data
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
    }

    pub fn is_ok(&self) -> bool {
        self.event == RUNNER_ON_OK
    }

    pub fn rc(&self) -> Option<i64> {
        self.event_data.rc.as_ref().and_then(Value::as_i64)
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunnerOutput {
    /// Process exit code; `None` when killed by a signal.
    pub rc: Option<i32>,
    pub events: Vec<EngineEvent>,
    /// Summary counters keyed by host.
    pub stats: BTreeMap<String, Value>,
    pub stdout: String,
}

impl RunnerOutput {
    pub fn from_events(events: Vec<EngineEvent>, rc: Option<i32>) -> Self {
        let stats = collect_stats(&events);
        let stdout = join_stdout(&events);
        Self {
            rc,
            events,
            stats,
            stdout,
        }
    }
}
