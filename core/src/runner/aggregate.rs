//! Folds the runner's event stream into one [`HostOutcome`] per host.
//!
//! Merge rules, applied per event in emission order:
//! - the first event naming a host creates its outcome, with `return_code`
//!   taken from the event's `rc` or else the run's exit code;
//! - every host-scoped event is appended to that host's task records;
//! - a `runner_on_ok` event additionally appends `res.script_output`,
//!   overwrites `return_code` with `res.rc` and overwrites `finalout` with
//!   `res`. The last successful event wins.
//!
//! Stats are merged afterwards and never create an outcome on their own.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::EngineEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostOutcome {
    #[serde(rename = "hostId")]
    pub host_id: String,
    #[serde(rename = "hostDetails")]
    pub details: HostDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostDetails {
    pub tasks: Vec<TaskEventRecord>,
    /// Result object of the last successful event, or `""` if there was none.
    #[serde(rename = "finalout")]
    pub final_output: Value,
    pub script_output: Vec<Value>,
    pub return_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEventRecord {
    pub task: String,
    #[serde(rename = "status")]
    pub event_kind: String,
    pub stdout: String,
    pub result: Value,
}

#[derive(Default)]
struct HostAccumulator {
    order: Vec<HostOutcome>,
    index: HashMap<String, usize>,
}

impl HostAccumulator {
    fn apply(mut self, event: &EngineEvent, run_rc: Option<i32>) -> Self {
        let Some(host) = event.host() else {
            return self;
        };

        let idx = match self.index.get(host) {
            Some(&idx) => idx,
            None => {
                let rc = event.rc().or(run_rc.map(i64::from));
                self.order.push(HostOutcome {
                    host_id: host.to_string(),
                    details: HostDetails {
                        tasks: Vec::new(),
                        final_output: Value::String(String::new()),
                        script_output: Vec::new(),
                        return_code: rc,
                        stats: None,
                    },
                });
                self.index.insert(host.to_string(), self.order.len() - 1);
                self.order.len() - 1
            }
        };
        let details = &mut self.order[idx].details;

        let res = event.event_data.res.as_ref();
        if event.is_ok() {
            if let Some(res) = res {
                if let Some(out) = res.get("script_output").filter(|v| !v.is_null()) {
                    details.script_output.push(out.clone());
                }
                if let Some(rc) = res.get("rc").and_then(Value::as_i64) {
                    details.return_code = Some(rc);
                }
                details.final_output = res.clone();
            }
        }

        details.tasks.push(TaskEventRecord {
            task: event
                .event_data
                .task
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            event_kind: event.event.clone(),
            stdout: event.stdout.clone(),
            result: res.cloned().unwrap_or_else(|| Value::Object(Default::default())),
        });

        self
    }
}

/// Hosts in order of first appearance.
pub fn aggregate_events(events: &[EngineEvent], run_rc: Option<i32>) -> Vec<HostOutcome> {
    events
        .iter()
        .fold(HostAccumulator::default(), |acc, ev| acc.apply(ev, run_rc))
        .order
}

pub fn merge_stats(hosts: &mut [HostOutcome], stats: &BTreeMap<String, Value>) {
    for host in hosts.iter_mut() {
        if let Some(s) = stats.get(&host.host_id) {
            host.details.stats = Some(s.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::EventData;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ev(kind: &str, host: Option<&str>, task: &str, res: Option<Value>) -> EngineEvent {
        EngineEvent {
            event: kind.to_string(),
            stdout: format!("{kind} {}", host.unwrap_or("-")),
            event_data: EventData {
                host: host.map(str::to_string),
                task: Some(task.to_string()),
                res,
                ..EventData::default()
            },
        }
    }

    #[test]
    fn last_success_wins() {
        let events = vec![
            ev("runner_on_ok", Some("a"), "first", Some(json!({"rc": 0, "stdout": "one"}))),
            ev("runner_on_ok", Some("a"), "second", Some(json!({"rc": 3, "stdout": "two"}))),
        ];
        let hosts = aggregate_events(&events, Some(0));
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].details.return_code, Some(3));
        assert_eq!(hosts[0].details.final_output, json!({"rc": 3, "stdout": "two"}));
        assert_eq!(hosts[0].details.tasks.len(), 2);
        assert_eq!(hosts[0].details.tasks[1].task, "second");
    }

    #[test]
    fn failed_events_are_recorded_but_do_not_overwrite() {
        let events = vec![
            ev("runner_on_ok", Some("a"), "gather", Some(json!({"rc": 0, "stdout": "ok"}))),
            ev("runner_on_failed", Some("a"), "patch", Some(json!({"rc": 5, "stdout": "boom"}))),
        ];
        let hosts = aggregate_events(&events, Some(2));
        let d = &hosts[0].details;
        assert_eq!(d.return_code, Some(0));
        assert_eq!(d.final_output, json!({"rc": 0, "stdout": "ok"}));
        assert_eq!(d.tasks[1].event_kind, "runner_on_failed");
        assert_eq!(d.tasks[1].result, json!({"rc": 5, "stdout": "boom"}));
    }

    #[test]
    fn first_sight_defaults_to_run_rc() {
        let events = vec![
            ev("runner_on_unreachable", Some("b"), "connect", None),
            ev("playbook_on_task_start", None, "patch", None),
        ];
        let hosts = aggregate_events(&events, Some(4));
        assert_eq!(hosts.len(), 1);
        let d = &hosts[0].details;
        assert_eq!(d.return_code, Some(4));
        assert_eq!(d.final_output, json!(""));
        assert_eq!(d.tasks[0].result, json!({}));
    }

    #[test]
    fn event_rc_takes_precedence_on_first_sight() {
        let mut first = ev("runner_on_start", Some("c"), "t", None);
        first.event_data.rc = Some(json!(7));
        let hosts = aggregate_events(&[first], Some(0));
        assert_eq!(hosts[0].details.return_code, Some(7));
    }

    #[test]
    fn script_output_is_collected_from_successes() {
        let events = vec![
            ev("runner_on_ok", Some("a"), "s1", Some(json!({"script_output": "x"}))),
            ev("runner_on_ok", Some("a"), "s2", Some(json!({"script_output": null}))),
            ev("runner_on_failed", Some("a"), "s3", Some(json!({"script_output": "y"}))),
        ];
        let hosts = aggregate_events(&events, Some(0));
        assert_eq!(hosts[0].details.script_output, vec![json!("x")]);
    }

    #[test]
    fn host_order_follows_first_appearance() {
        let events = vec![
            ev("runner_on_ok", Some("z"), "t", Some(json!({}))),
            ev("runner_on_ok", Some("a"), "t", Some(json!({}))),
            ev("runner_on_ok", Some("z"), "t2", Some(json!({}))),
        ];
        let ids: Vec<_> = aggregate_events(&events, Some(0))
            .into_iter()
            .map(|h| h.host_id)
            .collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn stats_never_create_hosts() {
        let mut hosts = aggregate_events(
            &[ev("runner_on_ok", Some("a"), "t", Some(json!({"rc": 0})))],
            Some(0),
        );
        let stats: BTreeMap<String, Value> = [
            ("a".to_string(), json!({"ok": 1})),
            ("ghost".to_string(), json!({"ok": 3})),
        ]
        .into_iter()
        .collect();
        merge_stats(&mut hosts, &stats);
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].details.stats, Some(json!({"ok": 1})));
    }

    #[test]
    fn serializes_in_portal_shape() {
        let hosts = aggregate_events(
            &[ev("runner_on_ok", Some("a"), "t", Some(json!({"rc": 0})))],
            Some(0),
        );
        let v = serde_json::to_value(&hosts[0]).unwrap();
        assert_eq!(v["hostId"], "a");
        assert_eq!(v["hostDetails"]["return_code"], 0);
        assert_eq!(v["hostDetails"]["tasks"][0]["status"], "runner_on_ok");
        assert!(v["hostDetails"].get("stats").is_none());
    }
}
