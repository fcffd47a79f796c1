use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::types::EngineEvent;

pub const STATS_EVENT: &str = "playbook_on_stats";

const STATS_CATEGORIES: [&str; 8] = [
    "changed",
    "dark",
    "failures",
    "ignored",
    "ok",
    "processed",
    "rescued",
    "skipped",
];

/// Best-effort: non-JSON lines and unknown shapes yield `None`.
pub fn parse_event_line(line: &str) -> Option<EngineEvent> {
    let s = line.trim();
    if !(s.starts_with('{') && s.ends_with('}')) {
        return None;
    }
    serde_json::from_str(s).ok()
}

pub fn parse_event_lines(input: &str) -> Vec<EngineEvent> {
    input.lines().filter_map(parse_event_line).collect()
}

/// Pivot the last stats event's `category -> host -> count` counters into
/// `host -> category -> count`.
pub fn collect_stats(events: &[EngineEvent]) -> BTreeMap<String, Value> {
    let mut by_host: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    let Some(stats) = events.iter().rev().find(|e| e.event == STATS_EVENT) else {
        return BTreeMap::new();
    };

    for category in STATS_CATEGORIES {
        let Some(hosts) = stats.event_data.extra.get(category).and_then(Value::as_object) else {
            continue;
        };
        for (host, count) in hosts {
            by_host
                .entry(host.clone())
                .or_default()
                .insert(category.to_string(), count.clone());
        }
    }

    by_host
        .into_iter()
        .map(|(host, counters)| (host, Value::Object(counters)))
        .collect()
}

pub(crate) fn join_stdout(events: &[EngineEvent]) -> String {
    events
        .iter()
        .map(|e| e.stdout.as_str())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
