use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::runner::HostOutcome;

pub const SUCCESS_CODE: u16 = 1200;
pub const FAILURE_CODE: u16 = 1501;
pub const SUCCESS_STATUS: &str = "Successfully Done";
pub const FAILURE_STATUS: &str = "Task Failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub hostname: String,
    pub code: u16,
    pub stdout: String,
    pub status: String,
}

impl NormalizedResult {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Final per-task report handed to the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRunReport {
    #[serde(rename = "taskstatus")]
    pub task_status: Vec<NormalizedResult>,
    #[serde(rename = "data_task_res")]
    pub raw_host_data: Vec<HostOutcome>,
}

impl TaskRunReport {
    pub fn new(hosts: Vec<HostOutcome>) -> Self {
        Self {
            task_status: normalize(&hosts),
            raw_host_data: hosts,
        }
    }

    pub fn failed_hosts(&self) -> usize {
        self.task_status.iter().filter(|r| !r.is_success()).count()
    }
}

/// One result per host. Outcome is binary: rc 0 or absent is success.
pub fn normalize(hosts: &[HostOutcome]) -> Vec<NormalizedResult> {
    hosts.iter().map(normalize_host).collect()
}

fn normalize_host(host: &HostOutcome) -> NormalizedResult {
    let ok = matches!(host.details.return_code, None | Some(0));
    let (code, status) = if ok {
        (SUCCESS_CODE, SUCCESS_STATUS)
    } else {
        (FAILURE_CODE, FAILURE_STATUS)
    };
    NormalizedResult {
        hostname: host.host_id.clone(),
        code,
        stdout: stdout_of(&host.details.final_output),
        status: status.to_string(),
    }
}

// The runner reports either a result object or plain text.
fn stdout_of(final_output: &Value) -> String {
    match final_output {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("stdout") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        },
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::HostDetails;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn host(id: &str, rc: Option<i64>, final_output: Value) -> HostOutcome {
        HostOutcome {
            host_id: id.to_string(),
            details: HostDetails {
                tasks: Vec::new(),
                final_output,
                script_output: Vec::new(),
                return_code: rc,
                stats: None,
            },
        }
    }

    #[test]
    fn zero_or_absent_rc_is_success() {
        for rc in [Some(0), None] {
            let r = normalize(&[host("a", rc, json!(""))]);
            assert_eq!(r[0].code, SUCCESS_CODE);
            assert_eq!(r[0].status, SUCCESS_STATUS);
        }
        for rc in [Some(1), Some(-1), Some(2)] {
            let r = normalize(&[host("a", rc, json!(""))]);
            assert_eq!(r[0].code, FAILURE_CODE);
            assert_eq!(r[0].status, FAILURE_STATUS);
        }
    }

    #[test]
    fn stdout_from_object_or_text() {
        let r = normalize(&[
            host("obj", Some(0), json!({"stdout": "patched 3 packages", "rc": 0})),
            host("txt", Some(0), json!("plain text")),
            host("nostdout", Some(0), json!({"changed": true})),
        ]);
        assert_eq!(r[0].stdout, "patched 3 packages");
        assert_eq!(r[1].stdout, "plain text");
        assert_eq!(r[2].stdout, "");
    }

    #[test]
    fn two_hosts_mixed_outcome() {
        let report = TaskRunReport::new(vec![
            host("A", Some(0), json!({"stdout": "ok"})),
            host("B", Some(2), json!({"stdout": "bad"})),
        ]);
        assert_eq!(
            report.task_status,
            vec![
                NormalizedResult {
                    hostname: "A".to_string(),
                    code: SUCCESS_CODE,
                    stdout: "ok".to_string(),
                    status: SUCCESS_STATUS.to_string(),
                },
                NormalizedResult {
                    hostname: "B".to_string(),
                    code: FAILURE_CODE,
                    stdout: "bad".to_string(),
                    status: FAILURE_STATUS.to_string(),
                },
            ]
        );
        assert_eq!(report.failed_hosts(), 1);

        let wire = serde_json::to_value(&report).unwrap();
        assert_eq!(wire["taskstatus"][1]["code"], 1501);
        assert_eq!(wire["data_task_res"][0]["hostId"], "A");
    }
}
