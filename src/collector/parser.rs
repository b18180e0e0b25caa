//! Kafka Connect 상태 응답 파싱
//!
//! Typed model of the two documents the exporter reads:
//!
//! ```text
//! GET /connectors                 -> ["c1", "c2"]
//! GET /connectors/{name}/status   -> {
//!   "name": "c1",
//!   "connector": { "state": "RUNNING", "worker_id": "10.0.0.1:8083" },
//!   "tasks": [ { "id": 0, "state": "RUNNING", "worker_id": "10.0.0.1:8083" } ]
//! }
//! ```
//!
//! Fields Connect adds on top of these (`type`, `trace`) are ignored.

use serde::{Deserialize, Deserializer};

use crate::error::CollectResult;

/// Largest integer an f64 represents exactly (2^53)
const MAX_EXACT_TASK_ID: f64 = 9_007_199_254_740_992.0;

/// Status document of a single connector
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectorStatus {
    /// Connector name
    pub name: String,
    /// State of the connector instance itself
    pub connector: ConnectorState,
    /// Task states, in the order Connect reports them
    #[serde(default)]
    pub tasks: Vec<TaskStatus>,
}

/// Connector instance state
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectorState {
    /// RUNNING, FAILED, PAUSED, UNASSIGNED, ... (case varies on the wire)
    pub state: String,
    /// Worker currently owning the connector; empty if unknown
    #[serde(default)]
    pub worker_id: String,
}

/// State of one task of a connector
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskStatus {
    /// Task id. Connect sends a JSON number; see [`deserialize_task_id`].
    #[serde(deserialize_with = "deserialize_task_id")]
    pub id: u64,
    pub state: String,
    #[serde(default)]
    pub worker_id: String,
}

impl ConnectorState {
    /// State as used for the `state` label
    pub fn state_label(&self) -> String {
        self.state.to_lowercase()
    }
}

impl TaskStatus {
    /// State as used for the `state` label
    pub fn state_label(&self) -> String {
        self.state.to_lowercase()
    }

    /// Task id as used for the `task_id` label
    pub fn id_label(&self) -> String {
        self.id.to_string()
    }
}

/// Convert a task id received as a JSON number into an integer.
///
/// `3` and `3.0` both become `3`. Fractional, negative, non-finite values and
/// values beyond 2^53 are rejected instead of being truncated.
pub fn task_id_from_f64(raw: f64) -> Result<u64, String> {
    if !raw.is_finite() {
        return Err(format!("task id {} is not a finite number", raw));
    }
    if raw.fract() != 0.0 {
        return Err(format!("task id {} is not an integer", raw));
    }
    if !(0.0..=MAX_EXACT_TASK_ID).contains(&raw) {
        return Err(format!("task id {} is out of range", raw));
    }
    Ok(raw as u64)
}

fn deserialize_task_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    task_id_from_f64(raw).map_err(serde::de::Error::custom)
}

/// Parse the body of `GET /connectors`
pub fn parse_connectors(body: &[u8]) -> CollectResult<Vec<String>> {
    Ok(serde_json::from_slice(body)?)
}

/// Parse the body of `GET /connectors/{name}/status`
pub fn parse_status(body: &[u8]) -> CollectResult<ConnectorStatus> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_connectors_keeps_server_order() {
        let names = parse_connectors(br#"["zeta", "alpha", "mid"]"#).unwrap();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_connectors_rejects_object() {
        let err = parse_connectors(br#"{"name": "c1"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_parse_status() {
        let body = br#"{
            "name": "c1",
            "connector": {"state": "RUNNING", "worker_id": "w1"},
            "tasks": [
                {"id": 0, "state": "RUNNING", "worker_id": "w1"},
                {"id": 1.0, "state": "FAILED", "worker_id": "w2", "trace": "boom"}
            ],
            "type": "sink"
        }"#;

        let status = parse_status(body).unwrap();
        assert_eq!(status.name, "c1");
        assert_eq!(status.connector.state_label(), "running");
        assert_eq!(status.connector.worker_id, "w1");
        assert_eq!(status.tasks.len(), 2);
        assert_eq!(status.tasks[1].id_label(), "1");
        assert_eq!(status.tasks[1].state_label(), "failed");
    }

    #[test]
    fn test_parse_status_missing_optional_fields() {
        let body = br#"{"name": "c1", "connector": {"state": "UNASSIGNED"}}"#;

        let status = parse_status(body).unwrap();
        assert_eq!(status.connector.worker_id, "");
        assert!(status.tasks.is_empty());
    }

    #[test]
    fn test_parse_status_fractional_task_id() {
        let body = br#"{
            "name": "c1",
            "connector": {"state": "RUNNING", "worker_id": "w1"},
            "tasks": [{"id": 3.5, "state": "RUNNING", "worker_id": "w1"}]
        }"#;

        let err = parse_status(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains("not an integer"));
    }

    #[test]
    fn test_task_id_conversion() {
        assert_eq!(task_id_from_f64(3.0), Ok(3));
        assert_eq!(task_id_from_f64(0.0), Ok(0));
        assert_eq!(task_id_from_f64(MAX_EXACT_TASK_ID), Ok(9_007_199_254_740_992));
        assert!(task_id_from_f64(3.5).is_err());
        assert!(task_id_from_f64(-1.0).is_err());
        assert!(task_id_from_f64(f64::NAN).is_err());
        assert!(task_id_from_f64(f64::INFINITY).is_err());
        assert!(task_id_from_f64(1e300).is_err());
    }

    #[test]
    fn test_state_label_is_lowercase() {
        let state = ConnectorState {
            state: "Paused".to_string(),
            worker_id: String::new(),
        };
        assert_eq!(state.state_label(), "paused");
    }
}
