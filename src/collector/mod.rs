//! Kafka Connect 상태 수집 모듈
//!
//! One scrape cycle: list connectors, fetch every connector's status, map the
//! states onto the metric schema and decide whether the cycle was "up".
//!
//! # Example
//!
//! ```ignore
//! use kafka_connect_exporter::collector::{Collector, ConnectClient, FailurePolicy};
//! use kafka_connect_exporter::metrics::Descriptors;
//!
//! let client = ConnectClient::new(&url, DEFAULT_TIMEOUT)?;
//! let collector = Collector::new(client, Descriptors::default(), FailurePolicy::Skip);
//! let outcome = collector.collect().await;
//! ```

mod client;
mod parser;

pub use client::{ConnectClient, DEFAULT_TIMEOUT};
pub use parser::{
    parse_connectors, parse_status, task_id_from_f64, ConnectorState, ConnectorStatus,
    TaskStatus,
};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::metrics::{Descriptors, Sample};

/// What to do when a single connector's status cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log, skip the connector and keep going; the cycle stays up
    #[default]
    Skip,
    /// Drop everything collected so far and report the cycle as down
    Abort,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Skip => write!(f, "skip"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}

/// Result of one scrape cycle
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeOutcome {
    /// Whether the cycle completed
    pub up: bool,
    /// Connector and task samples, followed by the up sample
    pub samples: Vec<Sample>,
    /// Connectors left out under [`FailurePolicy::Skip`]
    pub skipped: Vec<String>,
}

/// Collector 구조체 - 한 번의 scrape 사이클을 수행
pub struct Collector {
    client: ConnectClient,
    descriptors: Descriptors,
    policy: FailurePolicy,
}

impl Collector {
    /// 새 Collector 생성
    pub fn new(client: ConnectClient, descriptors: Descriptors, policy: FailurePolicy) -> Self {
        info!(
            base_url = %client.base_url(),
            policy = %policy,
            "Collecting data from Kafka Connect"
        );
        Self {
            client,
            descriptors,
            policy,
        }
    }

    /// Run one scrape cycle
    pub async fn collect(&self) -> ScrapeOutcome {
        let names = match self.client.fetch_connectors().await {
            Ok(names) => names,
            Err(e) => {
                error!(error = %e, kind = ?e.kind(), "Failed to fetch connector list, aborting");
                return self.failed();
            }
        };

        debug!(connectors = names.len(), "Fetched connector list");

        let mut samples = Vec::new();
        let mut skipped = Vec::new();

        for name in names {
            let status = match self.client.fetch_connector_status(&name).await {
                Ok(status) => status,
                Err(e) => match self.policy {
                    FailurePolicy::Skip => {
                        warn!(connector = %name, error = %e, "Failed to fetch connector status, skipping");
                        skipped.push(name);
                        continue;
                    }
                    FailurePolicy::Abort => {
                        error!(connector = %name, error = %e, "Failed to fetch connector status, aborting");
                        return self.failed();
                    }
                },
            };

            self.push_status(&mut samples, &status);
        }

        samples.push(self.up_sample(true));

        ScrapeOutcome {
            up: true,
            samples,
            skipped,
        }
    }

    /// Run one scrape cycle, giving up once `deadline` has passed.
    ///
    /// On expiry the in-flight requests are dropped and nothing collected so
    /// far is reported.
    pub async fn collect_within(&self, deadline: Option<Duration>) -> ScrapeOutcome {
        let Some(deadline) = deadline else {
            return self.collect().await;
        };

        match tokio::time::timeout(deadline, self.collect()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(
                    deadline_ms = deadline.as_millis() as u64,
                    "Scrape deadline exceeded, aborting"
                );
                self.failed()
            }
        }
    }

    /// Map one connector status onto samples
    fn push_status(&self, samples: &mut Vec<Sample>, status: &ConnectorStatus) {
        samples.push(Sample::new(
            &self.descriptors.connector_state,
            1.0,
            vec![
                status.name.clone(),
                status.connector.state_label(),
                status.connector.worker_id.clone(),
            ],
        ));

        for task in &status.tasks {
            samples.push(Sample::new(
                &self.descriptors.task_state,
                1.0,
                vec![
                    status.name.clone(),
                    task.state_label(),
                    task.worker_id.clone(),
                    task.id_label(),
                ],
            ));
        }
    }

    fn up_sample(&self, up: bool) -> Sample {
        Sample::new(&self.descriptors.up, if up { 1.0 } else { 0.0 }, vec![])
    }

    fn failed(&self) -> ScrapeOutcome {
        ScrapeOutcome {
            up: false,
            samples: vec![self.up_sample(false)],
            skipped: vec![],
        }
    }

    /// 클라이언트 참조 반환
    pub fn client(&self) -> &ConnectClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn collector(policy: FailurePolicy) -> Collector {
        let url = Url::parse("http://localhost:8083").unwrap();
        let client = ConnectClient::new(&url, DEFAULT_TIMEOUT).unwrap();
        Collector::new(client, Descriptors::default(), policy)
    }

    #[test]
    fn test_push_status_maps_connector_and_tasks() {
        let collector = collector(FailurePolicy::Skip);
        let status = parse_status(
            br#"{
                "name": "c1",
                "connector": {"state": "RUNNING", "worker_id": "w1"},
                "tasks": [
                    {"id": 0, "state": "RUNNING", "worker_id": "w1"},
                    {"id": 1, "state": "FAILED", "worker_id": "w2"}
                ]
            }"#,
        )
        .unwrap();

        let mut samples = Vec::new();
        collector.push_status(&mut samples, &status);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].name(), "kafka_connect_connector_state");
        assert_eq!(samples[0].label_values, vec!["c1", "running", "w1"]);
        assert_eq!(samples[0].value, 1.0);
        assert_eq!(samples[2].name(), "kafka_connect_connector_task_state");
        assert_eq!(samples[2].label_values, vec!["c1", "failed", "w2", "1"]);
        assert_eq!(samples[2].value, 1.0);
    }

    #[test]
    fn test_failed_outcome_only_has_up() {
        let outcome = collector(FailurePolicy::Abort).failed();
        assert!(!outcome.up);
        assert_eq!(outcome.samples.len(), 1);
        assert_eq!(outcome.samples[0].name(), "kafka_connect_up");
        assert_eq!(outcome.samples[0].value, 0.0);
    }

    #[test]
    fn test_failure_policy_serde() {
        let policy: FailurePolicy = serde_yaml::from_str("abort").unwrap();
        assert_eq!(policy, FailurePolicy::Abort);
        assert_eq!(FailurePolicy::default(), FailurePolicy::Skip);
        assert_eq!(FailurePolicy::Skip.to_string(), "skip");
    }
}
