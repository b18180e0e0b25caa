//! Metric schema for kafka-connect-exporter
//!
//! Descriptors are built once when the process starts and handed to the
//! collector, which turns them into [`Sample`]s on every scrape.
//!
//! # Metrics
//!
//! - `kafka_connect_connector_state{connector,state,worker_id}` - 1 for the
//!   observed connector state
//! - `kafka_connect_connector_task_state{connector,state,worker_id,task_id}` -
//!   1 for the observed state of each task
//! - `kafka_connect_up` - whether the last scrape of Kafka Connect succeeded

use std::sync::Arc;

/// Namespace prefixed to every exported metric
pub const NAMESPACE: &str = "kafka_connect";

/// Prometheus metric type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Gauge metric - a value that can go up and down
    Gauge,
}

impl MetricType {
    /// Returns the Prometheus type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
        }
    }
}

/// Join namespace, subsystem and name with `_`, skipping empty parts
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// Immutable description of a metric: name, help, type and label names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    pub fq_name: String,
    pub help: String,
    pub metric_type: MetricType,
    pub label_names: Vec<&'static str>,
}

impl MetricDesc {
    /// Create a new descriptor
    pub fn new(
        fq_name: impl Into<String>,
        help: impl Into<String>,
        metric_type: MetricType,
        label_names: &[&'static str],
    ) -> Self {
        Self {
            fq_name: fq_name.into(),
            help: help.into(),
            metric_type,
            label_names: label_names.to_vec(),
        }
    }
}

/// One observed value of a metric
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub desc: Arc<MetricDesc>,
    /// Label values, positionally matching `desc.label_names`
    pub label_values: Vec<String>,
    pub value: f64,
}

impl Sample {
    /// Create a sample. Label values must line up with the descriptor's labels.
    pub fn new(desc: &Arc<MetricDesc>, value: f64, label_values: Vec<String>) -> Self {
        debug_assert_eq!(
            desc.label_names.len(),
            label_values.len(),
            "label cardinality mismatch for {}",
            desc.fq_name
        );
        Self {
            desc: Arc::clone(desc),
            label_values,
            value,
        }
    }

    /// Metric name of this sample
    pub fn name(&self) -> &str {
        &self.desc.fq_name
    }

    /// Look up a label value by label name
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .label_names
            .iter()
            .position(|n| *n == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }

    /// (name, value) label pairs in descriptor order
    pub fn labels(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.desc
            .label_names
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }
}

/// The fixed set of descriptors the collector emits
#[derive(Debug, Clone)]
pub struct Descriptors {
    pub connector_state: Arc<MetricDesc>,
    pub task_state: Arc<MetricDesc>,
    pub up: Arc<MetricDesc>,
}

impl Descriptors {
    /// Build the descriptors under `namespace`
    pub fn new(namespace: &str) -> Self {
        Self {
            connector_state: Arc::new(MetricDesc::new(
                build_fq_name(namespace, "connector", "state"),
                "Is the connector up?",
                MetricType::Gauge,
                &["connector", "state", "worker_id"],
            )),
            task_state: Arc::new(MetricDesc::new(
                build_fq_name(namespace, "connector_task", "state"),
                "Are the tasks for the connector up?",
                MetricType::Gauge,
                &["connector", "state", "worker_id", "task_id"],
            )),
            up: Arc::new(MetricDesc::new(
                build_fq_name(namespace, "", "up"),
                "Was the last scrape of kafka connect successful?",
                MetricType::Gauge,
                &[],
            )),
        }
    }
}

impl Default for Descriptors {
    fn default() -> Self {
        Self::new(NAMESPACE)
    }
}
