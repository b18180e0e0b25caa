//! Prometheus Exposition Format output
//!
//! Renders [`Sample`]s into the text exposition format (version 0.0.4).
//!
//! ```text
//! # HELP <metric_name> <help_text>
//! # TYPE <metric_name> <type>
//! <metric_name>{<label1>="<value1>",<label2>="<value2>"} <value>
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use crate::metrics::Sample;

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Prometheus exposition format formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusFormatter;

impl PrometheusFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self
    }

    /// Format samples into Prometheus exposition format
    ///
    /// - HELP and TYPE lines are emitted once per metric name
    /// - Samples of the same metric are grouped, in order of first occurrence
    /// - Labels keep the order of the metric's descriptor
    pub fn format(&self, samples: &[Sample]) -> String {
        let mut output = String::with_capacity(samples.len() * 96);

        for group in Self::group_by_name(samples) {
            let desc = &group[0].desc;
            let _ = writeln!(
                output,
                "# HELP {} {}",
                desc.fq_name,
                Self::escape_help(&desc.help)
            );
            let _ = writeln!(output, "# TYPE {} {}", desc.fq_name, desc.metric_type.as_str());

            for sample in group {
                Self::write_sample_line(&mut output, sample);
            }
        }

        output
    }

    /// Group samples by metric name, preserving order of first occurrence
    fn group_by_name(samples: &[Sample]) -> Vec<Vec<&Sample>> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<Vec<&Sample>> = Vec::new();

        for sample in samples {
            match index.get(sample.name()) {
                Some(&i) => groups[i].push(sample),
                None => {
                    index.insert(sample.name(), groups.len());
                    groups.push(vec![sample]);
                }
            }
        }

        groups
    }

    fn write_sample_line(output: &mut String, sample: &Sample) {
        output.push_str(sample.name());

        if !sample.label_values.is_empty() {
            output.push('{');
            for (i, (name, value)) in sample.labels().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                let _ = write!(output, "{}=\"{}\"", name, Self::escape_label_value(value));
            }
            output.push('}');
        }

        output.push(' ');
        output.push_str(&Self::format_value(sample.value));
        output.push('\n');
    }

    /// Format a numeric value for Prometheus
    ///
    /// - NaN → "NaN"
    /// - ±Inf → "+Inf" / "-Inf"
    /// - Integral values are formatted without decimal point
    pub fn format_value(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                "+Inf".to_string()
            } else {
                "-Inf".to_string()
            }
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{}", value)
        }
    }

    /// Escapes backslash and newline characters.
    fn escape_help(help: &str) -> String {
        help.replace('\\', "\\\\").replace('\n', "\\n")
    }

    /// Escapes backslash, double-quote, and newline characters.
    fn escape_label_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}
