//! Response latency summary shared by every chat session in the process.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Mutex, PoisonError};

/// Metric name of the per-turn latency summary.
pub const RESPONSE_LATENCY: &str = "response_latency_seconds";

/// Label name attached to every observation.
pub const PAGE_LABEL_NAME: &str = "app_main_page";

/// Label value used for completed chat turns.
pub const PAGE_EXECUTION: &str = "page_execution";

/// Count and sum of the observations recorded under one label.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observations {
    pub count: u64,
    pub sum: f64,
}

impl Observations {
    /// Mean latency in seconds, if anything was observed.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// A Prometheus-style summary of latencies in seconds.
///
/// Observations only ever add to a label's count and sum, so concurrent
/// sessions can record through a shared `Arc<LatencySummary>` in any order.
#[derive(Debug, Default)]
pub struct LatencySummary {
    series: Mutex<BTreeMap<String, Observations>>,
}

impl LatencySummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation in seconds.
    pub fn observe(&self, label: &str, seconds: f64) {
        let mut series = self.series.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = series.entry(label.to_string()).or_default();
        entry.count += 1;
        entry.sum += seconds;
    }

    /// Observations recorded under `label` so far.
    pub fn get(&self, label: &str) -> Observations {
        self.series
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(label)
            .copied()
            .unwrap_or_default()
    }

    /// Renders the summary in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let series = self.series.lock().unwrap_or_else(PoisonError::into_inner);

        let mut out = String::new();
        let _ = writeln!(out, "# HELP {RESPONSE_LATENCY} Response latency (seconds)");
        let _ = writeln!(out, "# TYPE {RESPONSE_LATENCY} summary");
        for (label, obs) in series.iter() {
            let label = escape_label(label);
            let _ = writeln!(
                out,
                "{RESPONSE_LATENCY}_count{{{PAGE_LABEL_NAME}=\"{label}\"}} {}",
                obs.count
            );
            let _ = writeln!(
                out,
                "{RESPONSE_LATENCY}_sum{{{PAGE_LABEL_NAME}=\"{label}\"}} {}",
                obs.sum
            );
        }
        out
    }
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
