//! Counter/gauge/histogram instruments with dynamic label values.
//!
//! Cells are stored in `DashMap`s of atomics keyed by the label-value tuple,
//! so concurrent observations from request completion callbacks never take a
//! lock on the hot path and never lose updates. Label names are fixed at
//! registration; the value tuple selects the time series.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Escape a label value per the text exposition format.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Render `{name="value",...}`, or nothing for an empty label set.
fn fmt_labels(names: &[String], values: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    let pairs = names
        .iter()
        .zip(values.iter())
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{pairs}}}")
}

fn key_of(label_values: &[&str]) -> Vec<String> {
    label_values.iter().map(|s| s.to_string()).collect()
}

/// Monotonically increasing counter with a fixed label-name set.
#[derive(Debug)]
pub struct CounterVec {
    pub(crate) name: String,
    pub(crate) help: String,
    label_names: Vec<String>,
    map: DashMap<Vec<String>, AtomicU64>,
}

impl CounterVec {
    pub(crate) fn new(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            map: DashMap::new(),
        }
    }

    /// Increment by 1.
    pub fn inc(&self, label_values: &[&str]) {
        self.add(label_values, 1);
    }

    /// Increment by an arbitrary value. `label_values` must match the
    /// registered label names positionally.
    pub fn add(&self, label_values: &[&str], v: u64) {
        debug_assert_eq!(label_values.len(), self.label_names.len());
        let cell = self
            .map
            .entry(key_of(label_values))
            .or_insert_with(|| AtomicU64::new(0));
        cell.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label tuple (0 if never incremented).
    pub fn value(&self, label_values: &[&str]) -> u64 {
        self.map
            .get(&key_of(label_values))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub(crate) fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} counter", self.name);
        for r in self.map.iter() {
            let labels = fmt_labels(&self.label_names, r.key());
            let _ = writeln!(out, "{}{} {}", self.name, labels, r.value().load(Ordering::Relaxed));
        }
    }
}

/// Signed gauge with a fixed label-name set.
#[derive(Debug)]
pub struct GaugeVec {
    pub(crate) name: String,
    pub(crate) help: String,
    label_names: Vec<String>,
    map: DashMap<Vec<String>, AtomicI64>,
}

impl GaugeVec {
    pub(crate) fn new(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            map: DashMap::new(),
        }
    }

    /// Increment by 1.
    pub fn inc(&self, label_values: &[&str]) {
        self.add(label_values, 1);
    }

    /// Decrement by 1.
    pub fn dec(&self, label_values: &[&str]) {
        self.add(label_values, -1);
    }

    /// Add an arbitrary signed delta.
    pub fn add(&self, label_values: &[&str], v: i64) {
        debug_assert_eq!(label_values.len(), self.label_names.len());
        let cell = self
            .map
            .entry(key_of(label_values))
            .or_insert_with(|| AtomicI64::new(0));
        cell.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label tuple (0 if never touched).
    pub fn value(&self, label_values: &[&str]) -> i64 {
        self.map
            .get(&key_of(label_values))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub(crate) fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} gauge", self.name);
        for r in self.map.iter() {
            let labels = fmt_labels(&self.label_names, r.key());
            let _ = writeln!(out, "{}{} {}", self.name, labels, r.value().load(Ordering::Relaxed));
        }
    }
}

/// Default duration buckets in seconds (5ms .. 10s).
pub const DEFAULT_DURATION_BUCKETS: [f64; 11] =
    [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

struct HistogramCell {
    count: AtomicU64,
    // Sum is accumulated as integer microseconds so the hot path stays on
    // plain atomics; rendered as seconds.
    sum_micros: AtomicU64,
    buckets: Vec<AtomicU64>,
}

impl HistogramCell {
    fn new(n: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            buckets: (0..n).map(|_| AtomicU64::new(0)).collect(),
        }
    }
}

/// Cumulative histogram with fixed ascending bucket bounds (seconds).
pub struct HistogramVec {
    pub(crate) name: String,
    pub(crate) help: String,
    label_names: Vec<String>,
    bounds: Vec<f64>,
    map: DashMap<Vec<String>, HistogramCell>,
}

impl HistogramVec {
    pub(crate) fn new(name: &str, help: &str, label_names: &[&str], bounds: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            bounds: bounds.to_vec(),
            map: DashMap::new(),
        }
    }

    /// Observe one duration: bump `_count`, `_sum`, and every cumulative
    /// bucket whose bound is >= the observed value.
    pub fn observe(&self, label_values: &[&str], duration: Duration) {
        debug_assert_eq!(label_values.len(), self.label_names.len());
        let cell = self
            .map
            .entry(key_of(label_values))
            .or_insert_with(|| HistogramCell::new(self.bounds.len()));

        let secs = duration.as_secs_f64();
        cell.count.fetch_add(1, Ordering::Relaxed);
        cell.sum_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        for (i, &b) in self.bounds.iter().enumerate() {
            if secs <= b {
                cell.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Observation count for a label tuple.
    pub fn count(&self, label_values: &[&str]) -> u64 {
        self.map
            .get(&key_of(label_values))
            .map(|c| c.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Cumulative count for the bucket at `idx`; out-of-range indexes read as 0.
    pub fn bucket_count(&self, label_values: &[&str], idx: usize) -> u64 {
        self.map
            .get(&key_of(label_values))
            .and_then(|c| c.buckets.get(idx).map(|b| b.load(Ordering::Relaxed)))
            .unwrap_or(0)
    }

    pub(crate) fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} histogram", self.name);
        for r in self.map.iter() {
            let cell = r.value();
            let labels = fmt_labels(&self.label_names, r.key());
            // Bucket lines carry the series labels plus `le`.
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                let mut s = labels[..labels.len() - 1].to_string();
                s.push(',');
                s
            };
            let open = if prefix.is_empty() { "{" } else { prefix.as_str() };
            for (i, &le) in self.bounds.iter().enumerate() {
                let n = cell.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{}le=\"{}\"}} {}", self.name, open, le, n);
            }
            let count = cell.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{}le=\"+Inf\"}} {}", self.name, open, count);

            let sum = cell.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0;
            let _ = writeln!(out, "{}_sum{} {}", self.name, labels, sum);
            let _ = writeln!(out, "{}_count{} {}", self.name, labels, count);
        }
    }
}
