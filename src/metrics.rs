//! Metrics for table reads and writes.
//!
//! Attach a [`MetricsCollector`] to a [`TableIo`](crate::TableIo) (or pass one
//! to [`append_all_sequential_with`](crate::append_all_sequential_with)) and
//! every operation updates these built-in metrics:
//!
//! - `records_read`: records stored in a returned table
//! - `records_written`: records whose line reached the destination
//! - `records_failed`: records that failed to process, encode or write
//! - `peak_in_flight`: highest number of record operations admitted at once
//!
//! Custom metrics can be registered through the [`Metric`] trait.
//!
//! ```no_run
//! use csvgate::TableIo;
//! use csvgate::metrics::MetricsCollector;
//!
//! # fn main() -> anyhow::Result<()> {
//! let metrics = MetricsCollector::new();
//! let io = TableIo::new(4)?.with_metrics(metrics.clone());
//! io.write(&[vec!["a".to_string()]], "out.csv")?;
//! metrics.log();
//! metrics.save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use serde_json::{Value, json};
use std::any::Any;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub const RECORDS_READ: &str = "records_read";
pub const RECORDS_WRITTEN: &str = "records_written";
pub const RECORDS_FAILED: &str = "records_failed";
pub const PEAK_IN_FLIGHT: &str = "peak_in_flight";

/// Trait for custom metrics.
pub trait Metric: Send + Sync + Any {
    /// The name of this metric (e.g., `records_written`).
    fn name(&self) -> &str;

    /// The current value of this metric as a JSON value.
    fn value(&self) -> Value;

    /// Optional description of what this metric measures.
    fn description(&self) -> Option<&str> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Thread-safe, cheaply cloneable metrics registry.
///
/// Clones share the same underlying registry.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsCollectorInner>>,
}

#[derive(Default)]
struct MetricsCollectorInner {
    metrics: HashMap<String, Box<dyn Metric>>,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom metric, replacing any metric with the same name.
    pub fn register(&self, metric: Box<dyn Metric>) {
        self.lock().metrics.insert(metric.name().to_string(), metric);
    }

    /// Mark the start of a timed operation.
    pub fn record_start(&self) {
        self.lock().start_time = Some(Instant::now());
    }

    /// Mark the end of a timed operation.
    pub fn record_end(&self) {
        self.lock().end_time = Some(Instant::now());
    }

    /// Time between the last `record_start` and `record_end`, if both ran.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let inner = self.lock();
        match (inner.start_time, inner.end_time) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    /// Increment a counter, creating it at `value` if it does not exist.
    ///
    /// A non-counter metric registered under `name` is replaced.
    pub fn increment_counter(&self, name: &str, value: u64) {
        let mut inner = self.lock();
        if let Some(counter) = inner
            .metrics
            .get_mut(name)
            .and_then(|m| m.as_any_mut().downcast_mut::<CounterMetric>())
        {
            counter.count += value;
            return;
        }
        inner.metrics.insert(
            name.to_string(),
            Box::new(CounterMetric::with_value(name, value)),
        );
    }

    /// Raise a gauge to `value` if it is higher than the current value.
    pub fn gauge_max(&self, name: &str, value: f64) {
        let mut inner = self.lock();
        if let Some(gauge) = inner
            .metrics
            .get_mut(name)
            .and_then(|m| m.as_any_mut().downcast_mut::<GaugeMetric>())
        {
            gauge.value = gauge.value.max(value);
            return;
        }
        inner
            .metrics
            .insert(name.to_string(), Box::new(GaugeMetric::new(name, value)));
    }

    /// Current value of a counter, or 0 if it was never touched.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        self.lock()
            .metrics
            .get(name)
            .and_then(|m| m.as_any().downcast_ref::<CounterMetric>())
            .map_or(0, |c| c.count)
    }

    /// All metrics as a JSON object of `{ name: { value, description? } }`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let inner = self.lock();
        let mut metrics_json = serde_json::Map::new();

        for (name, metric) in &inner.metrics {
            let mut metric_obj = serde_json::Map::new();
            metric_obj.insert("value".to_string(), metric.value());
            if let Some(desc) = metric.description() {
                metric_obj.insert("description".to_string(), json!(desc));
            }
            metrics_json.insert(name.clone(), Value::Object(metric_obj));
        }

        if let (Some(start), Some(end)) = (inner.start_time, inner.end_time) {
            let elapsed_ms = u64::try_from(end.duration_since(start).as_millis()).unwrap_or(u64::MAX);
            metrics_json.insert(
                "execution_time_ms".to_string(),
                json!({ "value": elapsed_ms, "description": "Total execution time in milliseconds" }),
            );
        }
        Value::Object(metrics_json)
    }

    /// Emit every metric as a `tracing` info event, sorted by name.
    pub fn log(&self) {
        let inner = self.lock();
        let mut sorted: Vec<_> = inner.metrics.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);
        for (name, metric) in sorted {
            tracing::info!(metric = %name, value = %metric.value(), "csvgate metric");
        }
        if let (Some(start), Some(end)) = (inner.start_time, inner.end_time) {
            let elapsed_ms = u64::try_from(end.duration_since(start).as_millis()).unwrap_or(u64::MAX);
            tracing::info!(elapsed_ms, "csvgate execution time");
        }
    }

    /// Save all metrics to a pretty-printed JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let formatted = serde_json::to_string_pretty(&self.to_json())?;
        let mut file = File::create(path)?;
        file.write_all(formatted.as_bytes())?;
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.lock()
            .metrics
            .iter()
            .map(|(name, metric)| (name.clone(), metric.value()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MetricsCollectorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A monotonically increasing count.
pub struct CounterMetric {
    name: String,
    count: u64,
}

impl CounterMetric {
    /// A counter starting at zero.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, 0)
    }

    /// A counter starting at `count`.
    #[must_use]
    pub fn with_value(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl Metric for CounterMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.count)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A gauge metric that holds a single numeric value.
pub struct GaugeMetric {
    name: String,
    value: f64,
    description: Option<String>,
}

impl GaugeMetric {
    /// A gauge holding `value`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
        }
    }

    /// Attach a description, exported alongside the value.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Metric for GaugeMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.value)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
