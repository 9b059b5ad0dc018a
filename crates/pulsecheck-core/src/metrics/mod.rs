//! In-process metrics registry.
//!
//! A `Registry` owns every instrument registered for the process lifetime and
//! renders the full Prometheus text snapshot on demand. It is constructed
//! explicitly at startup and shared by reference; there is no implicit global.

pub mod instruments;

use std::sync::{Arc, RwLock};

use crate::error::{PulseCheckError, Result};

pub use instruments::{CounterVec, GaugeVec, HistogramVec, DEFAULT_DURATION_BUCKETS};

/// Content type identifying the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

enum Instrument {
    Counter(Arc<CounterVec>),
    Gauge(Arc<GaugeVec>),
    Histogram(Arc<HistogramVec>),
}

impl Instrument {
    fn name(&self) -> &str {
        match self {
            Instrument::Counter(c) => &c.name,
            Instrument::Gauge(g) => &g.name,
            Instrument::Histogram(h) => &h.name,
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            Instrument::Counter(c) => c.render(out),
            Instrument::Gauge(g) => g.render(out),
            Instrument::Histogram(h) => h.render(out),
        }
    }
}

/// Process-wide instrument collection. Registration happens once at startup;
/// rendering walks instruments in registration order.
#[derive(Default)]
pub struct Registry {
    instruments: RwLock<Vec<Instrument>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a counter. Fails if `name` is already taken.
    pub fn register_counter(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> Result<Arc<CounterVec>> {
        let counter = Arc::new(CounterVec::new(name, help, label_names));
        self.register(name, Instrument::Counter(Arc::clone(&counter)))?;
        Ok(counter)
    }

    /// Register a gauge. Fails if `name` is already taken.
    pub fn register_gauge(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> Result<Arc<GaugeVec>> {
        let gauge = Arc::new(GaugeVec::new(name, help, label_names));
        self.register(name, Instrument::Gauge(Arc::clone(&gauge)))?;
        Ok(gauge)
    }

    /// Register a histogram with fixed ascending bucket bounds (seconds).
    /// Fails if `name` is already taken or the bounds are invalid.
    pub fn register_histogram(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
        bounds: &[f64],
    ) -> Result<Arc<HistogramVec>> {
        if bounds.is_empty() {
            return Err(PulseCheckError::InvalidMetric(format!(
                "{name}: histogram needs at least one bucket bound"
            )));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PulseCheckError::InvalidMetric(format!(
                "{name}: bucket bounds must be strictly ascending"
            )));
        }
        let hist = Arc::new(HistogramVec::new(name, help, label_names, bounds));
        self.register(name, Instrument::Histogram(Arc::clone(&hist)))?;
        Ok(hist)
    }

    fn register(&self, name: &str, instrument: Instrument) -> Result<()> {
        if name.is_empty() {
            return Err(PulseCheckError::InvalidMetric("empty metric name".into()));
        }
        let mut instruments = self
            .instruments
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if instruments.iter().any(|i| i.name() == name) {
            return Err(PulseCheckError::DuplicateMetric(name.to_string()));
        }
        instruments.push(instrument);
        Ok(())
    }

    /// Render every registered instrument in the text exposition format.
    pub fn render(&self) -> String {
        let instruments = self
            .instruments
            .read()
            .unwrap_or_else(|e| e.into_inner());
        let mut out = String::new();
        for i in instruments.iter() {
            i.render(&mut out);
        }
        out
    }
}
