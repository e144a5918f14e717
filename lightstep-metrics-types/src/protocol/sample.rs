use super::wire::MetricKind;

/// One catalog metric measured during a tick.
///
/// Counter values are deltas since the previous successful tick, gauge
/// values are instantaneous readings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricSample {
    /// Name from the closed metrics catalog.
    pub name: &'static str,
    /// The measured value.
    pub value: f64,
    /// Counter or gauge.
    pub kind: MetricKind,
}

impl MetricSample {
    /// Creates a counter sample.
    pub fn counter(name: &'static str, value: impl Into<f64>) -> Self {
        MetricSample {
            name,
            value: value.into(),
            kind: MetricKind::Counter,
        }
    }

    /// Creates a gauge sample.
    pub fn gauge(name: &'static str, value: impl Into<f64>) -> Self {
        MetricSample {
            name,
            value: value.into(),
            kind: MetricKind::Gauge,
        }
    }
}
