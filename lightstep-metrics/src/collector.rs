//! Metric collector trait.

use crate::MetricSample;

/// A source of catalog metrics for the aggregate.
///
/// Collectors own their baseline state, so two instances never observe each
/// other's totals.
pub trait MetricCollector: Send + 'static {
    /// Name of this collector for debugging and logging.
    fn name(&self) -> &'static str;

    /// The catalog names this collector produces.
    fn metric_names(&self) -> &'static [&'static str];

    /// Collects the samples of one tick.
    ///
    /// A collector that fails to read its source returns no samples for the
    /// tick rather than a partial set.
    fn collect(&mut self) -> Vec<MetricSample>;

    /// Restores the baseline that was in place before the last
    /// [`collect`](Self::collect).
    ///
    /// Only one generation is kept.  Collectors without state can rely on
    /// the default, which does nothing.
    fn rollback(&mut self) {}
}
