//! The union of all active collectors.

use std::collections::BTreeSet;
use std::fmt;

use crate::catalog;
use crate::collector::MetricCollector;
use crate::collectors::{GcCollector, ResourceCollector};
use crate::sources::Capabilities;
use crate::MetricSample;

/// All active collectors, presented as one flat sequence per tick.
///
/// The enabled catalog is fixed at construction.  Samples outside of it are
/// dropped, and every enabled name is emitted at most once per tick.
pub struct RuntimeMetrics {
    collectors: Vec<Box<dyn MetricCollector>>,
    enabled: BTreeSet<&'static str>,
}

impl RuntimeMetrics {
    /// Creates an aggregate over the given collectors.
    ///
    /// The enabled set is the catalog names the collectors declare.
    pub fn new(collectors: Vec<Box<dyn MetricCollector>>) -> Self {
        let enabled = collectors
            .iter()
            .flat_map(|collector| collector.metric_names().iter().copied())
            .filter(|name| catalog::is_cataloged(name))
            .collect();
        RuntimeMetrics {
            collectors,
            enabled,
        }
    }

    /// Builds the collectors that the detected capabilities allow.
    pub fn from_capabilities(capabilities: &Capabilities) -> Self {
        let mut collectors: Vec<Box<dyn MetricCollector>> = Vec::new();

        if let Some(source) = &capabilities.gc_runtime {
            collectors.push(Box::new(GcCollector::new(source.clone())));
        }

        if capabilities.host_resources {
            collectors.push(Box::new(ResourceCollector::new()));
        }

        Self::new(collectors)
    }

    /// The names this aggregate may emit.
    pub fn enabled(&self) -> &BTreeSet<&'static str> {
        &self.enabled
    }

    /// Names of the active collectors.
    pub fn collector_names(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Collects one tick from every collector.
    pub fn collect(&mut self) -> Vec<MetricSample> {
        let mut seen = BTreeSet::new();
        let mut samples = Vec::new();
        for collector in &mut self.collectors {
            for sample in collector.collect() {
                if !self.enabled.contains(sample.name) {
                    continue;
                }
                if !seen.insert(sample.name) {
                    log::debug!(
                        "{} collector emitted {} twice, dropping",
                        collector.name(),
                        sample.name
                    );
                    continue;
                }
                samples.push(sample);
            }
        }
        samples
    }

    /// Rolls every collector back to its previous baseline.
    pub fn rollback(&mut self) {
        for collector in &mut self.collectors {
            collector.rollback();
        }
    }

    /// Returns true if no collector is active.
    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }
}

impl IntoIterator for &mut RuntimeMetrics {
    type Item = MetricSample;
    type IntoIter = std::vec::IntoIter<MetricSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.collect().into_iter()
    }
}

impl fmt::Debug for RuntimeMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeMetrics")
            .field("collectors", &self.collector_names())
            .field("enabled", &self.enabled.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sources::{GcCounters, ResourceSnapshot};
    use crate::test::StaticSource;

    struct Noisy;

    impl MetricCollector for Noisy {
        fn name(&self) -> &'static str {
            "noisy"
        }

        fn metric_names(&self) -> &'static [&'static str] {
            &["not.in.catalog", catalog::SYSTEM_MEM_USED]
        }

        fn collect(&mut self) -> Vec<MetricSample> {
            vec![
                MetricSample::gauge("not.in.catalog", 1.0),
                MetricSample::gauge(catalog::SYSTEM_MEM_USED, 1.0),
                MetricSample::gauge(catalog::SYSTEM_MEM_USED, 2.0),
            ]
        }
    }

    fn healthy() -> RuntimeMetrics {
        RuntimeMetrics::new(vec![
            Box::new(GcCollector::new(Arc::new(GcCounters::new()))),
            Box::new(ResourceCollector::with_source(StaticSource::new(
                ResourceSnapshot::default(),
            ))),
        ])
    }

    #[test]
    fn test_all_metrics() {
        let mut metrics = healthy();
        let expected: BTreeSet<_> = catalog::GC_METRICS
            .iter()
            .chain(catalog::RESOURCE_METRICS)
            .copied()
            .collect();
        assert_eq!(metrics.enabled(), &expected);

        for _ in 0..3 {
            let names: Vec<_> = (&mut metrics).into_iter().map(|s| s.name).collect();
            let unique: BTreeSet<_> = names.iter().copied().collect();
            assert_eq!(names.len(), unique.len());
            assert_eq!(unique, expected);
        }
    }

    #[test]
    fn test_enabled_matches_active_collectors() {
        let mut metrics = RuntimeMetrics::new(vec![Box::new(ResourceCollector::with_source(
            StaticSource::new(ResourceSnapshot::default()),
        ))]);
        let expected: BTreeSet<_> = catalog::RESOURCE_METRICS.iter().copied().collect();
        assert_eq!(metrics.enabled(), &expected);
        assert!(catalog::GC_METRICS
            .iter()
            .all(|name| !metrics.enabled().contains(name)));

        let emitted: BTreeSet<_> = metrics.collect().iter().map(|s| s.name).collect();
        assert_eq!(&emitted, metrics.enabled());
    }

    #[test]
    fn test_empty_aggregate_enables_nothing() {
        let metrics = RuntimeMetrics::new(vec![]);
        assert!(metrics.enabled().is_empty());
    }

    #[test]
    fn test_filters_unknown_and_duplicate_names() {
        let mut metrics = RuntimeMetrics::new(vec![Box::new(Noisy)]);
        let samples = metrics.collect();
        assert_eq!(samples, vec![MetricSample::gauge(catalog::SYSTEM_MEM_USED, 1.0)]);
    }

    #[test]
    fn test_from_capabilities() {
        let metrics = RuntimeMetrics::from_capabilities(&Capabilities::none());
        assert!(metrics.is_empty());

        let caps = Capabilities {
            host_resources: false,
            gc_runtime: Some(Arc::new(GcCounters::new())),
        };
        let metrics = RuntimeMetrics::from_capabilities(&caps);
        assert_eq!(metrics.collector_names(), vec!["gc"]);
        let expected: BTreeSet<_> = catalog::GC_METRICS.iter().copied().collect();
        assert_eq!(metrics.enabled(), &expected);
    }
}
