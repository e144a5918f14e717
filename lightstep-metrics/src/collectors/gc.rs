//! Garbage collection count collector.

use std::sync::Arc;

use super::Baseline;
use crate::catalog::{GC_COUNT_GEN0, GC_COUNT_GEN1, GC_COUNT_GEN2, GC_METRICS};
use crate::collector::MetricCollector;
use crate::sources::GcStatsSource;
use crate::MetricSample;

const GENERATION_NAMES: [&str; 3] = [GC_COUNT_GEN0, GC_COUNT_GEN1, GC_COUNT_GEN2];

/// Reports how many collections each generation ran during the tick.
pub struct GcCollector {
    source: Arc<dyn GcStatsSource>,
    baseline: Baseline,
    warmed_up: bool,
}

impl GcCollector {
    /// Creates a collector for the given runtime statistics.
    pub fn new(source: Arc<dyn GcStatsSource>) -> Self {
        GcCollector {
            source,
            baseline: Baseline::new(),
            warmed_up: false,
        }
    }

    fn measure(&mut self) -> Option<Vec<MetricSample>> {
        let counts = match self.source.collections() {
            Ok(counts) => counts,
            Err(err) => {
                log::warn!("gc collector: skipping tick: {}", err);
                self.baseline.hold();
                return None;
            }
        };
        let deltas = self.baseline.advance(
            GENERATION_NAMES
                .iter()
                .zip(counts.iter())
                .map(|(&name, &count)| (name, count as f64)),
        );
        Some(
            GENERATION_NAMES
                .iter()
                .map(|&name| MetricSample::counter(name, deltas[name]))
                .collect(),
        )
    }
}

impl MetricCollector for GcCollector {
    fn name(&self) -> &'static str {
        "gc"
    }

    fn metric_names(&self) -> &'static [&'static str] {
        GC_METRICS
    }

    fn collect(&mut self) -> Vec<MetricSample> {
        if !self.warmed_up {
            if self.measure().is_none() {
                return Vec::new();
            }
            self.warmed_up = true;
        }
        self.measure().unwrap_or_default()
    }

    fn rollback(&mut self) {
        self.baseline.rollback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::GcCounters;

    #[test]
    fn test_reports_collections_since_last_tick() {
        let counters = Arc::new(GcCounters::new());
        for _ in 0..50 {
            counters.record_collection(0);
        }
        let mut collector = GcCollector::new(counters.clone());

        let samples = collector.collect();
        assert!(samples.iter().all(|s| s.value == 0.0));

        counters.record_collection(0);
        counters.record_collection(0);
        counters.record_collection(1);
        let samples = collector.collect();
        assert_eq!(samples[0], MetricSample::counter(GC_COUNT_GEN0, 2.0));
        assert_eq!(samples[1], MetricSample::counter(GC_COUNT_GEN1, 1.0));
        assert_eq!(samples[2], MetricSample::counter(GC_COUNT_GEN2, 0.0));
    }

    #[test]
    fn test_rollback_widens_next_delta() {
        let counters = Arc::new(GcCounters::new());
        let mut collector = GcCollector::new(counters.clone());
        collector.collect();

        counters.record_collection(2);
        collector.collect();
        collector.rollback();

        counters.record_collection(2);
        let samples = collector.collect();
        assert_eq!(samples[2].value, 2.0);
    }
}
