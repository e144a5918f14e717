//! Process and host resource collector.

use super::Baseline;
use crate::catalog::*;
use crate::collector::MetricCollector;
use crate::error::SourceError;
use crate::sources::{HostSource, SampleSource};
use crate::MetricSample;

/// Collects process and host resource usage.
///
/// Metrics collected:
/// - `process.cpu.system`, `process.cpu.user` - CPU seconds of this process (counter)
/// - `process.mem.rss` - resident set size in bytes (gauge)
/// - `cpu.system`, `cpu.user`, `cpu.idle`, `cpu.nice`, `cpu.total`, `cpu.usage` -
///   host CPU seconds (counter)
/// - `mem.available`, `mem.used` - host memory in bytes (gauge)
/// - `net.recv`, `net.sent` - host network bytes (counter)
///
/// The `cpu.*` metrics are left out entirely if the source does not provide
/// host wide CPU times.
///
/// The very first collection only establishes the baseline; its deltas
/// cover the whole process lifetime and are thrown away.
pub struct ResourceCollector<S = HostSource> {
    source: S,
    baseline: Baseline,
    warmed_up: bool,
    system_cpu: bool,
}

impl ResourceCollector<HostSource> {
    /// Creates a collector reading from the operating system.
    pub fn new() -> Self {
        Self::with_source(HostSource::new())
    }
}

impl Default for ResourceCollector<HostSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SampleSource> ResourceCollector<S> {
    /// Creates a collector reading from `source`.
    pub fn with_source(source: S) -> Self {
        let system_cpu = source.provides_system_cpu();
        ResourceCollector {
            source,
            baseline: Baseline::new(),
            warmed_up: false,
            system_cpu,
        }
    }

    /// Takes one reading and turns it into samples, advancing the baseline.
    pub(crate) fn measure(&mut self) -> Result<Vec<MetricSample>, SourceError> {
        let snapshot = self.source.snapshot()?;
        let cpu = &snapshot.cpu;

        let mut totals = vec![
            (PROCESS_CPU_TIME_SYS, snapshot.process.system),
            (PROCESS_CPU_TIME_USER, snapshot.process.user),
            (SYSTEM_NET_RECV, snapshot.network.bytes_recv as f64),
            (SYSTEM_NET_SENT, snapshot.network.bytes_sent as f64),
        ];
        if self.system_cpu {
            totals.extend([
                (SYSTEM_CPU_TIME_SYS, cpu.system),
                (SYSTEM_CPU_TIME_USER, cpu.user),
                (SYSTEM_CPU_TIME_IDLE, cpu.idle),
                (SYSTEM_CPU_TIME_NICE, cpu.nice.unwrap_or(0.0)),
                (SYSTEM_CPU_TIME_TOTAL, cpu.total()),
                (SYSTEM_CPU_TIME_USAGE, cpu.usage()),
            ]);
        }
        let deltas = self.baseline.advance(totals);
        let delta = |name: &'static str| MetricSample::counter(name, deltas[name]);

        let mut samples = vec![
            delta(PROCESS_CPU_TIME_SYS),
            delta(PROCESS_CPU_TIME_USER),
            MetricSample::gauge(PROCESS_MEM_RSS, snapshot.rss as f64),
        ];
        if self.system_cpu {
            samples.extend([
                delta(SYSTEM_CPU_TIME_SYS),
                delta(SYSTEM_CPU_TIME_USER),
                delta(SYSTEM_CPU_TIME_IDLE),
                delta(SYSTEM_CPU_TIME_NICE),
                delta(SYSTEM_CPU_TIME_TOTAL),
                delta(SYSTEM_CPU_TIME_USAGE),
            ]);
        }
        samples.extend([
            MetricSample::gauge(SYSTEM_MEM_AVAIL, snapshot.memory.available as f64),
            MetricSample::gauge(SYSTEM_MEM_USED, snapshot.memory.used as f64),
            delta(SYSTEM_NET_RECV),
            delta(SYSTEM_NET_SENT),
        ]);
        Ok(samples)
    }

    /// Returns true once the baseline has been established.
    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }
}

impl<S: SampleSource> MetricCollector for ResourceCollector<S> {
    fn name(&self) -> &'static str {
        "resource"
    }

    fn metric_names(&self) -> &'static [&'static str] {
        if self.system_cpu {
            RESOURCE_METRICS
        } else {
            PROCESS_AND_HOST_METRICS
        }
    }

    fn collect(&mut self) -> Vec<MetricSample> {
        if !self.warmed_up {
            match self.measure() {
                Ok(_) => {
                    log::debug!("resource collector: discarded first sample");
                    self.warmed_up = true;
                }
                Err(err) => {
                    log::warn!("resource collector: skipping tick: {}", err);
                    self.baseline.hold();
                    return Vec::new();
                }
            }
        }
        match self.measure() {
            Ok(samples) => samples,
            Err(err) => {
                log::warn!("resource collector: skipping tick: {}", err);
                self.baseline.hold();
                Vec::new()
            }
        }
    }

    fn rollback(&mut self) {
        self.baseline.rollback();
    }
}
