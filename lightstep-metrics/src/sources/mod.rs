//! Introspection of the host and the runtime.
//!
//! A [`SampleSource`] hands out one [`ResourceSnapshot`] per call so that a
//! tick touches every operating system facility exactly once.  Which
//! sources exist at all is decided once at start-up by
//! [`Capabilities::detect`].

mod gc;
mod host;

use std::fmt;
use std::sync::Arc;

pub use self::gc::{GcCounters, GcCounts, GcStatsSource, GC_GENERATIONS};
pub use self::host::HostSource;

use crate::error::SourceError;

/// CPU times of the current process, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProcessTimes {
    /// Time spent in user mode.
    pub user: f64,
    /// Time spent in kernel mode.
    pub system: f64,
}

/// Host wide cumulative CPU times, in seconds.
///
/// Only `user`, `system` and `idle` are universal.  The remaining fields are
/// `None` where the platform does not account for them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct CpuTimes {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub nice: Option<f64>,
    pub iowait: Option<f64>,
    pub irq: Option<f64>,
    pub softirq: Option<f64>,
    pub steal: Option<f64>,
}

impl CpuTimes {
    /// Time the CPUs spent doing work.
    ///
    /// This is the sum of every load contributing field the platform
    /// exposes; missing fields are left out.
    pub fn usage(&self) -> f64 {
        [self.nice, self.iowait, self.irq, self.softirq, self.steal]
            .iter()
            .flatten()
            .fold(self.user + self.system, |acc, v| acc + v)
    }

    /// Busy plus idle time.
    pub fn total(&self) -> f64 {
        self.usage() + self.idle
    }
}

/// System memory, in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryStats {
    /// Memory that can be handed to new allocations without swapping.
    pub available: u64,
    /// Memory in use.
    pub used: u64,
}

/// Cumulative network traffic over all interfaces, in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetworkCounters {
    /// Total bytes received.
    pub bytes_recv: u64,
    /// Total bytes sent.
    pub bytes_sent: u64,
}

/// Everything the resource collector needs for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResourceSnapshot {
    /// CPU times of this process.
    pub process: ProcessTimes,
    /// Resident set size of the current process, in bytes.
    pub rss: u64,
    /// Host wide CPU times.  Zeroed by sources that do not
    /// [provide](SampleSource::provides_system_cpu) them.
    pub cpu: CpuTimes,
    /// Host memory.
    pub memory: MemoryStats,
    /// Host network traffic.
    pub network: NetworkCounters,
}

/// A provider of host resource readings.
pub trait SampleSource: Send + 'static {
    /// Takes one batched reading of all resource counters.
    fn snapshot(&mut self) -> Result<ResourceSnapshot, SourceError>;

    /// Whether snapshots carry host wide CPU times.
    ///
    /// This is fixed for the lifetime of the source.
    fn provides_system_cpu(&self) -> bool {
        true
    }
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn snapshot(&mut self) -> Result<ResourceSnapshot, SourceError> {
        (**self).snapshot()
    }

    fn provides_system_cpu(&self) -> bool {
        (**self).provides_system_cpu()
    }
}

/// The outcome of start-up feature detection.
///
/// Collectors are only constructed for facilities that are flagged as
/// present here.
#[derive(Clone)]
pub struct Capabilities {
    /// Whether host resource introspection works.
    pub host_resources: bool,
    /// The runtime's collection statistics, if the host provides them.
    pub gc_runtime: Option<Arc<dyn GcStatsSource>>,
}

impl Capabilities {
    /// Probes the host.
    ///
    /// This takes one trial reading through [`HostSource`] and never fails;
    /// an unusable facility is simply reported as absent.
    pub fn detect(gc_source: Option<Arc<dyn GcStatsSource>>) -> Capabilities {
        let mut host = HostSource::new();
        let host_resources = match host.snapshot() {
            Ok(_) => {
                if !host.provides_system_cpu() {
                    log::info!("system cpu metrics are not available on this host");
                }
                true
            }
            Err(err) => {
                log::info!("host resource metrics disabled: {}", err);
                false
            }
        };
        let gc_runtime = gc_source.filter(|source| match source.collections() {
            Ok(_) => true,
            Err(err) => {
                log::info!("gc metrics disabled: {}", err);
                false
            }
        });
        Capabilities {
            host_resources,
            gc_runtime,
        }
    }

    /// A descriptor with nothing available.
    pub fn none() -> Capabilities {
        Capabilities {
            host_resources: false,
            gc_runtime: None,
        }
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("host_resources", &self.host_resources)
            .field("gc_runtime", &self.gc_runtime.is_some())
            .finish()
    }
}
