//! The closed set of metric names this crate reports.

/// System CPU time spent by this process.
pub const PROCESS_CPU_TIME_SYS: &str = "process.cpu.system";
/// User CPU time spent by this process.
pub const PROCESS_CPU_TIME_USER: &str = "process.cpu.user";
/// Resident set size of this process.
pub const PROCESS_MEM_RSS: &str = "process.mem.rss";
/// Host wide CPU time in kernel mode.
pub const SYSTEM_CPU_TIME_SYS: &str = "cpu.system";
/// Host wide CPU time in user mode.
pub const SYSTEM_CPU_TIME_USER: &str = "cpu.user";
/// Host wide idle CPU time.
pub const SYSTEM_CPU_TIME_IDLE: &str = "cpu.idle";
/// Host wide CPU time of niced processes.
pub const SYSTEM_CPU_TIME_NICE: &str = "cpu.nice";
/// Host wide busy plus idle CPU time.
pub const SYSTEM_CPU_TIME_TOTAL: &str = "cpu.total";
/// Host wide busy CPU time.
pub const SYSTEM_CPU_TIME_USAGE: &str = "cpu.usage";
/// Memory available to new processes.
pub const SYSTEM_MEM_AVAIL: &str = "mem.available";
/// Memory in use.
pub const SYSTEM_MEM_USED: &str = "mem.used";
/// Bytes received on all interfaces.
pub const SYSTEM_NET_RECV: &str = "net.recv";
/// Bytes sent on all interfaces.
pub const SYSTEM_NET_SENT: &str = "net.sent";

/// Collections of the youngest generation.
pub const GC_COUNT_GEN0: &str = "runtime.gc.count.gen0";
/// Collections of the middle generation.
pub const GC_COUNT_GEN1: &str = "runtime.gc.count.gen1";
/// Collections of the oldest generation.
pub const GC_COUNT_GEN2: &str = "runtime.gc.count.gen2";

/// Names produced by the host resource collector.
pub const RESOURCE_METRICS: &[&str] = &[
    PROCESS_CPU_TIME_SYS,
    PROCESS_CPU_TIME_USER,
    PROCESS_MEM_RSS,
    SYSTEM_CPU_TIME_SYS,
    SYSTEM_CPU_TIME_USER,
    SYSTEM_CPU_TIME_IDLE,
    SYSTEM_CPU_TIME_NICE,
    SYSTEM_CPU_TIME_TOTAL,
    SYSTEM_CPU_TIME_USAGE,
    SYSTEM_MEM_AVAIL,
    SYSTEM_MEM_USED,
    SYSTEM_NET_RECV,
    SYSTEM_NET_SENT,
];

/// Names produced by the garbage collection count collector.
pub const GC_METRICS: &[&str] = &[GC_COUNT_GEN0, GC_COUNT_GEN1, GC_COUNT_GEN2];

/// Names produced by the host resource collector when the host does not
/// expose system wide CPU times.
pub const PROCESS_AND_HOST_METRICS: &[&str] = &[
    PROCESS_CPU_TIME_SYS,
    PROCESS_CPU_TIME_USER,
    PROCESS_MEM_RSS,
    SYSTEM_MEM_AVAIL,
    SYSTEM_MEM_USED,
    SYSTEM_NET_RECV,
    SYSTEM_NET_SENT,
];

/// Every name in the catalog.
pub fn all_metrics() -> impl Iterator<Item = &'static str> {
    GC_METRICS.iter().chain(RESOURCE_METRICS.iter()).copied()
}

/// Returns true if `name` is part of the catalog.
pub fn is_cataloged(name: &str) -> bool {
    all_metrics().any(|known| known == name)
}
