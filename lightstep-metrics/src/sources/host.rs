use sysinfo::{Networks, Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use super::{CpuTimes, MemoryStats, NetworkCounters, ProcessTimes, ResourceSnapshot, SampleSource};
use crate::error::SourceError;

/// Reads resource usage from the operating system.
///
/// Process CPU times come from `getrusage`, host CPU times from
/// `/proc/stat`, everything else from `sysinfo`.  The `sysinfo` handles are
/// kept between snapshots so that each tick only refreshes what it reads.
///
/// Host CPU times are probed once on creation.  Where they cannot be read
/// the source still reports everything else.
pub struct HostSource {
    system: System,
    networks: Networks,
    pid: Option<Pid>,
    system_cpu: bool,
}

impl HostSource {
    /// Creates a new host source.
    pub fn new() -> HostSource {
        HostSource {
            system: System::new(),
            networks: Networks::new_with_refreshed_list(),
            pid: sysinfo::get_current_pid().ok(),
            system_cpu: system_cpu_times().is_ok(),
        }
    }

    fn rss(&mut self) -> Result<u64, SourceError> {
        let pid = self.pid.ok_or(SourceError::Unavailable("process id"))?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::new().with_memory(),
        );
        self.system
            .process(pid)
            .map(|process| process.memory())
            .ok_or(SourceError::Unavailable("process memory"))
    }

    fn memory(&mut self) -> MemoryStats {
        self.system.refresh_memory();
        MemoryStats {
            available: self.system.available_memory(),
            used: self.system.used_memory(),
        }
    }

    fn network(&mut self) -> NetworkCounters {
        self.networks.refresh();
        self.networks
            .iter()
            .fold(NetworkCounters::default(), |acc, (_, data)| NetworkCounters {
                bytes_recv: acc.bytes_recv + data.total_received(),
                bytes_sent: acc.bytes_sent + data.total_transmitted(),
            })
    }
}

impl Default for HostSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for HostSource {
    fn snapshot(&mut self) -> Result<ResourceSnapshot, SourceError> {
        let process = process_times()?;
        let cpu = if self.system_cpu {
            system_cpu_times()?
        } else {
            CpuTimes::default()
        };
        let rss = self.rss()?;
        Ok(ResourceSnapshot {
            process,
            rss,
            cpu,
            memory: self.memory(),
            network: self.network(),
        })
    }

    fn provides_system_cpu(&self) -> bool {
        self.system_cpu
    }
}

/// Gets the CPU times of the current process.
#[cfg(unix)]
fn process_times() -> Result<ProcessTimes, SourceError> {
    use std::mem;

    fn seconds(tv: libc::timeval) -> f64 {
        tv.tv_sec as f64 + tv.tv_usec as f64 / 1_000_000.0
    }

    unsafe {
        let mut usage: libc::rusage = mem::zeroed();
        if libc::getrusage(libc::RUSAGE_SELF, &mut usage) == 0 {
            Ok(ProcessTimes {
                user: seconds(usage.ru_utime),
                system: seconds(usage.ru_stime),
            })
        } else {
            Err(SourceError::Io {
                what: "process cpu times",
                source: std::io::Error::last_os_error(),
            })
        }
    }
}

#[cfg(not(unix))]
fn process_times() -> Result<ProcessTimes, SourceError> {
    Err(SourceError::Unavailable("process cpu times"))
}

/// Gets the host wide CPU times.
#[cfg(target_os = "linux")]
fn system_cpu_times() -> Result<CpuTimes, SourceError> {
    let content = std::fs::read_to_string("/proc/stat").map_err(|source| SourceError::Io {
        what: "/proc/stat",
        source,
    })?;
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks <= 0 {
        return Err(SourceError::Unavailable("clock ticks"));
    }
    parse_proc_stat(&content, ticks as f64)
}

#[cfg(not(target_os = "linux"))]
fn system_cpu_times() -> Result<CpuTimes, SourceError> {
    Err(SourceError::Unavailable("system cpu times"))
}

/// Parses the aggregate `cpu` line of `/proc/stat`.
///
/// Older kernels report fewer columns; anything past `idle` is optional.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_stat(content: &str, ticks_per_second: f64) -> Result<CpuTimes, SourceError> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))
        .ok_or(SourceError::Malformed("/proc/stat"))?;

    let values = line
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse::<u64>().map(|v| v as f64 / ticks_per_second))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| SourceError::Malformed("/proc/stat"))?;
    if values.len() < 4 {
        return Err(SourceError::Malformed("/proc/stat"));
    }

    Ok(CpuTimes {
        user: values[0],
        nice: Some(values[1]),
        system: values[2],
        idle: values[3],
        iowait: values.get(4).copied(),
        irq: values.get(5).copied(),
        softirq: values.get(6).copied(),
        steal: values.get(7).copied(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_STAT: &str = "\
cpu  1000 200 300 4000 50 60 70 80 0 0
cpu0 500 100 150 2000 25 30 35 40 0 0
intr 12345
ctxt 67890
";

    #[test]
    fn test_parse_proc_stat() {
        let cpu = parse_proc_stat(PROC_STAT, 100.0).unwrap();
        assert_eq!(cpu.user, 10.0);
        assert_eq!(cpu.nice, Some(2.0));
        assert_eq!(cpu.system, 3.0);
        assert_eq!(cpu.idle, 40.0);
        assert_eq!(cpu.iowait, Some(0.5));
        assert_eq!(cpu.irq, Some(0.6));
        assert_eq!(cpu.softirq, Some(0.7));
        assert_eq!(cpu.steal, Some(0.8));
    }

    #[test]
    fn test_parse_proc_stat_old_kernel() {
        let cpu = parse_proc_stat("cpu 100 0 100 800\n", 100.0).unwrap();
        assert_eq!(cpu.iowait, None);
        assert_eq!(cpu.steal, None);
        assert_eq!(cpu.usage(), 2.0);
        assert_eq!(cpu.total(), 10.0);
    }

    #[test]
    fn test_parse_proc_stat_garbage() {
        assert!(parse_proc_stat("intr 1 2 3\n", 100.0).is_err());
        assert!(parse_proc_stat("cpu 1 2\n", 100.0).is_err());
        assert!(parse_proc_stat("cpu a b c d\n", 100.0).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_process_times() {
        let times = process_times().unwrap();
        assert!(times.user >= 0.0);
        assert!(times.system >= 0.0);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_host_snapshot() {
        let mut source = HostSource::new();
        assert!(source.provides_system_cpu());
        let snapshot = source.snapshot().unwrap();
        assert!(snapshot.rss > 0);
        assert!(snapshot.cpu.total() >= snapshot.cpu.usage());
    }
}
