//! Processor information: cpu count, load and time spent per cpu state.

use std::{sync::OnceLock, time::Duration};

use serde::{Deserialize, Serialize};
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

use super::HostError;
use crate::SystemInfo;

/// Cumulative seconds all cpus have spent in each state since boot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuTimes {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    /// `None` when the kernel does not account io wait.
    pub iowait: Option<f64>,
}

/// Number of cpus installed, computed once.
pub fn num_cpus() -> usize {
    static NUM_CPUS: OnceLock<usize> = OnceLock::new();
    *NUM_CPUS.get_or_init(|| match std::thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(_) => {
            let mut sys = System::new();
            sys.refresh_cpu_all();
            sys.cpus().len().max(1)
        }
    })
}

/// Average load across all cpus, from `0.0` (idle) to `1.0` (every cpu
/// busy), sampled over `interval`. Blocks the calling thread.
pub fn load(interval: Duration) -> f32 {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    std::thread::sleep(interval.max(MINIMUM_CPU_UPDATE_INTERVAL));
    sys.refresh_cpu_usage();
    match sys.global_cpu_usage() {
        usage if usage.is_finite() => (usage / 100.0).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Fraction of physical memory currently in use.
pub fn memory_usage() -> f64 {
    let mut sys = System::new();
    sys.refresh_memory();
    match sys.total_memory() {
        0 => 0.0,
        total => (sys.used_memory() as f64 / total as f64).min(1.0),
    }
}

/// Samples load and memory usage. Blocks for `interval`.
pub fn system_info(interval: Duration) -> SystemInfo {
    SystemInfo {
        cpu: f64::from(load(interval)),
        mem: memory_usage(),
    }
}

impl CpuTimes {
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    fn from_ticks(
        user: u64,
        system: u64,
        idle: u64,
        iowait: Option<u64>,
        ticks_per_second: u64,
    ) -> Self {
        let seconds = |ticks: u64| ticks as f64 / ticks_per_second.max(1) as f64;
        CpuTimes {
            user: seconds(user),
            system: seconds(system),
            idle: seconds(idle),
            iowait: iowait.map(seconds),
        }
    }
}

/// Aggregate of the `cpu` line in `/proc/stat`, scaled by the kernel's
/// clock tick rate.
pub fn times() -> Result<CpuTimes, HostError> {
    #[cfg(target_os = "linux")]
    {
        use procfs::{CurrentSI, KernelStats};

        let total = KernelStats::current()
            .map_err(|err| HostError::Kernel(err.into()))?
            .total;
        Ok(CpuTimes::from_ticks(
            total.user,
            total.system,
            total.idle,
            total.iowait,
            procfs::ticks_per_second(),
        ))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Err(HostError::Unsupported("cpu times"))
    }
}

pub fn user_time() -> Result<f64, HostError> {
    times().map(|t| t.user)
}

pub fn system_time() -> Result<f64, HostError> {
    times().map(|t| t.system)
}

pub fn idle_time() -> Result<f64, HostError> {
    times().map(|t| t.idle)
}

pub fn iowait() -> Result<Option<f64>, HostError> {
    times().map(|t| t.iowait)
}
