use std::{collections::BTreeMap, time::Duration};

use anyhow::{bail, Context, Result};
use farm_core::{
    enums,
    host::{self, cpu, cpu::CpuTimes},
    Enum, SystemInfo, Value,
};
use serde::Serialize;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

/// Seconds between two [`SystemInfo`] reports.
pub const REPORT_INTERVAL_ENV: &str = "FARM_REPORT_INTERVAL";

/// How long cpu load is sampled for each report.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub report_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_interval: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::var(REPORT_INTERVAL_ENV).ok())
    }

    fn resolve(raw: Option<String>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        let secs: u64 = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid ${REPORT_INTERVAL_ENV}: {raw:?}"))?;
        if secs == 0 {
            bail!("${REPORT_INTERVAL_ENV} must be at least 1 second");
        }
        Ok(Self {
            report_interval: Duration::from_secs(secs),
        })
    }
}

/// Everything the agent knows about its host at startup.
#[derive(Serialize, Debug)]
pub struct Snapshot {
    pub platform: &'static str,
    pub operating_system: Value,
    pub num_cpus: usize,
    pub cpu_times: Option<CpuTimes>,
    pub system: SystemInfo,
    pub enums: BTreeMap<&'static str, &'static Enum>,
}

impl Snapshot {
    /// Blocks for `sample` while measuring cpu load.
    pub fn collect(sample: Duration) -> Self {
        let cpu_times = match cpu::times() {
            Ok(times) => Some(times),
            Err(err) => {
                warn!(%err, "cpu times unavailable");
                None
            }
        };

        Snapshot {
            platform: host::platform(),
            operating_system: host::os().clone(),
            num_cpus: cpu::num_cpus(),
            cpu_times,
            system: cpu::system_info(sample),
            enums: enums::registries()
                .into_iter()
                .map(|registry| (registry.name(), registry))
                .collect(),
        }
    }
}

/// Samples the host on the blocking pool and logs the result.
pub async fn report_info(sample: Duration) -> Result<SystemInfo> {
    let info = tokio::task::spawn_blocking(move || cpu::system_info(sample))
        .await
        .context("sample system info")?;
    info!(cpu = info.cpu, mem = info.mem, "system info");
    Ok(info)
}

/// Reports [`SystemInfo`] every `report_interval`, forever.
pub async fn run(cfg: Config) -> Result<()> {
    let mut report_interval = time::interval(cfg.report_interval);
    report_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let sample = SAMPLE_INTERVAL.min(cfg.report_interval / 2);

    loop {
        report_interval.tick().await;
        utils::log_if_err!(report_info(sample).await);
    }
}
