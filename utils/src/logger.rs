use std::{
    io::IsTerminal,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    prelude::__tracing_subscriber_SubscriberExt,
    EnvFilter, Layer,
};

/// Environment variable holding either a json logger config or the path to
/// a file containing one.
pub const CONFIG_ENV: &str = "FARM_LOGGING_CONFIG";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub level: String,
    /// Extra `EnvFilter` directives, e.g. `farm_core=info`.
    #[serde(default)]
    pub directives: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            directives: Vec::new(),
        }
    }
}

impl Config {
    /// Reads the config from [`CONFIG_ENV`], falling back on the default
    /// when it is not set.
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::var(CONFIG_ENV).ok())
    }

    fn resolve(raw: Option<String>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        let raw = raw.trim();
        if raw.is_empty() {
            bail!("${CONFIG_ENV} is empty");
        }

        match std::fs::read_to_string(raw) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("failed to parse json data from {raw}")),
            Err(_) => serde_json::from_str(raw)
                .with_context(|| format!("failed to parse json data from ${CONFIG_ENV}")),
        }
    }
}

struct LocalTimer;
impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
        )
    }
}

static QUIET_DIRECTIVES: &[&str] = &["mio=warn", "tokio_util=warn"];

static CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Installs the global subscriber. Later calls, concurrent ones included,
/// are no-ops. A failed install may be retried.
pub fn init(config: &Config) -> Result<()> {
    install_once(&CONFIGURED, || install(config))
}

fn install_once(flag: &AtomicBool, install: impl FnOnce() -> Result<()>) -> Result<()> {
    if flag
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Ok(());
    }

    let res = install();
    if res.is_err() {
        flag.store(false, Ordering::Release);
    }
    res
}

fn install(config: &Config) -> Result<()> {
    let std_out = {
        let mut filter = EnvFilter::from_default_env().add_directive(
            config
                .level
                .parse()
                .with_context(|| format!("invalid log level {}", config.level))?,
        );
        for d in QUIET_DIRECTIVES
            .iter()
            .copied()
            .chain(config.directives.iter().map(String::as_str))
        {
            filter = filter.add_directive(
                d.parse()
                    .with_context(|| format!("invalid log directive {d}"))?,
            );
        }
        fmt::Layer::new()
            .with_ansi(std::io::stdout().is_terminal())
            .with_timer(LocalTimer)
            .with_target(true)
            .with_writer(std::io::stdout)
            .with_file(false)
            .with_filter(filter)
    };

    let collector_std = tracing_subscriber::registry().with(std_out);
    tracing::subscriber::set_global_default(collector_std).context("failed to init logger")
}

/// [`init`] with the config found in the environment.
pub fn init_from_env() -> Result<()> {
    init(&Config::from_env()?)
}

/// 执行一个返回值为 Result 的表达式，如果结果为 Err，打印一条错误日志
/// 用于只记录而不处理错误的情况
#[macro_export]
macro_rules! log_if_err {
    ($run:expr) => {
        $crate::log_if_err!($run, stringify!($run))
    };

    ($run:expr, $msg:expr $(,)?) => {
        if let Err(err) = $run {
            ::tracing::error!(?err, concat!("FAILED: ", $msg))
        }
    };
}

#[cfg(test)]
mod test {
    use std::{io::Write, sync::atomic::AtomicUsize};

    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::resolve(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_config_blob() {
        let config =
            Config::resolve(Some(r#"{"level": "info", "directives": ["farm_core=warn"]}"#.into()))
                .unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.directives, ["farm_core=warn"]);
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"level": "warn"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = Config::resolve(Some(format!("  {path}\n"))).unwrap();
        assert_eq!(config.level, "warn");
        assert!(config.directives.is_empty());
    }

    #[test]
    fn test_config_errors() {
        let err = Config::resolve(Some("  ".into())).unwrap_err();
        assert_eq!(err.to_string(), "$FARM_LOGGING_CONFIG is empty");

        let err = Config::resolve(Some("{not json".into())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to parse json data from $FARM_LOGGING_CONFIG"
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "level = 'info'").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let err = Config::resolve(Some(path.clone())).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("failed to parse json data from {path}")
        );
    }

    #[test]
    fn test_install_once() {
        let flag = AtomicBool::new(false);
        let calls = AtomicUsize::new(0);
        let install = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| install_once(&flag, install).unwrap());
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_install_once_retries_failure() {
        let flag = AtomicBool::new(false);
        assert!(install_once(&flag, || bail!("subscriber already set")).is_err());
        assert!(!flag.load(Ordering::SeqCst));

        install_once(&flag, || Ok(())).unwrap();
        install_once(&flag, || bail!("not called")).unwrap();
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    #[traced_test]
    fn test_log_if_err() {
        log_if_err!(Err::<(), _>("disk on fire"));
        log_if_err!(Ok::<_, String>(()));
        assert!(logs_contain("FAILED: "));
        assert!(logs_contain("disk on fire"));
    }
}
