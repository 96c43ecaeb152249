use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Thresholds, DEFAULT_THRESHOLD};
use crate::interface::OutputFormat;

const DEFAULT_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: f64 = 5.0;
const DEFAULT_CPU_WINDOW_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{name} threshold must be between 0 and 100, got {value}")]
    Threshold { name: &'static str, value: f64 },

    #[error("timeout must be a positive number of seconds, got {0}")]
    Timeout(f64),

    #[error("interval must be at least one second")]
    Interval,

    #[error("cpu window must be at least one millisecond")]
    CpuWindow,

    #[error("invalid endpoint url {url:?}: {reason}")]
    Url { url: String, reason: String },
}

/// Check host resources and an HTTP endpoint, then exit with the overall health.
///
/// Exit codes: 0 all checks ok, 1 at least one alert, 2 failure in strict mode
/// or invalid configuration.
#[derive(Debug, Parser)]
#[command(name = "healthprobe", version)]
pub struct Cli {
    /// TOML file with default settings; flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CPU usage alert threshold in percent [default: 80]
    #[arg(long, value_name = "PERCENT")]
    pub cpu_threshold: Option<f64>,

    /// Memory usage alert threshold in percent [default: 80]
    #[arg(long, value_name = "PERCENT")]
    pub memory_threshold: Option<f64>,

    /// Disk usage alert threshold in percent [default: 80]
    #[arg(long, value_name = "PERCENT")]
    pub disk_threshold: Option<f64>,

    /// Mount path whose filesystem is checked [default: /]
    #[arg(long, value_name = "PATH")]
    pub disk_path: Option<PathBuf>,

    /// Endpoint to probe [default: http://localhost:5000]
    #[arg(long)]
    pub url: Option<String>,

    /// Probe timeout in seconds [default: 5]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Treat unreadable counters and unreachable endpoints as failures (exit 2)
    #[arg(long)]
    pub strict: bool,

    /// Output format [default: text]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Repeat the checks every SECONDS until interrupted
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// CPU sampling window in milliseconds [default: 1000]
    #[arg(long, value_name = "MILLIS")]
    pub cpu_window: Option<u64>,

    /// Root of the proc filesystem [default: /proc]
    #[arg(long, value_name = "PATH")]
    pub proc_path: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset [default: warn]
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdsFile {
    cpu: Option<f64>,
    memory: Option<f64>,
    disk: Option<f64>,
}

/// On-disk form of the configuration; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    thresholds: ThresholdsFile,
    disk_path: Option<PathBuf>,
    url: Option<String>,
    timeout_secs: Option<f64>,
    strict: Option<bool>,
    format: Option<OutputFormat>,
    interval_secs: Option<u64>,
    cpu_window_ms: Option<u64>,
    proc_path: Option<PathBuf>,
    log_level: Option<String>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub thresholds: Thresholds,
    pub disk_path: PathBuf,
    pub url: Url,
    pub timeout: Duration,
    pub strict: bool,
    pub format: OutputFormat,
    pub interval: Option<Duration>,
    pub cpu_window: Duration,
    pub proc_path: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Resolve settings with precedence flag > config file > default
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };

        Self::merge(cli, file)
    }

    fn merge(cli: Cli, file: ConfigFile) -> Result<Self, ConfigError> {
        let thresholds = Thresholds::new(
            checked_threshold("cpu", cli.cpu_threshold.or(file.thresholds.cpu))?,
            checked_threshold("memory", cli.memory_threshold.or(file.thresholds.memory))?,
            checked_threshold("disk", cli.disk_threshold.or(file.thresholds.disk))?,
        );

        let raw_url = cli.url.or(file.url).unwrap_or_else(|| DEFAULT_URL.to_string());
        let url = parse_url(&raw_url)?;

        let timeout_secs = cli.timeout.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = Duration::try_from_secs_f64(timeout_secs)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or(ConfigError::Timeout(timeout_secs))?;

        let interval = match cli.interval.or(file.interval_secs) {
            Some(0) => return Err(ConfigError::Interval),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let cpu_window = match cli.cpu_window.or(file.cpu_window_ms).unwrap_or(DEFAULT_CPU_WINDOW_MS) {
            0 => return Err(ConfigError::CpuWindow),
            millis => Duration::from_millis(millis),
        };

        Ok(Self {
            thresholds,
            disk_path: cli.disk_path.or(file.disk_path).unwrap_or_else(|| PathBuf::from("/")),
            url,
            timeout,
            strict: cli.strict || file.strict.unwrap_or(false),
            format: cli.format.or(file.format).unwrap_or_default(),
            interval,
            cpu_window,
            proc_path: cli.proc_path.or(file.proc_path).unwrap_or_else(|| PathBuf::from("/proc")),
            log_level: cli.log_level.or(file.log_level).unwrap_or_else(|| "warn".to_string()),
        })
    }
}

fn checked_threshold(name: &'static str, value: Option<f64>) -> Result<f64, ConfigError> {
    let value = value.unwrap_or(DEFAULT_THRESHOLD);
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::Threshold { name, value });
    }
    Ok(value)
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Url {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(format!("unsupported scheme {:?}", scheme))),
    }
}
