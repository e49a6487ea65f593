use crate::result::CheckKind;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "CERTWATCH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Telegram bot credentials. Both values must be non-blank for alerts to be sent.
#[derive(Clone, Debug, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            chat_id: None,
            api_base: default_telegram_api_base(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RdapConfig {
    /// Fixed RDAP base URL. When set the IANA bootstrap registry is not consulted.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_rdap_bootstrap_url")]
    pub bootstrap_url: String,
}

impl Default for RdapConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            bootstrap_url: default_rdap_bootstrap_url(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub run_on_startup: bool,
    /// Wall-clock `HH:MM` (KST) of the first scheduled run. Later runs follow every
    /// `interval_secs`. Unset means one interval after startup.
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default = "default_scheduled_checks")]
    pub checks: Vec<CheckKind>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            run_on_startup: false,
            start_at: None,
            checks: default_scheduled_checks(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Explicit `host[:port]` targets.
    #[serde(default)]
    pub targets: Vec<String>,
    /// Newline separated target file; `#` starts a comment line.
    #[serde(default)]
    pub targets_file: Option<PathBuf>,
    /// Successful results with this many days or fewer remaining raise an alert.
    #[serde(default = "default_threshold_days")]
    pub threshold_days: i64,
    /// Per-target connect/read timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Upper bound on probes running at the same time. Values below 1 behave as 1.
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub rdap: RdapConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            targets_file: None,
            threshold_days: default_threshold_days(),
            timeout_seconds: default_timeout_seconds(),
            workers: default_workers(),
            bind_address: default_bind_address(),
            telegram: TelegramConfig::default(),
            rdap: RdapConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "timeout_seconds must be > 0".into(),
            ));
        }
        if self.schedule.enabled && self.schedule.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "schedule.interval_secs must be > 0 when scheduling is enabled".into(),
            ));
        }
        if let Some(raw) = &self.schedule.start_at {
            if crate::schedule::parse_start_at(raw).is_none() {
                return Err(ConfigError::Validation(format!(
                    "schedule.start_at must be HH:MM, got {raw:?}"
                )));
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_threshold_days() -> i64 {
    30
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_workers() -> usize {
    20
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_interval_secs() -> u64 {
    24 * 60 * 60
}

fn default_scheduled_checks() -> Vec<CheckKind> {
    vec![CheckKind::Certificate]
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_rdap_bootstrap_url() -> String {
    "https://data.iana.org/rdap/dns.json".to_string()
}

/// Build the configuration from `path` (if it exists) and `CERTWATCH__*` environment overrides.
///
/// Nested keys are separated by double underscores (e.g. `CERTWATCH__TELEGRAM__TOKEN`).
/// `CERTWATCH__TARGETS` and `CERTWATCH__SCHEDULE__CHECKS` are comma separated lists.
pub fn load_config_from(path: impl Into<PathBuf>) -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::from(path.into()).required(false))
        .add_source(
            Environment::with_prefix("CERTWATCH")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("targets")
                .with_list_parse_key("schedule.checks")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Load application configuration from `config.yaml` (or `$CERTWATCH_CONFIG`) + environment overrides.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.yaml".to_string());
    load_config_from(path)
}

/// Convenience helper for binaries wanting the old panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.threshold_days, 30);
        assert_eq!(cfg.timeout_seconds, 10);
        assert_eq!(cfg.workers, 20);
        assert!(cfg.schedule.enabled);
        assert_eq!(cfg.schedule.checks, vec![CheckKind::Certificate]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = AppConfig {
            timeout_seconds: 0,
            ..AppConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_interval_only_matters_when_scheduling() {
        let mut cfg = AppConfig::default();
        cfg.schedule.interval_secs = 0;
        assert!(cfg.validate().is_err());
        cfg.schedule.enabled = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn start_at_must_be_a_wall_clock_time() {
        let mut cfg = AppConfig::default();
        cfg.schedule.start_at = Some("09:00".into());
        assert!(cfg.validate().is_ok());
        cfg.schedule.start_at = Some("9 o'clock".into());
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
        cfg.schedule.start_at = Some("25:00".into());
        assert!(cfg.validate().is_err());
    }
}
