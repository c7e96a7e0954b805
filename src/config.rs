//! Runtime configuration, read from environment variables.
//!
//! | variable            | default     |
//! |---------------------|-------------|
//! | `HOST`              | `0.0.0.0`   |
//! | `PORT`              | `8080`      |
//! | `TIMEZONE`          | `UTC`       |
//! | `ENABLE_GAP_PHASE`  | `true`      |
//! | `STATUS_VOCABULARY` | `canonical` |
//! | `SYNC_INTERVAL_SECS`| `3600` (0 disables the background sync) |
//! | `ADMIN_USERNAME`    | `admin`     |
//! | `ADMIN_PASSWORD`    | unset (admin login refused) |
//! | `SEED_CSV`          | unset       |
//! | `SESSION_COOKIE_SECURE` | `true` (set `false` only when serving plain HTTP) |

use crate::logic::LifecycleConfig;
use crate::models::StatusVocabulary;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Zone in which "today" is taken.
    pub timezone: Tz,
    pub lifecycle: LifecycleConfig,
    pub vocabulary: StatusVocabulary,
    /// Period of the background sync; None when disabled.
    pub sync_interval: Option<Duration>,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub seed_csv: Option<PathBuf>,
    /// Send the admin session cookie over HTTPS only.
    pub session_cookie_secure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            timezone: Tz::UTC,
            lifecycle: LifecycleConfig::default(),
            vocabulary: StatusVocabulary::Canonical,
            sync_interval: Some(Duration::from_secs(3600)),
            admin_username: "admin".to_string(),
            admin_password: None,
            seed_csv: None,
            session_cookie_secure: true,
        }
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            key,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through any key lookup; unset or empty keys take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let invalid = |key: &'static str, value: &str, reason: String| ConfigError {
            key,
            value: value.to_string(),
            reason,
        };
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("PORT", port.as_str(), e.to_string()))?;
        }
        if let Some(tz) = get("TIMEZONE") {
            config.timezone = tz
                .trim()
                .parse()
                .map_err(|e: String| invalid("TIMEZONE", tz.as_str(), e))?;
        }
        if let Some(gap) = get("ENABLE_GAP_PHASE") {
            config.lifecycle.enable_gap_phase = parse_bool("ENABLE_GAP_PHASE", &gap)?;
        }
        if let Some(vocab) = get("STATUS_VOCABULARY") {
            config.vocabulary = vocab
                .parse()
                .map_err(|e: crate::models::UnknownLabel| invalid("STATUS_VOCABULARY", vocab.as_str(), e.to_string()))?;
        }
        if let Some(secs) = get("SYNC_INTERVAL_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("SYNC_INTERVAL_SECS", secs.as_str(), e.to_string()))?;
            config.sync_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(user) = get("ADMIN_USERNAME") {
            config.admin_username = user.trim().to_string();
        }
        config.admin_password = get("ADMIN_PASSWORD");
        config.seed_csv = get("SEED_CSV").map(PathBuf::from);
        if let Some(secure) = get("SESSION_COOKIE_SECURE") {
            config.session_cookie_secure = parse_bool("SESSION_COOKIE_SECURE", &secure)?;
        }
        Ok(config)
    }

    /// Current date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}
