use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const BASE_URL_ENV_VAR: &str = "MEAL_MATE_BASE_URL";
pub const PROFILE_PATH_ENV_VAR: &str = "MEAL_MATE_PROFILE_PATH";
pub const DEBOUNCE_MS_ENV_VAR: &str = "MEAL_MATE_DEBOUNCE_MS";
pub const TIMEOUT_SECS_ENV_VAR: &str = "MEAL_MATE_TIMEOUT_SECS";
pub const LOG_LEVEL_ENV_VAR: &str = "MEAL_MATE_LOG";
pub const LOG_FORMAT_ENV_VAR: &str = "MEAL_MATE_LOG_FORMAT";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_PROFILE_PATH: &str = "meal_mate_profile.json";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";
const SUGGESTION_WAIT_MARGIN: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// An environment value that could not be used; the default was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSetting {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub base_url: String,
    pub profile_path: PathBuf,
    pub debounce: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up
    /// a `.env` file. Logging is usually not up yet, so rejected values are
    /// handed back for the caller to report.
    pub fn from_env() -> (Self, Vec<RejectedSetting>) {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<RejectedSetting>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let rejected = RefCell::new(Vec::new());
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |key: &'static str| {
            let raw = non_empty(key)?;
            match raw.parse::<u64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    rejected.borrow_mut().push(RejectedSetting { key, value: raw });
                    None
                }
            }
        };

        let config = Self {
            base_url: non_empty(BASE_URL_ENV_VAR).unwrap_or(defaults.base_url),
            profile_path: non_empty(PROFILE_PATH_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.profile_path),
            debounce: number(DEBOUNCE_MS_ENV_VAR)
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            request_timeout: number(TIMEOUT_SECS_ENV_VAR)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            log_level: non_empty(LOG_LEVEL_ENV_VAR).unwrap_or(defaults.log_level),
            log_format: match non_empty(LOG_FORMAT_ENV_VAR).as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };
        (config, rejected.into_inner())
    }

    /// Upper bound on how long one suggestion lookup can take to show up.
    pub fn suggestion_wait(&self) -> Duration {
        self.debounce + self.request_timeout + SUGGESTION_WAIT_MARGIN
    }
}
