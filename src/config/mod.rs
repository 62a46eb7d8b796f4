use std::time::Duration;

use url::Url;

use crate::errors::{NotifierError, NotifierResult};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_APPRISE_BIN: &str = "apprise";

#[derive(Debug, Clone)]
pub struct Config {
    pub freshrss_url: String,
    pub username: String,
    pub password: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub apprise_bin: String,
    pub apprise_config: Option<String>,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> NotifierResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> NotifierResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> NotifierResult<String> {
            let value = lookup(key).ok_or_else(|| NotifierError::MissingEnvVar(key.to_string()))?;
            if value.trim().is_empty() {
                return Err(NotifierError::Config(format!("{} must not be empty", key)));
            }
            Ok(value)
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let freshrss_url = parse_base_url(&required("FRESHRSS_URL")?)?;
        let username = required("FRESHRSS_USERNAME")?;
        let password = required("FRESHRSS_PASSWORD")?;

        let poll_interval = parse_seconds(
            "POLL_INTERVAL",
            optional("POLL_INTERVAL"),
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        let request_timeout = parse_seconds(
            "REQUEST_TIMEOUT_SECS",
            optional("REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let apprise_bin = optional("APPRISE_BIN").unwrap_or_else(|| DEFAULT_APPRISE_BIN.to_string());
        let apprise_config = optional("APPRISE_CONFIG");

        Ok(Self {
            freshrss_url,
            username,
            password,
            poll_interval,
            request_timeout,
            apprise_bin,
            apprise_config,
        })
    }
}

fn parse_base_url(raw: &str) -> NotifierResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| NotifierError::Config(format!("FRESHRSS_URL is not a valid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(NotifierError::Config(format!(
            "FRESHRSS_URL must use http or https, got {}",
            other
        ))),
    }
}

fn parse_seconds(key: &str, value: Option<String>, default: u64) -> NotifierResult<Duration> {
    let secs = match value {
        Some(v) => v.trim().parse::<u64>().map_err(|_| {
            NotifierError::Config(format!("{} must be a whole number of seconds", key))
        })?,
        None => default,
    };

    if secs == 0 {
        return Err(NotifierError::Config(format!("{} must be greater than zero", key)));
    }

    Ok(Duration::from_secs(secs))
}
