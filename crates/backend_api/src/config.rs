use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::error::BackendApiError;
use crate::url::DEFAULT_BASE_URL;

pub const BASE_URL_ENV_VAR: &str = "VIBE_API_URL";
pub const TIMEOUT_ENV_VAR: &str = "VIBE_API_TIMEOUT_SEC";

/// Transport configuration for backend requests.
#[derive(Debug, Clone)]
pub struct BackendApiConfig {
    /// Base URL that every endpoint path is appended to.
    pub base_url: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional whole-request timeout.
    pub timeout: Option<Duration>,
}

impl Default for BackendApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl BackendApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `VIBE_API_URL` and `VIBE_API_TIMEOUT_SEC`.
    pub fn from_env() -> Result<Self, BackendApiError> {
        let mut config = Self::default();

        if let Some(base_url) = env_string_opt(BASE_URL_ENV_VAR) {
            config.base_url = base_url;
        }

        if let Some(raw) = env_string_opt(TIMEOUT_ENV_VAR) {
            config.timeout = Some(parse_timeout_secs(&raw)?);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, BackendApiError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(BackendApiError::InvalidConfig(format!(
            "{TIMEOUT_ENV_VAR} must be a positive number of seconds, got '{raw}'"
        ))),
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value.trim().to_string())
        }
    })
}
