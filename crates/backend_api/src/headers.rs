use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};

use crate::config::BackendApiConfig;
use crate::error::BackendApiError;

pub fn default_user_agent() -> String {
    format!("vibe-assistant/{}", env!("CARGO_PKG_VERSION"))
}

/// Build the header map sent with every backend request.
///
/// Extra headers from the config are applied last and may override defaults.
pub fn build_headers(config: &BackendApiConfig) -> Result<HeaderMap, BackendApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let user_agent = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(USER_AGENT, header_value(USER_AGENT.as_str(), &user_agent)?);

    for (key, value) in &config.extra_headers {
        let name = HeaderName::from_bytes(key.trim().to_ascii_lowercase().as_bytes())
            .map_err(|_| BackendApiError::InvalidConfig(format!("invalid header key: {key}")))?;
        headers.insert(name, header_value(key, value.trim())?);
    }

    Ok(headers)
}

fn header_value(key: &str, value: &str) -> Result<HeaderValue, BackendApiError> {
    HeaderValue::from_str(value)
        .map_err(|_| BackendApiError::InvalidConfig(format!("invalid header value for {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_accept_and_user_agent() {
        let headers = build_headers(&BackendApiConfig::default()).expect("headers");
        assert_eq!(headers[ACCEPT], "application/json");
        assert!(headers[USER_AGENT]
            .to_str()
            .expect("ascii user agent")
            .starts_with("vibe-assistant/"));
    }

    #[test]
    fn extra_headers_override_and_normalize_keys() {
        let config = BackendApiConfig::default()
            .with_user_agent("custom-agent")
            .insert_header("X-Trace-Id", " abc ");
        let headers = build_headers(&config).expect("headers");
        assert_eq!(headers[USER_AGENT], "custom-agent");
        assert_eq!(headers["x-trace-id"], "abc");
    }

    #[test]
    fn invalid_header_key_is_a_config_error() {
        let config = BackendApiConfig::default().insert_header("bad key", "v");
        assert!(matches!(
            build_headers(&config),
            Err(BackendApiError::InvalidConfig(_))
        ));
    }
}
