use url::Url;

use crate::error::BackendApiError;

/// Default base URL of the backend service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

pub const PATH_CHAT: &str = "/ai/chat";
pub const PATH_DEBUG: &str = "/ai/debug";
pub const PATH_PLAN: &str = "/ai/plan";
pub const PATH_FILES: &str = "/files";
pub const PATH_FILE: &str = "/file";
pub const PATH_INDEX_TRIGGER: &str = "/index/index";
pub const PATH_INDEX_STATS: &str = "/index/stats";
pub const PATH_HEALTH: &str = "/health";

/// Resolve the configured base URL, falling back to [`DEFAULT_BASE_URL`] when blank.
pub fn normalize_base_url(input: &str) -> &str {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_BASE_URL
    } else {
        trimmed.trim_end_matches('/')
    }
}

/// Join a base URL and an absolute endpoint path.
///
/// The base path is kept, so `http://host/api` + `/ai/chat` yields
/// `http://host/api/ai/chat`.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, BackendApiError> {
    let base = normalize_base_url(base_url);
    let joined = format!("{base}/{}", path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|source| BackendApiError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })
}
