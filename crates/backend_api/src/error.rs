use reqwest::StatusCode;
use serde::de::IgnoredAny;
use serde::Deserialize;
use thiserror::Error;

use crate::client::Operation;
use crate::outcome::ErrorKind;

#[derive(Debug, Error)]
pub enum BackendApiError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{operation} request failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}: {message}")]
    Status {
        operation: Operation,
        status: StatusCode,
        message: String,
        /// Whether `message` came from a structured error payload.
        structured: bool,
    },

    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation} stream produced invalid UTF-8")]
    StreamEncoding { operation: Operation },
}

impl BackendApiError {
    #[must_use]
    pub fn transport(operation: Operation, source: reqwest::Error) -> Self {
        Self::Transport { operation, source }
    }

    #[must_use]
    pub fn decode(operation: Operation, source: serde_json::Error) -> Self {
        Self::Decode { operation, source }
    }

    /// Builds a status error from a non-2xx response body.
    #[must_use]
    pub fn from_status(operation: Operation, status: StatusCode, body: &str) -> Self {
        let (message, structured) = match structured_error_message(body) {
            Some(message) => (message, true),
            None => (unstructured_error_message(operation, status, body), false),
        };
        Self::Status {
            operation,
            status,
            message,
            structured,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_) | Self::InvalidBaseUrl { .. } => ErrorKind::Validation,
            Self::Transport { .. } => ErrorKind::Network,
            Self::Status { .. } | Self::Decode { .. } | Self::StreamEncoding { .. } => {
                ErrorKind::Server
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Message shown to the user; server-supplied messages pass through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Transport { operation, source } if source.is_timeout() => {
                format!("{operation} request timed out")
            }
            Self::Transport { operation, source } if source.is_connect() => {
                format!("{operation} request failed: backend is unreachable ({source})")
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    detail: Option<Detail>,
    error: Option<ErrorField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Items(Vec<DetailItem>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct DetailItem {
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Fields { message: Option<String> },
}

impl ErrorPayload {
    fn message(self) -> Option<String> {
        let from_detail = match self.detail {
            Some(Detail::Text(text)) => non_empty(text),
            Some(Detail::Items(items)) => {
                let joined = items
                    .into_iter()
                    .filter_map(|item| item.msg.and_then(non_empty))
                    .collect::<Vec<_>>()
                    .join("; ");
                non_empty(joined)
            }
            Some(Detail::Other(_)) | None => None,
        };
        if from_detail.is_some() {
            return from_detail;
        }

        match self.error {
            Some(ErrorField::Text(text)) => non_empty(text),
            Some(ErrorField::Fields { message }) => message.and_then(non_empty),
            None => None,
        }
    }
}

/// Extracts the server-supplied message from a structured error body.
///
/// Recognized shapes are `{"detail": "..."}`, `{"detail": [{"msg": ...}]}` and
/// `{"error": {"message": "..."}}` / `{"error": "..."}`.
pub fn structured_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(ErrorPayload::message)
}

/// Message for a failure without a structured body, built from the status text.
pub fn unstructured_error_message(operation: Operation, status: StatusCode, body: &str) -> String {
    let reason = status
        .canonical_reason()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    let body = body.trim();
    if body.is_empty() || body.starts_with('{') || body.starts_with('[') {
        format!("{operation} request failed: {reason}")
    } else {
        format!("{operation} request failed: {reason}: {body}")
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
