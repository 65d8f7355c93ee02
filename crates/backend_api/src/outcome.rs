use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BackendApiError;

/// Coarse failure class surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Backend unreachable, connection dropped or timed out.
    Network,
    /// Backend answered with an error status or an undecodable payload.
    Server,
    /// Caller-side precondition failed before any request was made.
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Server => "server",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}

impl From<BackendApiError> for Failure {
    fn from(error: BackendApiError) -> Self {
        Self::new(error.kind(), error.user_message())
    }
}

/// Tagged state of one asynchronous backend call.
///
/// The gateway only ever resolves to `Success` or `Failure`; `Pending` is the
/// state owners record between dispatch and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome<T> {
    Pending,
    Success(T),
    Failure(Failure),
}

impl<T> RequestOutcome<T> {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(kind, message))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure_ref(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> RequestOutcome<&T> {
        match self {
            Self::Pending => RequestOutcome::Pending,
            Self::Success(value) => RequestOutcome::Success(value),
            Self::Failure(failure) => RequestOutcome::Failure(failure.clone()),
        }
    }

    pub fn map<U, F>(self, f: F) -> RequestOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Pending => RequestOutcome::Pending,
            Self::Success(value) => RequestOutcome::Success(f(value)),
            Self::Failure(failure) => RequestOutcome::Failure(failure),
        }
    }
}

impl<T> From<Result<T, BackendApiError>> for RequestOutcome<T> {
    fn from(result: Result<T, BackendApiError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error.into()),
        }
    }
}

impl<T> From<Result<T, Failure>> for RequestOutcome<T> {
    fn from(result: Result<T, Failure>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(failure) => Self::Failure(failure),
        }
    }
}
