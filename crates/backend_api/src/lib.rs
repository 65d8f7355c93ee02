//! Transport contract and HTTP client for the code-assistant backend.
//!
//! This crate owns the wire shapes of every backend operation (chat, debug,
//! plan, file listing, file content, index trigger, index stats, health) and
//! the translation of one typed request into one [`RequestOutcome`]. It holds
//! no session state, performs no retries and caches nothing.
//!
//! Failures never escape as unstructured errors: [`BackendApiClient`] methods
//! return `Result<_, BackendApiError>` and every error classifies into a coarse
//! [`ErrorKind`]. `RequestOutcome::from(result)` is the single conversion point
//! used by callers that model async work as `Pending | Success | Failure`.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod outcome;
pub mod payload;
pub mod responses;
pub mod url;

pub use client::{BackendApiClient, Operation};
pub use config::BackendApiConfig;
pub use error::BackendApiError;
pub use outcome::{ErrorKind, Failure, RequestOutcome};
pub use payload::{ChatRequest, DebugRequest, IndexRequest, PlanRequest};
pub use responses::{
    ChatResponse, ContextUsage, DebugResponse, FileContent, FileEntry, FileListing, HealthStatus,
    IndexStats, IndexTriggerResponse, PlanResponse,
};
pub use url::{endpoint_url, DEFAULT_BASE_URL};
