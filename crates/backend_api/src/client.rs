use std::fmt;
use std::time::Instant;

use futures_util::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::BackendApiConfig;
use crate::error::BackendApiError;
use crate::headers::build_headers;
use crate::payload::{ChatRequest, DebugRequest, IndexRequest, PlanRequest};
use crate::responses::{
    ChatResponse, DebugResponse, FileContent, FileEntry, FileListing, HealthStatus, IndexStats,
    IndexTriggerResponse, PlanResponse,
};
use crate::url::{
    endpoint_url, normalize_base_url, PATH_CHAT, PATH_DEBUG, PATH_FILE, PATH_FILES, PATH_HEALTH,
    PATH_INDEX_STATS, PATH_INDEX_TRIGGER, PATH_PLAN,
};

/// Backend operations, one per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Chat,
    Debug,
    Plan,
    ListFiles,
    GetFileContent,
    TriggerIndex,
    GetIndexStats,
    Health,
}

impl Operation {
    pub fn method(&self) -> Method {
        match self {
            Self::Chat | Self::Debug | Self::Plan | Self::TriggerIndex => Method::POST,
            Self::ListFiles | Self::GetFileContent | Self::GetIndexStats | Self::Health => {
                Method::GET
            }
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Chat => PATH_CHAT,
            Self::Debug => PATH_DEBUG,
            Self::Plan => PATH_PLAN,
            Self::ListFiles => PATH_FILES,
            Self::GetFileContent => PATH_FILE,
            Self::TriggerIndex => PATH_INDEX_TRIGGER,
            Self::GetIndexStats => PATH_INDEX_STATS,
            Self::Health => PATH_HEALTH,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Debug => "Debug",
            Self::Plan => "Plan",
            Self::ListFiles => "List files",
            Self::GetFileContent => "Get file content",
            Self::TriggerIndex => "Index repository",
            Self::GetIndexStats => "Get index stats",
            Self::Health => "Health check",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stateless HTTP client for the backend contract.
///
/// Each method performs exactly one request. There is no retry and no cache.
#[derive(Debug, Clone)]
pub struct BackendApiClient {
    http: Client,
    headers: HeaderMap,
    config: BackendApiConfig,
}

impl BackendApiClient {
    pub fn new(config: BackendApiConfig) -> Result<Self, BackendApiError> {
        // Fail on a malformed base URL or header at construction, not on first call.
        endpoint_url(&config.base_url, PATH_HEALTH)?;
        let headers = build_headers(&config)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| BackendApiError::InvalidConfig(source.to_string()))?;

        Ok(Self {
            http,
            headers,
            config,
        })
    }

    pub fn config(&self) -> &BackendApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        normalize_base_url(&self.config.base_url)
    }

    /// Builds the request for `operation` without sending it.
    pub fn build_request(&self, operation: Operation) -> Result<RequestBuilder, BackendApiError> {
        let url = endpoint_url(&self.config.base_url, operation.path())?;
        Ok(self
            .http
            .request(operation.method(), url)
            .headers(self.headers.clone()))
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendApiError> {
        let builder = self.build_request(Operation::Chat)?.json(request);
        self.execute(Operation::Chat, builder).await
    }

    pub async fn debug(&self, request: &DebugRequest) -> Result<DebugResponse, BackendApiError> {
        let builder = self.build_request(Operation::Debug)?.json(request);
        self.execute(Operation::Debug, builder).await
    }

    pub async fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, BackendApiError> {
        let builder = self.build_request(Operation::Plan)?.json(request);
        self.execute(Operation::Plan, builder).await
    }

    /// Lists files under `directory`, in backend order.
    pub async fn list_files(&self, directory: &str) -> Result<Vec<FileEntry>, BackendApiError> {
        let builder = self
            .build_request(Operation::ListFiles)?
            .query(&[("directory", directory)]);
        let listing: FileListing = self.execute(Operation::ListFiles, builder).await?;
        Ok(listing.files)
    }

    pub async fn get_file_content(&self, file_path: &str) -> Result<FileContent, BackendApiError> {
        let builder = self
            .build_request(Operation::GetFileContent)?
            .query(&[("file_path", file_path)]);
        self.execute(Operation::GetFileContent, builder).await
    }

    pub async fn trigger_index(
        &self,
        request: &IndexRequest,
    ) -> Result<IndexTriggerResponse, BackendApiError> {
        let builder = self.build_request(Operation::TriggerIndex)?.json(request);
        self.execute(Operation::TriggerIndex, builder).await
    }

    pub async fn index_stats(&self) -> Result<IndexStats, BackendApiError> {
        let builder = self.build_request(Operation::GetIndexStats)?;
        self.execute(Operation::GetIndexStats, builder).await
    }

    pub async fn health(&self) -> Result<HealthStatus, BackendApiError> {
        let builder = self.build_request(Operation::Health)?;
        self.execute(Operation::Health, builder).await
    }

    /// Sends a chat request with `stream: true` and feeds each text chunk to `on_chunk`.
    ///
    /// Returns the concatenated answer. The streamed form carries no context usage.
    pub async fn chat_stream_with_handler<F>(
        &self,
        request: &ChatRequest,
        mut on_chunk: F,
    ) -> Result<String, BackendApiError>
    where
        F: FnMut(&str),
    {
        let operation = Operation::Chat;
        let payload = request.clone().streaming();
        let started = Instant::now();
        debug!(%operation, "sending streaming backend request");

        let response = self
            .build_request(operation)?
            .json(&payload)
            .send()
            .await
            .map_err(|source| log_failure(operation, BackendApiError::transport(operation, source)))?;
        let response = ensure_success(operation, response)
            .await
            .map_err(|error| log_failure(operation, error))?;

        let mut bytes = response.bytes_stream();
        let mut decoder = Utf8ChunkDecoder::default();
        let mut answer = String::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|source| {
                log_failure(operation, BackendApiError::transport(operation, source))
            })?;
            let text = decoder
                .feed(&chunk)
                .ok_or_else(|| log_failure(operation, BackendApiError::StreamEncoding { operation }))?;
            if !text.is_empty() {
                on_chunk(&text);
                answer.push_str(&text);
            }
        }

        if !decoder.is_drained() {
            return Err(log_failure(
                operation,
                BackendApiError::StreamEncoding { operation },
            ));
        }

        debug!(
            %operation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            answer_len = answer.len(),
            "streaming backend request completed"
        );
        Ok(answer)
    }

    async fn execute<T>(
        &self,
        operation: Operation,
        builder: RequestBuilder,
    ) -> Result<T, BackendApiError>
    where
        T: DeserializeOwned,
    {
        let started = Instant::now();
        debug!(%operation, "sending backend request");

        let result = send_and_decode(operation, builder).await;
        match &result {
            Ok(_) => debug!(
                %operation,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "backend request completed"
            ),
            Err(error) => {
                log_failure_ref(operation, error);
            }
        }
        result
    }
}

async fn send_and_decode<T>(operation: Operation, builder: RequestBuilder) -> Result<T, BackendApiError>
where
    T: DeserializeOwned,
{
    let response = builder
        .send()
        .await
        .map_err(|source| BackendApiError::transport(operation, source))?;
    let response = ensure_success(operation, response).await?;
    let body = response
        .text()
        .await
        .map_err(|source| BackendApiError::transport(operation, source))?;
    serde_json::from_str(&body).map_err(|source| BackendApiError::decode(operation, source))
}

async fn ensure_success(operation: Operation, response: Response) -> Result<Response, BackendApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendApiError::from_status(operation, status, &body))
}

fn log_failure(operation: Operation, error: BackendApiError) -> BackendApiError {
    log_failure_ref(operation, &error);
    error
}

fn log_failure_ref(operation: Operation, error: &BackendApiError) {
    warn!(
        %operation,
        kind = %error.kind(),
        status = error.status().map(|status| status.as_u16()),
        error = %error,
        "backend request failed"
    );
}

/// Incremental UTF-8 decoder that holds back a split multi-byte sequence.
#[derive(Debug, Default)]
struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Returns the decodable text so far, or `None` on an invalid sequence.
    fn feed(&mut self, chunk: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(chunk);
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_owned();
                self.pending.clear();
                Some(text)
            }
            Err(error) if error.error_len().is_none() => {
                let valid = error.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                Some(text)
            }
            Err(_) => None,
        }
    }

    fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }
}
