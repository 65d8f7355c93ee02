//! Seam between the orchestration components and the backend.

use async_trait::async_trait;
use backend_api::{
    BackendApiClient, BackendApiConfig, BackendApiError, ChatRequest, ChatResponse, DebugRequest,
    DebugResponse, FileContent, FileEntry, HealthStatus, IndexRequest, IndexStats,
    IndexTriggerResponse, PlanRequest, PlanResponse, RequestOutcome,
};

/// One method per backend operation; every call resolves to `Success` or
/// `Failure`, never `Pending`, and never panics on backend errors.
#[async_trait]
pub trait Gateway: Send + Sync + 'static {
    async fn chat(&self, request: ChatRequest) -> RequestOutcome<ChatResponse>;

    async fn debug(&self, request: DebugRequest) -> RequestOutcome<DebugResponse>;

    async fn plan(&self, request: PlanRequest) -> RequestOutcome<PlanResponse>;

    async fn list_files(&self, directory: String) -> RequestOutcome<Vec<FileEntry>>;

    async fn get_file_content(&self, file_path: String) -> RequestOutcome<FileContent>;

    async fn trigger_index(&self, request: IndexRequest) -> RequestOutcome<IndexTriggerResponse>;

    async fn index_stats(&self) -> RequestOutcome<IndexStats>;

    async fn health(&self) -> RequestOutcome<HealthStatus>;
}

#[async_trait]
impl Gateway for BackendApiClient {
    async fn chat(&self, request: ChatRequest) -> RequestOutcome<ChatResponse> {
        BackendApiClient::chat(self, &request).await.into()
    }

    async fn debug(&self, request: DebugRequest) -> RequestOutcome<DebugResponse> {
        BackendApiClient::debug(self, &request).await.into()
    }

    async fn plan(&self, request: PlanRequest) -> RequestOutcome<PlanResponse> {
        BackendApiClient::plan(self, &request).await.into()
    }

    async fn list_files(&self, directory: String) -> RequestOutcome<Vec<FileEntry>> {
        BackendApiClient::list_files(self, &directory).await.into()
    }

    async fn get_file_content(&self, file_path: String) -> RequestOutcome<FileContent> {
        BackendApiClient::get_file_content(self, &file_path)
            .await
            .into()
    }

    async fn trigger_index(&self, request: IndexRequest) -> RequestOutcome<IndexTriggerResponse> {
        BackendApiClient::trigger_index(self, &request).await.into()
    }

    async fn index_stats(&self) -> RequestOutcome<IndexStats> {
        BackendApiClient::index_stats(self).await.into()
    }

    async fn health(&self) -> RequestOutcome<HealthStatus> {
        BackendApiClient::health(self).await.into()
    }
}

/// Builds the HTTP gateway from `VIBE_API_URL` / `VIBE_API_TIMEOUT_SEC`.
pub fn http_gateway_from_env() -> Result<BackendApiClient, BackendApiError> {
    BackendApiClient::new(BackendApiConfig::from_env()?)
}
