use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Diagnostic counts describing how much retrieved context one AI response used.
///
/// `utilization` is passed through exactly as the backend reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextUsage {
    pub total_chunks: u64,
    pub packed_chunks: u64,
    pub context_tokens: u64,
    pub system_tokens: u64,
    pub total_tokens: u64,
    pub utilization: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_tokens: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub context_stats: ContextUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugResponse {
    pub analysis: String,
    pub suggested_fix: String,
    #[serde(default)]
    pub context_stats: ContextUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: String,
    #[serde(default)]
    pub context_stats: ContextUsage,
}

/// One file in a directory listing. `path` is unique within a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub size: u64,
}

/// Body of `GET /files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListing {
    pub files: Vec<FileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Body of `GET /file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
    #[serde(default)]
    pub lines: u64,
}

/// Body of `POST /index/index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexTriggerResponse {
    pub status: String,
    #[serde(default)]
    pub stats: Value,
}

/// Body of `GET /index/stats`, kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexStats(pub Value);

impl IndexStats {
    /// Looks up a top-level section such as `metrics` or `graph_store`.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub databases: Value,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
