#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use backend_api::{
    ChatRequest, ChatResponse, ContextUsage, DebugRequest, DebugResponse, ErrorKind, FileContent,
    FileEntry, HealthStatus, IndexRequest, IndexStats, IndexTriggerResponse, PlanRequest,
    PlanResponse, RequestOutcome,
};
use tokio::sync::oneshot;
use vibe_assistant::Gateway;

enum Action<T> {
    Resolve(RequestOutcome<T>),
    Panic,
}

/// One scripted reply, optionally held back until its gate is released.
pub struct Reply<T> {
    gate: Option<oneshot::Receiver<()>>,
    action: Action<T>,
}

impl<T> Reply<T> {
    pub fn now(outcome: RequestOutcome<T>) -> Self {
        Self {
            gate: None,
            action: Action::Resolve(outcome),
        }
    }

    pub fn gated(outcome: RequestOutcome<T>) -> (Self, oneshot::Sender<()>) {
        let (release, gate) = oneshot::channel();
        (
            Self {
                gate: Some(gate),
                action: Action::Resolve(outcome),
            },
            release,
        )
    }

    pub fn panic() -> Self {
        Self {
            gate: None,
            action: Action::Panic,
        }
    }
}

struct Script<T> {
    replies: Mutex<HashMap<String, VecDeque<Reply<T>>>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Script<T> {
    fn push(&self, key: &str, reply: Reply<T>) {
        lock(&self.replies)
            .entry(key.to_string())
            .or_default()
            .push_back(reply);
    }

    async fn answer(&self, operation: &str, key: &str) -> RequestOutcome<T> {
        let reply = lock(&self.replies)
            .get_mut(key)
            .and_then(VecDeque::pop_front);
        let Some(reply) = reply else {
            return RequestOutcome::failure(
                ErrorKind::Server,
                format!("unscripted {operation} call for '{key}'"),
            );
        };

        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        match reply.action {
            Action::Resolve(outcome) => outcome,
            Action::Panic => panic!("scripted {operation} panic"),
        }
    }
}

/// In-memory gateway whose replies are scripted per operation and argument.
#[derive(Default)]
pub struct ScriptedGateway {
    calls: Mutex<Vec<String>>,
    chat: Script<ChatResponse>,
    debug: Script<DebugResponse>,
    plan: Script<PlanResponse>,
    listing: Script<Vec<FileEntry>>,
    content: Script<FileContent>,
    index: Script<IndexTriggerResponse>,
    stats: Script<IndexStats>,
    health: Script<HealthStatus>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_chat(&self, question: &str, reply: Reply<ChatResponse>) {
        self.chat.push(question, reply);
    }

    pub fn on_debug(&self, file_path: &str, reply: Reply<DebugResponse>) {
        self.debug.push(file_path, reply);
    }

    pub fn on_plan(&self, goal: &str, reply: Reply<PlanResponse>) {
        self.plan.push(goal, reply);
    }

    pub fn on_listing(&self, directory: &str, reply: Reply<Vec<FileEntry>>) {
        self.listing.push(directory, reply);
    }

    pub fn on_content(&self, path: &str, reply: Reply<FileContent>) {
        self.content.push(path, reply);
    }

    pub fn on_index(&self, repository_path: &str, reply: Reply<IndexTriggerResponse>) {
        self.index.push(repository_path, reply);
    }

    pub fn on_stats(&self, reply: Reply<IndexStats>) {
        self.stats.push("", reply);
    }

    pub fn on_health(&self, reply: Reply<HealthStatus>) {
        self.health.push("", reply);
    }

    /// Calls received so far, as `operation:argument`.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn record(&self, operation: &str, argument: &str) {
        lock(&self.calls).push(format!("{operation}:{argument}"));
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn chat(&self, request: ChatRequest) -> RequestOutcome<ChatResponse> {
        self.record("chat", &request.question);
        self.chat.answer("chat", &request.question).await
    }

    async fn debug(&self, request: DebugRequest) -> RequestOutcome<DebugResponse> {
        self.record("debug", &request.file_path);
        self.debug.answer("debug", &request.file_path).await
    }

    async fn plan(&self, request: PlanRequest) -> RequestOutcome<PlanResponse> {
        self.record("plan", &request.goal);
        self.plan.answer("plan", &request.goal).await
    }

    async fn list_files(&self, directory: String) -> RequestOutcome<Vec<FileEntry>> {
        self.record("list_files", &directory);
        self.listing.answer("list_files", &directory).await
    }

    async fn get_file_content(&self, file_path: String) -> RequestOutcome<FileContent> {
        self.record("get_file_content", &file_path);
        self.content.answer("get_file_content", &file_path).await
    }

    async fn trigger_index(&self, request: IndexRequest) -> RequestOutcome<IndexTriggerResponse> {
        self.record("trigger_index", &request.repository_path);
        self.index
            .answer("trigger_index", &request.repository_path)
            .await
    }

    async fn index_stats(&self) -> RequestOutcome<IndexStats> {
        self.record("index_stats", "");
        self.stats.answer("index_stats", "").await
    }

    async fn health(&self) -> RequestOutcome<HealthStatus> {
        self.record("health", "");
        self.health.answer("health", "").await
    }
}

pub fn answer(text: &str) -> ChatResponse {
    ChatResponse {
        answer: text.to_string(),
        context_stats: usage(),
    }
}

pub fn usage() -> ContextUsage {
    ContextUsage {
        total_chunks: 12,
        packed_chunks: 8,
        context_tokens: 2400,
        system_tokens: 300,
        total_tokens: 2700,
        utilization: 0.66,
        ..ContextUsage::default()
    }
}

pub fn entry(path: &str, size: u64) -> FileEntry {
    let name = path.rsplit('/').next().unwrap_or(path).to_string();
    let extension = name
        .rsplit_once('.')
        .map(|(_, extension)| format!(".{extension}"))
        .unwrap_or_default();
    FileEntry {
        path: path.to_string(),
        name,
        extension,
        size,
    }
}

pub fn content(path: &str, text: &str) -> FileContent {
    FileContent {
        path: path.to_string(),
        content: text.to_string(),
        lines: text.lines().count() as u64,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
