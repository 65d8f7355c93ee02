use serde::{Deserialize, Serialize};

/// Body of `POST /ai/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    /// Default: false.
    #[serde(default)]
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            stream: false,
        }
    }

    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Body of `POST /ai/debug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRequest {
    pub file_path: String,
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl DebugRequest {
    pub fn new(file_path: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            error_message: error_message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Trims required fields and drops a blank optional context.
    pub fn normalized(self) -> Self {
        Self {
            file_path: self.file_path.trim().to_string(),
            error_message: self.error_message.trim().to_string(),
            context: blank_to_none(self.context),
        }
    }
}

/// Body of `POST /ai/plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl PlanRequest {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Trims the goal and drops a blank optional scope.
    pub fn normalized(self) -> Self {
        Self {
            goal: self.goal.trim().to_string(),
            scope: blank_to_none(self.scope),
        }
    }
}

/// Body of `POST /index/index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRequest {
    pub repository_path: String,
}

impl IndexRequest {
    pub fn new(repository_path: impl Into<String>) -> Self {
        Self {
            repository_path: repository_path.into(),
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
