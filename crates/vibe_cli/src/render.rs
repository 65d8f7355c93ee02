//! Plain-text rendering of snapshot parts for the shell transcript.

use std::fmt::Write as _;

use backend_api::{
    ContextUsage, DebugResponse, Failure, HealthStatus, PlanResponse, RequestOutcome,
};
use vibe_assistant::{ChatTurn, ContentView, FileRow, Role, ScreenSnapshot, StatusTone, SubmitRejected};

pub fn turn(entry: &ChatTurn) -> String {
    let speaker = match entry.role() {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut out = format!("{speaker}> {}", entry.content());
    if let Some(usage) = entry.context_usage() {
        let _ = write!(out, "\n  [{}]", context_usage(usage));
    }
    out
}

pub fn context_usage(usage: &ContextUsage) -> String {
    format!(
        "chunks {}/{}, tokens {} (context {}, system {}), utilization {}",
        usage.packed_chunks,
        usage.total_chunks,
        usage.total_tokens,
        usage.context_tokens,
        usage.system_tokens,
        usage.utilization,
    )
}

fn file_row(row: &FileRow<'_>) -> String {
    let marker = if row.selected { '>' } else { ' ' };
    format!(
        "{marker} {} {} ({} bytes)",
        row.category.icon(),
        row.entry.path,
        row.entry.size
    )
}

pub fn listing(snapshot: &ScreenSnapshot<'_>) -> String {
    let directory = snapshot.directory.unwrap_or(".");
    if snapshot.listing_loading {
        return format!("Loading files in {directory}...");
    }

    let mut out = format!("Files in {directory}:");
    if snapshot.files.is_empty() {
        out.push_str("\n  (no files)");
    }
    for row in &snapshot.files {
        out.push('\n');
        out.push_str(&file_row(row));
    }
    if let Some(failure) = snapshot.listing_error {
        let _ = write!(out, "\n{}\n  (use /retry to try again)", failure_line(failure));
    }
    out
}

pub fn content(view: &ContentView<'_>) -> String {
    match view {
        ContentView::NoSelection => "No file selected.".to_string(),
        ContentView::Loading { path } => format!("{path}\n{}", vibe_assistant::LOADING_PLACEHOLDER),
        ContentView::Ready {
            path,
            content,
            lines,
            category,
        } => format!(
            "{} {path} ({lines} lines, {})\n{content}",
            category.icon(),
            category.language()
        ),
        ContentView::Failed { path, failure } => format!("{path}\n{}", failure_line(failure)),
    }
}

pub fn debug(outcome: Option<&RequestOutcome<DebugResponse>>) -> String {
    match outcome {
        None => String::new(),
        Some(RequestOutcome::Pending) => "Analyzing...".to_string(),
        Some(RequestOutcome::Success(response)) => format!(
            "Analysis:\n{}\n\nSuggested fix:\n{}\n  [{}]",
            response.analysis,
            response.suggested_fix,
            context_usage(&response.context_stats)
        ),
        Some(RequestOutcome::Failure(failure)) => failure_line(failure),
    }
}

pub fn plan(outcome: Option<&RequestOutcome<PlanResponse>>) -> String {
    match outcome {
        None => String::new(),
        Some(RequestOutcome::Pending) => "Planning...".to_string(),
        Some(RequestOutcome::Success(response)) => format!(
            "Plan:\n{}\n  [{}]",
            response.plan,
            context_usage(&response.context_stats)
        ),
        Some(RequestOutcome::Failure(failure)) => failure_line(failure),
    }
}

pub fn index(snapshot: &ScreenSnapshot<'_>) -> String {
    let mut out = String::new();
    if let Some(status) = &snapshot.index_status {
        let prefix = match status.tone {
            StatusTone::Info => "..",
            StatusTone::Success => "ok",
            StatusTone::Error => "!!",
        };
        let _ = write!(out, "{prefix} {}", status.message);
    }
    if let Some(stats) = snapshot.index_stats {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(out, "Index stats:\n{}", stats.to_pretty_string());
    }
    out
}

pub fn health(outcome: &RequestOutcome<HealthStatus>) -> String {
    match outcome {
        RequestOutcome::Success(status) if status.is_healthy() => "Backend is healthy.".to_string(),
        RequestOutcome::Success(status) => format!("Backend status: {}", status.status),
        RequestOutcome::Failure(failure) => failure_line(failure),
        RequestOutcome::Pending => "Checking backend...".to_string(),
    }
}

pub fn rejection(rejected: &SubmitRejected) -> String {
    format!("(ignored: {rejected})")
}

fn failure_line(failure: &Failure) -> String {
    format!("Error: {} [{}]", failure.message, failure.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_api::ErrorKind;
    use pretty_assertions::assert_eq;
    use vibe_assistant::{FileCategory, RequestSlot};

    #[test]
    fn ready_content_shows_icon_and_language() {
        let view = ContentView::Ready {
            path: "a.py",
            content: "print(1)",
            lines: 1,
            category: FileCategory::Python,
        };
        assert_eq!(content(&view), "🐍 a.py (1 lines, python)\nprint(1)");
    }

    #[test]
    fn failures_name_their_kind() {
        let outcome = RequestOutcome::<HealthStatus>::Failure(Failure::new(
            ErrorKind::Network,
            "Health check request timed out",
        ));
        assert_eq!(
            health(&outcome),
            "Error: Health check request timed out [network]"
        );
        assert_eq!(
            rejection(&SubmitRejected::Busy(RequestSlot::Chat)),
            "(ignored: a chat request is already in flight)"
        );
    }

    #[test]
    fn usage_passes_utilization_through() {
        let usage = ContextUsage {
            total_chunks: 10,
            packed_chunks: 4,
            context_tokens: 900,
            system_tokens: 100,
            total_tokens: 1000,
            utilization: 0.375,
            ..ContextUsage::default()
        };
        assert_eq!(
            context_usage(&usage),
            "chunks 4/10, tokens 1000 (context 900, system 100), utilization 0.375"
        );
    }
}
