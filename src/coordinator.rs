//! Read-only composition of the components into one screen state.

use backend_api::{
    ContextUsage, DebugResponse, Failure, FileEntry, IndexStats, PlanResponse, RequestOutcome,
};

use crate::browser::{RepositoryBrowser, SelectionState};
use crate::category::FileCategory;
use crate::indexing::{IndexPanel, StatusLine};
use crate::session::{AssistantSession, ChatTurn};

/// Placeholder shown while the selected file's content is loading.
pub const LOADING_PLACEHOLDER: &str = "Loading...";

#[derive(Debug, Clone, PartialEq)]
pub enum ContentView<'a> {
    NoSelection,
    Loading {
        path: &'a str,
    },
    Ready {
        path: &'a str,
        content: &'a str,
        lines: u64,
        category: FileCategory,
    },
    Failed {
        path: &'a str,
        failure: &'a Failure,
    },
}

impl<'a> ContentView<'a> {
    fn of(selection: Option<&'a SelectionState>) -> Self {
        let Some(selection) = selection else {
            return Self::NoSelection;
        };
        let path = selection.path();
        match selection.content() {
            RequestOutcome::Pending => Self::Loading { path },
            RequestOutcome::Success(content) => Self::Ready {
                path,
                content: &content.content,
                lines: content.lines,
                category: category_of_path(path),
            },
            RequestOutcome::Failure(failure) => Self::Failed { path, failure },
        }
    }

    pub fn path(&self) -> Option<&'a str> {
        match self {
            Self::NoSelection => None,
            Self::Loading { path } | Self::Ready { path, .. } | Self::Failed { path, .. } => {
                Some(*path)
            }
        }
    }

    /// Text for the content pane; the placeholder while loading.
    pub fn body(&self) -> Option<&'a str> {
        match self {
            Self::Loading { .. } => Some(LOADING_PLACEHOLDER),
            Self::Ready { content, .. } => Some(*content),
            Self::NoSelection | Self::Failed { .. } => None,
        }
    }
}

/// One row of the file tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRow<'a> {
    pub entry: &'a FileEntry,
    pub category: FileCategory,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSnapshot<'a> {
    pub directory: Option<&'a str>,
    pub files: Vec<FileRow<'a>>,
    pub listing_loading: bool,
    pub listing_error: Option<&'a Failure>,
    pub content: ContentView<'a>,
    pub history: &'a [ChatTurn],
    pub chat_sending: bool,
    pub chat_error: Option<&'a Failure>,
    /// Usage of the newest assistant answer.
    pub last_context_usage: Option<&'a ContextUsage>,
    pub debug: Option<&'a RequestOutcome<DebugResponse>>,
    pub plan: Option<&'a RequestOutcome<PlanResponse>>,
    pub index_running: bool,
    pub index_status: Option<StatusLine>,
    pub index_stats: Option<&'a IndexStats>,
    pub index_stats_loading: bool,
}

impl ScreenSnapshot<'_> {
    /// Whether any request owned by the screen is still pending.
    pub fn is_busy(&self) -> bool {
        self.listing_loading
            || self.chat_sending
            || matches!(self.content, ContentView::Loading { .. })
            || self.debug.is_some_and(RequestOutcome::is_pending)
            || self.plan.is_some_and(RequestOutcome::is_pending)
            || self.index_running
            || self.index_stats_loading
    }
}

/// Borrows the current state of each component; triggers nothing.
pub fn compose<'a>(
    browser: &'a RepositoryBrowser,
    session: &'a AssistantSession,
    index: &'a IndexPanel,
) -> ScreenSnapshot<'a> {
    let listing = browser.listing();
    let selected = browser.selected_path();
    let files = listing
        .files()
        .iter()
        .map(|entry| FileRow {
            entry,
            category: FileCategory::of(entry),
            selected: selected == Some(entry.path.as_str()),
        })
        .collect();

    let last_context_usage = session
        .history()
        .iter()
        .rev()
        .find_map(ChatTurn::context_usage);

    ScreenSnapshot {
        directory: listing.directory(),
        files,
        listing_loading: listing.is_pending(),
        listing_error: listing.error(),
        content: ContentView::of(browser.selection()),
        history: session.history(),
        chat_sending: session.is_sending(),
        chat_error: session.last_error(),
        last_context_usage,
        debug: session.debug_result(),
        plan: session.plan_result(),
        index_running: index.is_indexing(),
        index_status: index.status_line(),
        index_stats: index.last_stats(),
        index_stats_loading: index
            .stats_outcome()
            .is_some_and(RequestOutcome::is_pending),
    }
}

fn category_of_path(path: &str) -> FileCategory {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => FileCategory::classify(extension),
        _ => FileCategory::Other,
    }
}
