//! Repository browser: directory listing plus the selected file's content.

use backend_api::{FileContent, FileEntry, Failure, RequestOutcome};
use tracing::debug;

use crate::dispatch::{Dispatch, RequestSlot, SubmitRejected, Ticket, TicketCounter};

/// Latest directory listing and its request state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingState {
    directory: Option<String>,
    files: Vec<FileEntry>,
    status: Option<RequestOutcome<()>>,
    in_flight: Option<Ticket>,
}

impl ListingState {
    /// Directory of the most recent `load_listing` call.
    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref()
    }

    /// Entries from the last successful load, in backend order.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&Failure> {
        self.status.as_ref().and_then(RequestOutcome::failure_ref)
    }

    pub fn status(&self) -> Option<&RequestOutcome<()>> {
        self.status.as_ref()
    }
}

/// The selected path and the content fetched for it.
///
/// `content` always belongs to `path`: a new selection resets it to
/// `Pending` before any fetch is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    path: String,
    ticket: Ticket,
    content: RequestOutcome<FileContent>,
}

impl SelectionState {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &RequestOutcome<FileContent> {
        &self.content
    }

    pub fn is_loading(&self) -> bool {
        self.content.is_pending()
    }

    /// Fetched text, only once it has arrived for this path.
    pub fn text(&self) -> Option<&str> {
        self.content.success().map(|content| content.content.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    ListingResolved {
        ticket: Ticket,
        outcome: RequestOutcome<Vec<FileEntry>>,
    },
    ContentResolved {
        ticket: Ticket,
        path: String,
        outcome: RequestOutcome<FileContent>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RepositoryBrowser {
    tickets: TicketCounter,
    listing: ListingState,
    selection: Option<SelectionState>,
}

impl RepositoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self) -> &ListingState {
        &self.listing
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.selection.as_ref()
    }

    pub fn selected_path(&self) -> Option<&str> {
        self.selection.as_ref().map(SelectionState::path)
    }

    /// Starts loading `directory`. A newer call supersedes any pending one.
    pub fn load_listing(&mut self, directory: &str) -> Result<Dispatch<String>, SubmitRejected> {
        let directory = directory.trim();
        if directory.is_empty() {
            return Err(SubmitRejected::EmptyField("directory"));
        }

        let ticket = self.tickets.issue();
        if let Some(previous) = self.listing.in_flight.replace(ticket) {
            debug!(%previous, %ticket, "listing superseded");
        }
        self.listing.directory = Some(directory.to_string());
        self.listing.status = Some(RequestOutcome::Pending);
        debug!(%ticket, directory, "listing dispatched");

        Ok(Dispatch {
            ticket,
            request: directory.to_string(),
        })
    }

    /// Re-issues the listing for the last-used directory.
    pub fn retry(&mut self) -> Result<Dispatch<String>, SubmitRejected> {
        let directory = self
            .listing
            .directory
            .clone()
            .ok_or(SubmitRejected::NothingToRetry(RequestSlot::Listing))?;
        self.load_listing(&directory)
    }

    /// Selects `path`, invalidating whatever content was shown before.
    pub fn select_file(&mut self, path: &str) -> Result<Dispatch<String>, SubmitRejected> {
        let path = path.trim();
        if path.is_empty() {
            return Err(SubmitRejected::EmptyField("file_path"));
        }

        let ticket = self.tickets.issue();
        self.selection = Some(SelectionState {
            path: path.to_string(),
            ticket,
            content: RequestOutcome::Pending,
        });
        debug!(%ticket, path, "content fetch dispatched");

        Ok(Dispatch {
            ticket,
            request: path.to_string(),
        })
    }

    /// Fetches the current selection again, e.g. after a failed load.
    pub fn reload_selection(&mut self) -> Result<Dispatch<String>, SubmitRejected> {
        let path = self
            .selected_path()
            .map(str::to_owned)
            .ok_or(SubmitRejected::NothingToRetry(RequestSlot::Content))?;
        self.select_file(&path)
    }

    /// Applies one resolved outcome. Returns `false` when it was stale.
    pub fn apply(&mut self, event: BrowserEvent) -> bool {
        match event {
            BrowserEvent::ListingResolved { ticket, outcome } => {
                self.on_listing_outcome(ticket, outcome)
            }
            BrowserEvent::ContentResolved {
                ticket,
                path,
                outcome,
            } => self.on_content_outcome(ticket, &path, outcome),
        }
    }

    pub fn on_listing_outcome(
        &mut self,
        ticket: Ticket,
        outcome: RequestOutcome<Vec<FileEntry>>,
    ) -> bool {
        if self.listing.in_flight != Some(ticket) || outcome.is_pending() {
            debug!(%ticket, "discarding stale listing");
            return false;
        }

        self.listing.in_flight = None;
        match outcome {
            RequestOutcome::Success(files) => {
                debug!(%ticket, count = files.len(), "listing loaded");
                self.listing.files = files;
                self.listing.status = Some(RequestOutcome::Success(()));
            }
            RequestOutcome::Failure(failure) => {
                self.listing.status = Some(RequestOutcome::Failure(failure));
            }
            RequestOutcome::Pending => {}
        }
        true
    }

    pub fn on_content_outcome(
        &mut self,
        ticket: Ticket,
        path: &str,
        outcome: RequestOutcome<FileContent>,
    ) -> bool {
        let Some(selection) = self.selection.as_mut() else {
            return false;
        };
        if selection.ticket != ticket
            || selection.path != path
            || !selection.content.is_pending()
            || outcome.is_pending()
        {
            debug!(%ticket, path, current = %selection.path, "discarding stale content");
            return false;
        }

        // The backend echoes a normalized path, so staleness is keyed on the
        // ticket and the requested path only.
        if let RequestOutcome::Success(content) = &outcome {
            if content.path != path {
                debug!(requested = path, served = %content.path, "backend normalized path");
            }
        }
        selection.content = outcome;
        true
    }
}
