//! Repository indexing panel: trigger an index run and show backend stats.

use backend_api::{Failure, IndexRequest, IndexStats, IndexTriggerResponse, RequestOutcome};
use tracing::debug;

use crate::dispatch::{Dispatch, RequestSlot, SingleFlight, SubmitRejected, Ticket, TicketCounter};

pub const MISSING_PATH_MESSAGE: &str = "Please enter a directory path";
pub const INDEXING_MESSAGE: &str = "Indexing repository...";
pub const INDEXED_MESSAGE: &str = "Repository indexed successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub tone: StatusTone,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndexEvent {
    TriggerResolved {
        ticket: Ticket,
        outcome: RequestOutcome<IndexTriggerResponse>,
    },
    StatsResolved {
        ticket: Ticket,
        outcome: RequestOutcome<IndexStats>,
    },
}

#[derive(Debug, Clone)]
pub struct IndexPanel {
    tickets: TicketCounter,
    trigger: SingleFlight<IndexTriggerResponse>,
    stats: SingleFlight<IndexStats>,
    last_stats: Option<IndexStats>,
}

impl Default for IndexPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexPanel {
    pub fn new() -> Self {
        Self {
            tickets: TicketCounter::default(),
            trigger: SingleFlight::new(RequestSlot::IndexTrigger),
            stats: SingleFlight::new(RequestSlot::IndexStats),
            last_stats: None,
        }
    }

    pub fn trigger_outcome(&self) -> Option<&RequestOutcome<IndexTriggerResponse>> {
        self.trigger.outcome()
    }

    pub fn stats_outcome(&self) -> Option<&RequestOutcome<IndexStats>> {
        self.stats.outcome()
    }

    /// Stats from the last successful refresh or index run.
    pub fn last_stats(&self) -> Option<&IndexStats> {
        self.last_stats.as_ref()
    }

    pub fn is_indexing(&self) -> bool {
        self.trigger.is_pending()
    }

    /// Starts indexing `repository_path`.
    ///
    /// A blank path is recorded as a validation failure and nothing is
    /// dispatched.
    pub fn trigger(
        &mut self,
        repository_path: &str,
    ) -> Result<Dispatch<IndexRequest>, SubmitRejected> {
        self.trigger.ensure_idle()?;

        let repository_path = repository_path.trim();
        if repository_path.is_empty() {
            self.trigger.reject(Failure::validation(MISSING_PATH_MESSAGE));
            return Err(SubmitRejected::EmptyField("repository_path"));
        }

        let ticket = self.tickets.issue();
        self.trigger.begin(ticket)?;
        debug!(%ticket, repository_path, "index run dispatched");
        Ok(Dispatch {
            ticket,
            request: IndexRequest::new(repository_path),
        })
    }

    pub fn refresh_stats(&mut self) -> Result<Dispatch<()>, SubmitRejected> {
        self.stats.ensure_idle()?;
        let ticket = self.tickets.issue();
        self.stats.begin(ticket)?;
        Ok(Dispatch {
            ticket,
            request: (),
        })
    }

    pub fn apply(&mut self, event: IndexEvent) -> bool {
        match event {
            IndexEvent::TriggerResolved { ticket, outcome } => {
                if let RequestOutcome::Success(response) = &outcome {
                    if response.stats.is_object() && self.trigger.in_flight() == Some(ticket) {
                        self.last_stats = Some(IndexStats(response.stats.clone()));
                    }
                }
                self.trigger.resolve(ticket, outcome)
            }
            IndexEvent::StatsResolved { ticket, outcome } => {
                if self.stats.in_flight() != Some(ticket) {
                    return false;
                }
                if let RequestOutcome::Success(stats) = &outcome {
                    self.last_stats = Some(stats.clone());
                }
                self.stats.resolve(ticket, outcome)
            }
        }
    }

    /// One-line status of the last index run, if any.
    pub fn status_line(&self) -> Option<StatusLine> {
        let line = match self.trigger.outcome()? {
            RequestOutcome::Pending => StatusLine {
                tone: StatusTone::Info,
                message: INDEXING_MESSAGE.to_string(),
            },
            RequestOutcome::Success(_) => StatusLine {
                tone: StatusTone::Success,
                message: INDEXED_MESSAGE.to_string(),
            },
            RequestOutcome::Failure(failure) => StatusLine {
                tone: StatusTone::Error,
                message: failure.message.clone(),
            },
        };
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_api::ErrorKind;
    use serde_json::json;

    #[test]
    fn blank_path_records_validation_failure() {
        let mut panel = IndexPanel::new();
        assert_eq!(
            panel.trigger("   "),
            Err(SubmitRejected::EmptyField("repository_path"))
        );
        assert_eq!(
            panel.status_line(),
            Some(StatusLine {
                tone: StatusTone::Error,
                message: MISSING_PATH_MESSAGE.to_string(),
            })
        );
        assert_eq!(
            panel
                .trigger_outcome()
                .and_then(RequestOutcome::failure_ref)
                .map(|failure| failure.kind),
            Some(ErrorKind::Validation)
        );
    }

    #[test]
    fn trigger_success_updates_status_and_stats() {
        let mut panel = IndexPanel::new();
        let dispatch = panel.trigger(" /repo ").expect("dispatch");
        assert_eq!(dispatch.request, IndexRequest::new("/repo"));
        assert_eq!(
            panel.status_line().map(|line| line.message),
            Some(INDEXING_MESSAGE.to_string())
        );
        assert_eq!(panel.trigger("/other"), Err(SubmitRejected::Busy(RequestSlot::IndexTrigger)));

        let stats = json!({"metrics": {"files": 3}});
        assert!(panel.apply(IndexEvent::TriggerResolved {
            ticket: dispatch.ticket,
            outcome: RequestOutcome::Success(IndexTriggerResponse {
                status: "success".to_string(),
                stats: stats.clone(),
            }),
        }));
        assert_eq!(
            panel.status_line().map(|line| line.tone),
            Some(StatusTone::Success)
        );
        assert_eq!(panel.last_stats(), Some(&IndexStats(stats)));
    }

    #[test]
    fn failed_stats_refresh_keeps_previous_stats() {
        let mut panel = IndexPanel::new();
        let first = panel.refresh_stats().expect("refresh");
        let stats = IndexStats(json!({"graph_store": {"nodes": 10}}));
        assert!(panel.apply(IndexEvent::StatsResolved {
            ticket: first.ticket,
            outcome: RequestOutcome::Success(stats.clone()),
        }));

        let second = panel.refresh_stats().expect("refresh");
        assert!(panel.apply(IndexEvent::StatsResolved {
            ticket: second.ticket,
            outcome: RequestOutcome::failure(ErrorKind::Network, "unreachable"),
        }));
        assert_eq!(panel.last_stats(), Some(&stats));
        assert!(panel.stats_outcome().and_then(RequestOutcome::failure_ref).is_some());
    }
}
