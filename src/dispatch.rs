//! Tickets, dispatches and single-flight bookkeeping shared by the components.

use std::fmt;

use backend_api::{ErrorKind, Failure, RequestOutcome};
use thiserror::Error;

/// Originating key of one dispatched request.
///
/// An outcome is applied only when its ticket still matches what the owner is
/// waiting for; anything else is a stale response and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket {
    pub generation: u64,
    pub sequence: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.sequence)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TicketCounter {
    generation: u64,
    next_sequence: u64,
}

impl TicketCounter {
    pub(crate) fn issue(&mut self) -> Ticket {
        self.next_sequence += 1;
        Ticket {
            generation: self.generation,
            sequence: self.next_sequence,
        }
    }

    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

/// A request accepted by a component, to be executed against the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch<R> {
    pub ticket: Ticket,
    pub request: R,
}

/// Kinds of request an owner tracks independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestSlot {
    Chat,
    Debug,
    Plan,
    Listing,
    Content,
    IndexTrigger,
    IndexStats,
}

impl RequestSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Debug => "debug",
            Self::Plan => "plan",
            Self::Listing => "listing",
            Self::Content => "content",
            Self::IndexTrigger => "index",
            Self::IndexStats => "index stats",
        }
    }
}

impl fmt::Display for RequestSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a user action was turned into a no-op instead of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a {0} request is already in flight")]
    Busy(RequestSlot),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("no previous {0} request to retry")]
    NothingToRetry(RequestSlot),
}

impl SubmitRejected {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// One request slot guarded so at most one call is in flight at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleFlight<T> {
    slot: RequestSlot,
    in_flight: Option<Ticket>,
    outcome: Option<RequestOutcome<T>>,
}

impl<T> SingleFlight<T> {
    pub fn new(slot: RequestSlot) -> Self {
        Self {
            slot,
            in_flight: None,
            outcome: None,
        }
    }

    pub fn slot(&self) -> RequestSlot {
        self.slot
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    /// Latest state of the slot; `None` until the first request.
    pub fn outcome(&self) -> Option<&RequestOutcome<T>> {
        self.outcome.as_ref()
    }

    pub(crate) fn begin(&mut self, ticket: Ticket) -> Result<(), SubmitRejected> {
        if self.in_flight.is_some() {
            return Err(SubmitRejected::Busy(self.slot));
        }
        self.in_flight = Some(ticket);
        self.outcome = Some(RequestOutcome::Pending);
        Ok(())
    }

    pub(crate) fn ensure_idle(&self) -> Result<(), SubmitRejected> {
        match self.in_flight {
            Some(_) => Err(SubmitRejected::Busy(self.slot)),
            None => Ok(()),
        }
    }

    /// Records a failure that never reached the gateway.
    pub(crate) fn reject(&mut self, failure: Failure) {
        if self.in_flight.is_none() {
            self.outcome = Some(RequestOutcome::Failure(failure));
        }
    }

    /// Applies a resolved outcome if `ticket` is the one in flight.
    pub(crate) fn resolve(&mut self, ticket: Ticket, outcome: RequestOutcome<T>) -> bool {
        if self.in_flight != Some(ticket) || outcome.is_pending() {
            return false;
        }
        self.in_flight = None;
        self.outcome = Some(outcome);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.in_flight = None;
        self.outcome = None;
    }
}
