//! Async driver that runs gateway calls and applies their outcomes in order.
//!
//! Each user action goes through the owning component first, so validation and
//! single-flight checks happen before anything is spawned. Accepted dispatches
//! run as tokio tasks; their outcomes are queued on a channel and applied one
//! at a time on the runtime's owner, never concurrently with another mutation.

use std::future::Future;
use std::sync::Arc;

use backend_api::{DebugRequest, Failure, HealthStatus, PlanRequest, RequestOutcome};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::browser::{BrowserEvent, RepositoryBrowser};
use crate::coordinator::{compose, ScreenSnapshot};
use crate::dispatch::{RequestSlot, SubmitRejected, Ticket};
use crate::gateway::Gateway;
use crate::indexing::{IndexEvent, IndexPanel};
use crate::session::{AssistantSession, SessionEvent};

/// A resolved gateway call addressed to its owning component.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    Session(SessionEvent),
    Browser(BrowserEvent),
    Index(IndexEvent),
}

impl GatewayEvent {
    pub fn slot(&self) -> RequestSlot {
        match self {
            Self::Session(SessionEvent::ChatResolved { .. }) => RequestSlot::Chat,
            Self::Session(SessionEvent::DebugResolved { .. }) => RequestSlot::Debug,
            Self::Session(SessionEvent::PlanResolved { .. }) => RequestSlot::Plan,
            Self::Browser(BrowserEvent::ListingResolved { .. }) => RequestSlot::Listing,
            Self::Browser(BrowserEvent::ContentResolved { .. }) => RequestSlot::Content,
            Self::Index(IndexEvent::TriggerResolved { .. }) => RequestSlot::IndexTrigger,
            Self::Index(IndexEvent::StatsResolved { .. }) => RequestSlot::IndexStats,
        }
    }
}

/// What happened to one applied outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventReport {
    pub slot: RequestSlot,
    /// `false` when the outcome was stale and discarded.
    pub applied: bool,
}

pub struct AssistantRuntime<G: ?Sized + Gateway> {
    gateway: Arc<G>,
    session: AssistantSession,
    browser: RepositoryBrowser,
    index: IndexPanel,
    events_tx: UnboundedSender<GatewayEvent>,
    events_rx: UnboundedReceiver<GatewayEvent>,
    in_flight: usize,
}

impl<G: ?Sized + Gateway> AssistantRuntime<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            session: AssistantSession::new(),
            browser: RepositoryBrowser::new(),
            index: IndexPanel::new(),
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn session(&self) -> &AssistantSession {
        &self.session
    }

    pub fn browser(&self) -> &RepositoryBrowser {
        &self.browser
    }

    pub fn index_panel(&self) -> &IndexPanel {
        &self.index
    }

    /// Number of spawned calls whose outcome has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn snapshot(&self) -> ScreenSnapshot<'_> {
        compose(&self.browser, &self.session, &self.index)
    }

    pub fn send_chat(&mut self, question: &str) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.session.submit(question)?;
        let ticket = dispatch.ticket;
        let gateway = Arc::clone(&self.gateway);
        self.spawn_call(
            RequestSlot::Chat,
            async move { gateway.chat(dispatch.request).await },
            move |outcome| GatewayEvent::Session(SessionEvent::ChatResolved { ticket, outcome }),
        );
        Ok(ticket)
    }

    pub fn request_debug(&mut self, request: DebugRequest) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.session.submit_debug(request)?;
        let ticket = dispatch.ticket;
        let gateway = Arc::clone(&self.gateway);
        self.spawn_call(
            RequestSlot::Debug,
            async move { gateway.debug(dispatch.request).await },
            move |outcome| GatewayEvent::Session(SessionEvent::DebugResolved { ticket, outcome }),
        );
        Ok(ticket)
    }

    pub fn request_plan(&mut self, request: PlanRequest) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.session.submit_plan(request)?;
        let ticket = dispatch.ticket;
        let gateway = Arc::clone(&self.gateway);
        self.spawn_call(
            RequestSlot::Plan,
            async move { gateway.plan(dispatch.request).await },
            move |outcome| GatewayEvent::Session(SessionEvent::PlanResolved { ticket, outcome }),
        );
        Ok(ticket)
    }

    pub fn load_listing(&mut self, directory: &str) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.browser.load_listing(directory)?;
        Ok(self.spawn_listing(dispatch.ticket, dispatch.request))
    }

    pub fn retry_listing(&mut self) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.browser.retry()?;
        Ok(self.spawn_listing(dispatch.ticket, dispatch.request))
    }

    pub fn select_file(&mut self, path: &str) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.browser.select_file(path)?;
        Ok(self.spawn_content(dispatch.ticket, dispatch.request))
    }

    pub fn reload_selection(&mut self) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.browser.reload_selection()?;
        Ok(self.spawn_content(dispatch.ticket, dispatch.request))
    }

    pub fn trigger_index(&mut self, repository_path: &str) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.index.trigger(repository_path)?;
        let ticket = dispatch.ticket;
        let gateway = Arc::clone(&self.gateway);
        self.spawn_call(
            RequestSlot::IndexTrigger,
            async move { gateway.trigger_index(dispatch.request).await },
            move |outcome| GatewayEvent::Index(IndexEvent::TriggerResolved { ticket, outcome }),
        );
        Ok(ticket)
    }

    pub fn refresh_index_stats(&mut self) -> Result<Ticket, SubmitRejected> {
        let dispatch = self.index.refresh_stats()?;
        let ticket = dispatch.ticket;
        let gateway = Arc::clone(&self.gateway);
        self.spawn_call(
            RequestSlot::IndexStats,
            async move { gateway.index_stats().await },
            move |outcome| GatewayEvent::Index(IndexEvent::StatsResolved { ticket, outcome }),
        );
        Ok(ticket)
    }

    /// Clears the conversation. Calls already in flight still drain but their
    /// outcomes are discarded.
    pub fn reset_session(&mut self) {
        self.session.reset();
    }

    /// Health is not owned by any component, so it is awaited directly.
    pub async fn check_health(&self) -> RequestOutcome<HealthStatus> {
        self.gateway.health().await
    }

    /// Waits for the next outcome and applies it. `None` when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<EventReport> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Applies outcomes until no call is in flight.
    pub async fn settle(&mut self) -> Vec<EventReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.next_event().await {
            reports.push(report);
        }
        reports
    }

    /// Applies outcomes that have already arrived without waiting.
    pub fn drain_ready(&mut self) -> Vec<EventReport> {
        let mut reports = Vec::new();
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => reports.push(self.apply(event)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        reports
    }

    fn apply(&mut self, event: GatewayEvent) -> EventReport {
        self.in_flight = self.in_flight.saturating_sub(1);
        let slot = event.slot();
        let applied = match event {
            GatewayEvent::Session(event) => self.session.apply(event),
            GatewayEvent::Browser(event) => self.browser.apply(event),
            GatewayEvent::Index(event) => self.index.apply(event),
        };
        debug!(%slot, applied, in_flight = self.in_flight, "gateway outcome applied");
        EventReport { slot, applied }
    }

    fn spawn_listing(&mut self, ticket: Ticket, directory: String) -> Ticket {
        let gateway = Arc::clone(&self.gateway);
        self.spawn_call(
            RequestSlot::Listing,
            async move { gateway.list_files(directory).await },
            move |outcome| GatewayEvent::Browser(BrowserEvent::ListingResolved { ticket, outcome }),
        );
        ticket
    }

    fn spawn_content(&mut self, ticket: Ticket, path: String) -> Ticket {
        let gateway = Arc::clone(&self.gateway);
        let event_path = path.clone();
        self.spawn_call(
            RequestSlot::Content,
            async move { gateway.get_file_content(path).await },
            move |outcome| {
                GatewayEvent::Browser(BrowserEvent::ContentResolved {
                    ticket,
                    path: event_path,
                    outcome,
                })
            },
        );
        ticket
    }

    /// Spawns one gateway call. A panicking call still resolves, as a server failure.
    fn spawn_call<T, F, W>(&mut self, slot: RequestSlot, call: F, wrap: W)
    where
        T: Send + 'static,
        F: Future<Output = RequestOutcome<T>> + Send + 'static,
        W: FnOnce(RequestOutcome<T>) -> GatewayEvent + Send + 'static,
    {
        self.in_flight += 1;
        let events_tx = self.events_tx.clone();
        debug!(%slot, in_flight = self.in_flight, "spawning gateway call");

        tokio::spawn(async move {
            let outcome = match tokio::spawn(call).await {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(%slot, error = %error, "gateway call aborted");
                    RequestOutcome::Failure(Failure::server(format!(
                        "Gateway {slot} call failed unexpectedly"
                    )))
                }
            };
            // The receiver lives as long as the runtime; a send error means it is gone.
            let _ = events_tx.send(wrap(outcome));
        });
    }
}
