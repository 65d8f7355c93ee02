//! Assistant session: conversation history plus one-shot debug and plan slots.
//!
//! The session never performs I/O. `submit*` methods validate input, record the
//! optimistic state and hand back a [`Dispatch`]; the caller executes it and
//! feeds the resolved outcome back through [`AssistantSession::apply`].

use backend_api::{
    ChatRequest, ChatResponse, ContextUsage, DebugRequest, DebugResponse, ErrorKind, Failure,
    PlanRequest, PlanResponse, RequestOutcome,
};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::dispatch::{Dispatch, RequestSlot, SingleFlight, SubmitRejected, Ticket, TicketCounter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Where an assistant turn's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOrigin {
    Question,
    Answer,
    Error(ErrorKind),
}

/// One immutable history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    role: Role,
    content: String,
    created_at: OffsetDateTime,
    origin: TurnOrigin,
    context_usage: Option<ContextUsage>,
}

impl ChatTurn {
    fn question(content: String) -> Self {
        Self {
            role: Role::User,
            content,
            created_at: OffsetDateTime::now_utc(),
            origin: TurnOrigin::Question,
            context_usage: None,
        }
    }

    fn answer(response: ChatResponse) -> Self {
        Self {
            role: Role::Assistant,
            content: response.answer,
            created_at: OffsetDateTime::now_utc(),
            origin: TurnOrigin::Answer,
            context_usage: Some(response.context_stats),
        }
    }

    fn error(failure: &Failure) -> Self {
        Self {
            role: Role::Assistant,
            content: format!("Error: {}", failure.message),
            created_at: OffsetDateTime::now_utc(),
            origin: TurnOrigin::Error(failure.kind),
            context_usage: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn origin(&self) -> TurnOrigin {
        self.origin
    }

    pub fn context_usage(&self) -> Option<&ContextUsage> {
        self.context_usage.as_ref()
    }

    pub fn is_error(&self) -> bool {
        matches!(self.origin, TurnOrigin::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMode {
    Idle,
    Sending { ticket: Ticket },
    /// Idle, but the last exchange ended in a failure.
    IdleWithError(Failure),
}

/// Resolved gateway outcomes addressed to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ChatResolved {
        ticket: Ticket,
        outcome: RequestOutcome<ChatResponse>,
    },
    DebugResolved {
        ticket: Ticket,
        outcome: RequestOutcome<DebugResponse>,
    },
    PlanResolved {
        ticket: Ticket,
        outcome: RequestOutcome<PlanResponse>,
    },
}

#[derive(Debug, Clone)]
pub struct AssistantSession {
    id: Uuid,
    tickets: TicketCounter,
    history: Vec<ChatTurn>,
    mode: ChatMode,
    debug: SingleFlight<DebugResponse>,
    plan: SingleFlight<PlanResponse>,
}

impl Default for AssistantSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            tickets: TicketCounter::default(),
            history: Vec::new(),
            mode: ChatMode::Idle,
            debug: SingleFlight::new(RequestSlot::Debug),
            plan: SingleFlight::new(RequestSlot::Plan),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Conversation turns in display order.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn mode(&self) -> &ChatMode {
        &self.mode
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.mode, ChatMode::Sending { .. })
    }

    pub fn last_error(&self) -> Option<&Failure> {
        match &self.mode {
            ChatMode::IdleWithError(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn debug_result(&self) -> Option<&RequestOutcome<DebugResponse>> {
        self.debug.outcome()
    }

    pub fn plan_result(&self) -> Option<&RequestOutcome<PlanResponse>> {
        self.plan.outcome()
    }

    pub fn is_debug_pending(&self) -> bool {
        self.debug.is_pending()
    }

    pub fn is_plan_pending(&self) -> bool {
        self.plan.is_pending()
    }

    /// Accepts a chat question, appending the user turn immediately.
    pub fn submit(&mut self, question: &str) -> Result<Dispatch<ChatRequest>, SubmitRejected> {
        if self.is_sending() {
            debug!(session = %self.id, "chat submit rejected: exchange in flight");
            return Err(SubmitRejected::Busy(RequestSlot::Chat));
        }

        let question = question.trim();
        if question.is_empty() {
            return Err(SubmitRejected::EmptyField("question"));
        }

        let ticket = self.tickets.issue();
        self.history.push(ChatTurn::question(question.to_string()));
        self.mode = ChatMode::Sending { ticket };
        debug!(session = %self.id, %ticket, "chat exchange dispatched");

        Ok(Dispatch {
            ticket,
            request: ChatRequest::new(question),
        })
    }

    pub fn submit_debug(
        &mut self,
        request: DebugRequest,
    ) -> Result<Dispatch<DebugRequest>, SubmitRejected> {
        self.debug.ensure_idle()?;

        let request = request.normalized();
        if request.file_path.is_empty() {
            return Err(SubmitRejected::EmptyField("file_path"));
        }
        if request.error_message.is_empty() {
            return Err(SubmitRejected::EmptyField("error_message"));
        }

        let ticket = self.tickets.issue();
        self.debug.begin(ticket)?;
        debug!(session = %self.id, %ticket, file = %request.file_path, "debug analysis dispatched");
        Ok(Dispatch { ticket, request })
    }

    pub fn submit_plan(
        &mut self,
        request: PlanRequest,
    ) -> Result<Dispatch<PlanRequest>, SubmitRejected> {
        self.plan.ensure_idle()?;

        let request = request.normalized();
        if request.goal.is_empty() {
            return Err(SubmitRejected::EmptyField("goal"));
        }

        let ticket = self.tickets.issue();
        self.plan.begin(ticket)?;
        debug!(session = %self.id, %ticket, "plan dispatched");
        Ok(Dispatch { ticket, request })
    }

    /// Applies one resolved outcome. Returns `false` when it was stale.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::ChatResolved { ticket, outcome } => self.on_chat_outcome(ticket, outcome),
            SessionEvent::DebugResolved { ticket, outcome } => {
                let applied = self.debug.resolve(ticket, outcome);
                self.log_discard(applied, RequestSlot::Debug, ticket);
                applied
            }
            SessionEvent::PlanResolved { ticket, outcome } => {
                let applied = self.plan.resolve(ticket, outcome);
                self.log_discard(applied, RequestSlot::Plan, ticket);
                applied
            }
        }
    }

    pub fn on_chat_outcome(&mut self, ticket: Ticket, outcome: RequestOutcome<ChatResponse>) -> bool {
        let awaiting = matches!(self.mode, ChatMode::Sending { ticket: active } if active == ticket);
        if !awaiting {
            self.log_discard(false, RequestSlot::Chat, ticket);
            return false;
        }

        match outcome {
            RequestOutcome::Pending => return false,
            RequestOutcome::Success(response) => {
                self.history.push(ChatTurn::answer(response));
                self.mode = ChatMode::Idle;
            }
            RequestOutcome::Failure(failure) => {
                self.history.push(ChatTurn::error(&failure));
                self.mode = ChatMode::IdleWithError(failure);
            }
        }

        true
    }

    /// Clears history and abandons every in-flight request.
    ///
    /// Outcomes dispatched before the reset carry the old generation and are
    /// discarded when they arrive.
    pub fn reset(&mut self) {
        let generation = self.tickets.bump_generation();
        self.history.clear();
        self.mode = ChatMode::Idle;
        self.debug.clear();
        self.plan.clear();
        debug!(session = %self.id, generation, "session reset");
    }

    pub fn generation(&self) -> u64 {
        self.tickets.generation()
    }

    fn log_discard(&self, applied: bool, slot: RequestSlot, ticket: Ticket) {
        if !applied {
            debug!(session = %self.id, %slot, %ticket, "discarding stale outcome");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_question_is_rejected_without_touching_history() {
        let mut session = AssistantSession::new();
        assert_eq!(
            session.submit("   \n\t"),
            Err(SubmitRejected::EmptyField("question"))
        );
        assert!(session.history().is_empty());
        assert_eq!(session.mode(), &ChatMode::Idle);
    }

    #[test]
    fn question_is_trimmed_before_dispatch() {
        let mut session = AssistantSession::new();
        let dispatch = session.submit("  why?  ").expect("accepted");
        assert_eq!(dispatch.request, ChatRequest::new("why?"));
        assert!(!dispatch.request.stream);
        assert_eq!(session.history()[0].content(), "why?");
    }

    #[test]
    fn pending_outcome_keeps_session_sending() {
        let mut session = AssistantSession::new();
        let dispatch = session.submit("q").expect("accepted");
        assert!(!session.on_chat_outcome(dispatch.ticket, RequestOutcome::Pending));
        assert!(session.is_sending());
    }

    #[test]
    fn debug_requires_file_and_error_message() {
        let mut session = AssistantSession::new();
        assert_eq!(
            session.submit_debug(DebugRequest::new(" ", "boom")),
            Err(SubmitRejected::EmptyField("file_path"))
        );
        assert_eq!(
            session.submit_debug(DebugRequest::new("a.py", "")),
            Err(SubmitRejected::EmptyField("error_message"))
        );
        assert!(session.debug_result().is_none());
    }

    #[test]
    fn plan_requires_goal() {
        let mut session = AssistantSession::new();
        assert_eq!(
            session.submit_plan(PlanRequest::new("")),
            Err(SubmitRejected::EmptyField("goal"))
        );
        assert!(!session.is_plan_pending());
    }
}
