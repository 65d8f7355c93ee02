//! Assistant-session orchestration for the code-assistant client.
//!
//! Each component is a plain state machine over resolved
//! [`RequestOutcome`](backend_api::RequestOutcome) values:
//!
//! - [`AssistantSession`] owns the chat history and the debug/plan result slots.
//! - [`RepositoryBrowser`] owns the directory listing and the file selection.
//! - [`IndexPanel`] owns the index trigger and stats slots.
//! - [`compose`] reads all three into one [`ScreenSnapshot`] and mutates nothing.
//!
//! Components never perform I/O. [`AssistantRuntime`] turns accepted
//! [`Dispatch`]es into calls on a [`Gateway`] and applies the outcomes back in
//! arrival order. Outcomes whose [`Ticket`] no longer matches the owner's
//! state are discarded on arrival.

pub mod browser;
pub mod category;
pub mod coordinator;
pub mod dispatch;
pub mod gateway;
pub mod indexing;
pub mod runtime;
pub mod session;

pub use browser::{BrowserEvent, ListingState, RepositoryBrowser, SelectionState};
pub use category::FileCategory;
pub use coordinator::{compose, ContentView, FileRow, ScreenSnapshot, LOADING_PLACEHOLDER};
pub use dispatch::{Dispatch, RequestSlot, SingleFlight, SubmitRejected, Ticket};
pub use gateway::{http_gateway_from_env, Gateway};
pub use indexing::{IndexEvent, IndexPanel, StatusLine, StatusTone};
pub use runtime::{AssistantRuntime, EventReport, GatewayEvent};
pub use session::{AssistantSession, ChatMode, ChatTurn, Role, SessionEvent, TurnOrigin};
