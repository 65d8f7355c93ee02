use backend_api::RequestOutcome;
use tracing::debug;
use vibe_assistant::{AssistantRuntime, Gateway, SubmitRejected, TurnOrigin};

use crate::commands::{Command, HELP};
use crate::config::ShellConfig;
use crate::render;

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub output: String,
    pub quit: bool,
}

impl Step {
    fn show(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// Runs `command`, waits for every call it started, and renders the part of
/// the screen it affected.
pub async fn run_command<G>(
    runtime: &mut AssistantRuntime<G>,
    config: &ShellConfig,
    command: Command,
) -> Step
where
    G: ?Sized + Gateway,
{
    debug!(?command, "running shell command");
    match command {
        Command::Ask(question) => {
            let start = runtime.session().history().len();
            if let Err(rejected) = runtime.send_chat(&question) {
                return Step::show(render::rejection(&rejected));
            }
            runtime.settle().await;
            let turns = runtime.session().history();
            let output = turns
                .get(start..)
                .unwrap_or_default()
                .iter()
                .filter(|turn| turn.origin() != TurnOrigin::Question)
                .map(render::turn)
                .collect::<Vec<_>>()
                .join("\n");
            Step::show(output)
        }
        Command::Files(directory) => {
            let directory = directory
                .or_else(|| runtime.browser().listing().directory().map(str::to_owned))
                .unwrap_or_else(|| config.default_directory.clone());
            settle_then(runtime, |runtime| runtime.load_listing(&directory), |runtime| {
                render::listing(&runtime.snapshot())
            })
            .await
        }
        Command::Retry => {
            settle_then(runtime, AssistantRuntime::retry_listing, |runtime| {
                render::listing(&runtime.snapshot())
            })
            .await
        }
        Command::Open(path) => {
            settle_then(runtime, |runtime| runtime.select_file(&path), |runtime| {
                render::content(&runtime.snapshot().content)
            })
            .await
        }
        Command::Debug(request) => {
            settle_then(runtime, |runtime| runtime.request_debug(request), |runtime| {
                render::debug(runtime.session().debug_result())
            })
            .await
        }
        Command::Plan(request) => {
            settle_then(runtime, |runtime| runtime.request_plan(request), |runtime| {
                render::plan(runtime.session().plan_result())
            })
            .await
        }
        Command::Index(path) => {
            if let Err(rejected @ SubmitRejected::Busy(_)) = runtime.trigger_index(&path) {
                return Step::show(render::rejection(&rejected));
            }
            // A blank path is recorded on the panel, so render it either way.
            runtime.settle().await;
            Step::show(render::index(&runtime.snapshot()))
        }
        Command::Stats => {
            settle_then(runtime, AssistantRuntime::refresh_index_stats, |runtime| {
                let snapshot = runtime.snapshot();
                let failure = runtime
                    .index_panel()
                    .stats_outcome()
                    .and_then(RequestOutcome::failure_ref);
                match failure {
                    Some(failure) => format!("Error: {} [{}]", failure.message, failure.kind),
                    None => render::index(&snapshot),
                }
            })
            .await
        }
        Command::Health => {
            let outcome = runtime.check_health().await;
            Step::show(render::health(&outcome))
        }
        Command::Reset => {
            runtime.reset_session();
            Step::show("Conversation cleared.")
        }
        Command::Help => Step::show(HELP),
        Command::Quit => Step {
            output: String::new(),
            quit: true,
        },
        Command::Usage(usage) => Step::show(format!("usage: {usage}")),
        Command::Unknown(name) => Step::show(format!("Unknown command {name}. Type /help.")),
    }
}

async fn settle_then<G, A, V, T>(runtime: &mut AssistantRuntime<G>, action: A, view: V) -> Step
where
    G: ?Sized + Gateway,
    A: FnOnce(&mut AssistantRuntime<G>) -> Result<T, SubmitRejected>,
    V: FnOnce(&AssistantRuntime<G>) -> String,
{
    if let Err(rejected) = action(runtime) {
        return Step::show(render::rejection(&rejected));
    }
    runtime.settle().await;
    Step::show(view(runtime))
}
