use backend_api::{DebugRequest, PlanRequest};

/// Separates the fields of `/debug` and `/plan` when it stands alone between
/// whitespace, so paths like `std::io::Error` stay intact.
pub const FIELD_SEPARATOR: &str = "::";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Files(Option<String>),
    Retry,
    Open(String),
    Debug(DebugRequest),
    Plan(PlanRequest),
    Index(String),
    Stats,
    Health,
    Reset,
    Help,
    Quit,
    /// A known command with missing arguments; carries its usage line.
    Usage(&'static str),
    Unknown(String),
}

pub const HELP: &str = "\
Type a question to chat, or use a command:
  /files [dir]                          list files (default: last directory)
  /retry                                retry the last listing
  /open <path>                          show a file
  /debug <file> :: <error> [:: <ctx>]   analyze an error
  /plan <goal> [:: <scope>]             plan a change
  /index <path>                         index a repository
  /stats                                show index stats
  /health                               check the backend
  /reset                                clear the conversation
  /help                                 show this help
  /quit                                 exit
Fields are separated by a standalone `::` with spaces around it.";

/// Parses one input line. Returns `None` for a blank line.
pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.starts_with('/') {
        return Some(Command::Ask(trimmed.to_string()));
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    let parsed = match name {
        "/files" => Command::Files(non_empty(rest)),
        "/retry" => Command::Retry,
        "/open" => match non_empty(rest) {
            Some(path) => Command::Open(path),
            None => Command::Usage("/open <path>"),
        },
        "/debug" => parse_debug(rest),
        "/plan" => parse_plan(rest),
        "/index" => match non_empty(rest) {
            Some(path) => Command::Index(path),
            None => Command::Usage("/index <path>"),
        },
        "/stats" => Command::Stats,
        "/health" => Command::Health,
        "/reset" => Command::Reset,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(name.to_string()),
    };

    Some(parsed)
}

fn parse_debug(rest: &str) -> Command {
    let mut fields = split_fields(rest, 3).into_iter();
    let file_path = fields.next().unwrap_or_default();
    let error_message = fields.next().unwrap_or_default();
    if file_path.is_empty() || error_message.is_empty() {
        return Command::Usage("/debug <file> :: <error> [:: <context>]");
    }

    let mut request = DebugRequest::new(file_path, error_message);
    if let Some(context) = fields.next().and_then(non_empty) {
        request = request.with_context(context);
    }
    Command::Debug(request)
}

fn parse_plan(rest: &str) -> Command {
    let mut fields = split_fields(rest, 2).into_iter();
    let goal = fields.next().unwrap_or_default();
    if goal.is_empty() {
        return Command::Usage("/plan <goal> [:: <scope>]");
    }

    let mut request = PlanRequest::new(goal);
    if let Some(scope) = fields.next().and_then(non_empty) {
        request = request.with_scope(scope);
    }
    Command::Plan(request)
}

/// Splits on separators that are whitespace-delimited tokens, returning at
/// most `limit` trimmed fields.
fn split_fields(input: &str, limit: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(limit);
    let mut start = 0;
    for (at, separator) in input.match_indices(FIELD_SEPARATOR) {
        if fields.len() + 1 == limit {
            break;
        }
        let end = at + separator.len();
        let before = input[..at].chars().next_back();
        let after = input[end..].chars().next();
        if before.map_or(true, char::is_whitespace) && after.map_or(true, char::is_whitespace) {
            fields.push(input[start..at].trim());
            start = end;
        }
    }
    fields.push(input[start..].trim());
    fields
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
