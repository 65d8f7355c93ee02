use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "VIBE_LOG";
const FALLBACK_ENV_VAR: &str = "RUST_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Installs the global subscriber, writing to stderr so the transcript on
/// stdout stays clean.
pub fn init() {
    let directive = filter_directive(
        std::env::var(LOG_ENV_VAR).ok(),
        std::env::var(FALLBACK_ENV_VAR).ok(),
    );
    let filter = match EnvFilter::try_new(&directive) {
        Ok(filter) => filter,
        Err(error) => {
            eprintln!(
                "WARN: log filter '{directive}' is invalid ({error}); falling back to '{DEFAULT_DIRECTIVE}'"
            );
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn filter_directive(primary: Option<String>, fallback: Option<String>) -> String {
    [primary, fallback]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}
