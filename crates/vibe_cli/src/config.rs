pub const DEFAULT_DIRECTORY_ENV_VAR: &str = "VIBE_DEFAULT_DIRECTORY";
pub const DEFAULT_DIRECTORY: &str = ".";

/// Shell settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Directory listed when the shell starts and when `/files` has no argument
    /// and nothing was listed yet.
    pub default_directory: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            default_directory: DEFAULT_DIRECTORY.to_string(),
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        let default_directory = std::env::var(DEFAULT_DIRECTORY_ENV_VAR)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_DIRECTORY.to_string());
        Self { default_directory }
    }
}
