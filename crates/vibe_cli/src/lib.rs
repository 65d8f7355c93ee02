//! Line-oriented shell over the assistant runtime.

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod shell;

pub use commands::{parse_command, Command};
pub use config::ShellConfig;
pub use shell::{run_command, Step};
