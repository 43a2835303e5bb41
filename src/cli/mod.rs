//! Terminal front end: command shell, listing tables, and wizard prompts.

pub mod commands;
pub mod core;
pub mod help;
pub mod output;
pub mod prompts;
mod shell;
pub mod table;
pub mod views;

pub use self::core::{CliMode, ShellContext};
pub use shell::{run_cli, run_session};
