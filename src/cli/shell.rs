use shell_words::split;
use tracing::info;

use crate::cli::core::{CliMode, ShellContext};
use crate::cli::output;
use crate::cli::prompts::{Interaction, ScriptedInteraction, TerminalInteraction};
use crate::errors::CliError;

/// Runs one command from `args`, or a shell session when `args` is empty.
pub fn run_cli(args: &[String]) -> Result<(), CliError> {
    let mode = CliMode::from_env();
    let interaction: Box<dyn Interaction> = match mode {
        CliMode::Script => Box::new(ScriptedInteraction::stdin()),
        CliMode::Interactive => Box::new(TerminalInteraction::new()),
    };
    let mut context = ShellContext::new(mode, interaction)?;

    if args.is_empty() {
        run_session(&mut context)
    } else {
        let tokens: Vec<&str> = args.iter().map(String::as_str).collect();
        context.execute(&tokens)
    }
}

/// Reads and executes command lines until `exit` or end of input.
/// Command failures are reported and the session continues.
pub fn run_session(context: &mut ShellContext) -> Result<(), CliError> {
    if context.mode() == CliMode::Interactive {
        output::section("Compliance Desk");
        output::info("Type `help` to see available commands, `exit` to leave.");
    }
    while context.is_running() {
        let Some(line) = context.read_command()? else {
            break;
        };
        if let Err(err) = handle_line(context, &line) {
            context.report_error(&err);
        }
    }
    info!("shell session ended");
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    let tokens = parse_command_line(line)?;
    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
    context.execute(&tokens)
}

/// Splits a line with shell quoting rules; `#` starts a comment.
pub(crate) fn parse_command_line(line: &str) -> Result<Vec<String>, CliError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Vec::new());
    }
    Ok(split(trimmed)?)
}
