use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::errors::CliError;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let lines = build_info::current().describe();
    if let Some((headline, details)) = lines.split_first() {
        println!("{headline}");
        for line in details {
            output::info(line);
        }
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        help::print_overview(context.registry());
        return Ok(());
    };
    match context.command(&raw.to_lowercase()) {
        Some(command) => {
            help::print_command(command);
            Ok(())
        }
        None => Err(CliError::UnknownCommand {
            command: raw.to_string(),
            suggestion: context.suggest(raw).map(str::to_string),
        }),
    }
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.stop();
    Ok(())
}
