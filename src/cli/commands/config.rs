use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};
use crate::errors::CliError;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 2 {
                return Err(CliError::Usage(
                    "usage: config set <data_file|page_size|color_enabled|locale|default_sort.<listing>> <value>"
                        .into(),
                ));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            context.config.set(key, &value)?;
            context.persist_config()?;
            output::success(format!("Set {key} = {}", value.trim()));
            Ok(())
        }
        other => Err(CliError::Usage(format!(
            "unknown config action `{other}` (expected show or set)"
        ))),
    }
}

fn show_config(context: &mut ShellContext) -> CommandResult {
    output::section("Configuration");
    let mut table = Table::new(vec![TableColumn::left("Setting"), TableColumn::left("Value")]);
    for (key, value) in context.config.entries() {
        table.push_row(vec![key, value]);
    }
    println!("{}", table.render());
    output::info(format!(
        "Config file: {}",
        context.config_manager().path().display()
    ));
    output::info(format!(
        "Data file: {}",
        context.config_manager().data_file(&context.config).display()
    ));
    Ok(())
}
