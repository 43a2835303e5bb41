use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::output;

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for (group, commands) in registry.grouped() {
        println!("{group}");
        for entry in commands {
            println!("  {:<12} {}", entry.name, entry.description);
        }
    }
    println!("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandDefinition) {
    output::section(format!("Help: {}", entry.name));
    println!("  Group: {}", entry.group);
    println!("  Description: {}", entry.description);
    println!("  Usage: {}", entry.usage);
}
