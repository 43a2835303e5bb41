pub mod config;
pub mod listing;
pub mod records;
pub mod system;

use std::fmt;

use tracing::warn;

use crate::cli::core::{CommandResult, ShellContext};

/// Headings the help overview sorts commands under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Listings,
    Records,
    Settings,
    Shell,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 4] = [
        CommandGroup::Listings,
        CommandGroup::Records,
        CommandGroup::Settings,
        CommandGroup::Shell,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Listings => "Listings",
            CommandGroup::Records => "Records",
            CommandGroup::Settings => "Settings",
            CommandGroup::Shell => "Shell",
        }
    }
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let groups = [
        (CommandGroup::Listings, listing::definitions()),
        (CommandGroup::Records, records::definitions()),
        (CommandGroup::Settings, config::definitions()),
        (CommandGroup::Shell, system::definitions()),
    ];
    groups
        .into_iter()
        .flat_map(|(group, definitions)| {
            definitions
                .into_iter()
                .map(move |definition| definition.in_group(group))
        })
        .collect()
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub group: CommandGroup,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    /// A shell-level command; [`all_definitions`] files it under its
    /// module's group.
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            group: CommandGroup::Shell,
            handler,
        }
    }

    pub fn in_group(mut self, group: CommandGroup) -> Self {
        self.group = group;
        self
    }
}

/// Commands in declaration order. Names are unique; a later definition
/// reusing a name is dropped.
pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands: Vec<CommandDefinition> = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if commands.iter().any(|known| known.name == definition.name) {
                warn!(command = definition.name, "duplicate command definition ignored");
                continue;
            }
            commands.push(definition);
        }
        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.iter().find(|command| command.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|command| command.name)
    }

    /// Non-empty groups in [`CommandGroup::ALL`] order, each with its
    /// commands in declaration order.
    pub fn grouped(&self) -> Vec<(CommandGroup, Vec<&CommandDefinition>)> {
        CommandGroup::ALL
            .into_iter()
            .map(|group| {
                let members: Vec<&CommandDefinition> =
                    self.iter().filter(|command| command.group == group).collect();
                (group, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }
}
