//! Shell context and command dispatch.

use strsim::levenshtein;
use tracing::debug;

use crate::api::ApiClient;
use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::prompts::Interaction;
use crate::config::{Config, ConfigManager};
use crate::errors::CliError;
use crate::storage::{JsonStore, LocalTransport};

pub type CommandResult = Result<(), CliError>;

/// Maximum edit distance for a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    /// Script mode when `COMPLIANCE_DESK_CLI_SCRIPT` is set.
    pub fn from_env() -> Self {
        if std::env::var_os("COMPLIANCE_DESK_CLI_SCRIPT").is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

pub struct ShellContext {
    mode: CliMode,
    config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) api: ApiClient<LocalTransport>,
    pub(crate) interaction: Box<dyn Interaction>,
    registry: CommandRegistry,
    running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode, interaction: Box<dyn Interaction>) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?, interaction)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
        interaction: Box<dyn Interaction>,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        apply_output_preferences(&config);
        let store = JsonStore::new(config_manager.data_file(&config));
        let transport = LocalTransport::open(store)?;
        Ok(Self {
            mode,
            config_manager,
            config,
            api: ApiClient::new(transport),
            interaction,
            registry: CommandRegistry::new(commands::all_definitions()),
            running: true,
        })
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn stop(&mut self) {
        self.running = false;
    }

    pub(crate) fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    /// Persists the in-memory config and re-applies output preferences.
    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        apply_output_preferences(&self.config);
        Ok(())
    }

    pub(crate) fn read_command(&mut self) -> Result<Option<String>, CliError> {
        self.interaction.read_command("compliance")
    }

    pub(crate) fn confirm(&mut self, prompt: &str) -> Result<bool, CliError> {
        self.interaction.confirm(prompt)
    }

    /// Runs one command given as already-split tokens.
    pub fn execute(&mut self, tokens: &[&str]) -> CommandResult {
        let Some((raw, args)) = tokens.split_first() else {
            return Ok(());
        };
        let name = raw.to_lowercase();
        let handler = match self.registry.get(&name) {
            Some(definition) => definition.handler,
            None => {
                return Err(CliError::UnknownCommand {
                    command: raw.to_string(),
                    suggestion: self.suggest(raw).map(str::to_string),
                })
            }
        };
        debug!(command = %name, args = args.len(), "dispatching command");
        handler(self, args)
    }

    /// Closest registered command name, if any is close enough.
    pub(crate) fn suggest(&self, input: &str) -> Option<&'static str> {
        let input = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &input), name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }

    /// Prints a command failure without ending the session.
    pub(crate) fn report_error(&self, err: &CliError) {
        output::error(err);
        match err {
            CliError::Usage(_) => output::info("Use `help <command>` for usage details."),
            CliError::UnknownCommand { .. } => {
                output::info("Type `help` to see available commands.")
            }
            _ => {}
        }
    }
}

fn apply_output_preferences(config: &Config) {
    let current = output::preferences();
    output::set_preferences(OutputPreferences {
        color_enabled: config.color_enabled,
        ..current
    });
}
