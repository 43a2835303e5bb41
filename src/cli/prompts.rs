//! Front ends for the shell and the entity wizards.
//!
//! [`TerminalInteraction`] drives dialoguer prompts. [`ScriptedInteraction`]
//! consumes one stdin line per prompt so whole sessions can be piped in.

use std::io::{self, BufRead};

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::cli::output;
use crate::errors::CliError;
use crate::forms::{
    FieldKind, FieldPrompt, PromptResponse, StepAction, StepContext, WizardInteraction,
};

const BACK_LABEL: &str = "← Back";

/// Everything the shell needs from a user: commands, wizard answers and
/// confirmations.
pub trait Interaction: WizardInteraction {
    /// Next command line; `None` ends the session.
    fn read_command(&mut self, prompt: &str) -> Result<Option<String>, CliError>;

    fn confirm(&mut self, prompt: &str) -> Result<bool, CliError>;
}

/// Header printed once when a step is entered.
fn step_banner(step: &StepContext) -> String {
    format!(
        "{} · Step {} of {}: {} ({:.0}%)",
        step.form,
        step.index + 1,
        step.total,
        step.title,
        step.progress * 100.0
    )
}

fn field_label(field: &FieldPrompt<'_>) -> String {
    if field.descriptor.required {
        field.descriptor.label.to_string()
    } else {
        format!("{} (optional)", field.descriptor.label)
    }
}

pub struct TerminalInteraction {
    theme: ColorfulTheme,
    shown_step: Option<usize>,
}

impl TerminalInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            shown_step: None,
        }
    }

    fn announce(&mut self, step: &StepContext) {
        if self.shown_step != Some(step.index) {
            output::section(step_banner(step));
            if !step.description.is_empty() {
                output::info(format!("{} (about {})", step.description, step.estimated_time));
            }
            self.shown_step = Some(step.index);
        }
    }

    fn select_choice(&self, field: &FieldPrompt<'_>, options: &[String]) -> PromptResponse {
        let mut items: Vec<&str> = options.iter().map(String::as_str).collect();
        items.push(BACK_LABEL);
        let default = field
            .current
            .and_then(|current| options.iter().position(|option| option == current))
            .unwrap_or(0);
        let picked = Select::with_theme(&self.theme)
            .with_prompt(field_label(field))
            .items(&items)
            .default(default)
            .interact_opt();
        match picked {
            Ok(Some(index)) if index < options.len() => {
                PromptResponse::Value(options[index].clone())
            }
            Ok(Some(_)) => PromptResponse::Back,
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }

    fn input_text(&self, field: &FieldPrompt<'_>) -> PromptResponse {
        let mut input = Input::<String>::with_theme(&self.theme);
        input = input
            .with_prompt(format!("{} [:back :help :cancel]", field_label(field)))
            .allow_empty(true);
        if let Some(current) = field.current.filter(|current| !current.is_empty()) {
            input = input.with_initial_text(current);
        }
        match input.interact_text() {
            Ok(text) => interpret_text(&text, field.current),
            Err(_) => PromptResponse::Cancel,
        }
    }
}

impl Default for TerminalInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardInteraction for TerminalInteraction {
    fn prompt_field(&mut self, step: &StepContext, field: &FieldPrompt<'_>) -> PromptResponse {
        self.announce(step);
        if let Some(error) = field.error {
            output::warning(error);
        }
        match &field.descriptor.kind {
            FieldKind::Choice(options) => self.select_choice(field, options),
            _ => self.input_text(field),
        }
    }

    fn choose_action(&mut self, step: &StepContext) -> StepAction {
        let mut actions = Vec::new();
        if step.is_last {
            actions.push(("Submit", StepAction::Submit));
        } else {
            actions.push(("Next step", StepAction::Next));
        }
        if step.index > 0 {
            actions.push(("Previous step", StepAction::Back));
        }
        actions.push(("Cancel", StepAction::Cancel));

        let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();
        let picked = Select::with_theme(&self.theme)
            .with_prompt("Continue")
            .items(&labels)
            .default(0)
            .interact_opt();
        let action = match picked {
            Ok(Some(index)) => actions[index].1,
            Ok(None) | Err(_) => StepAction::Cancel,
        };
        // Revisited steps announce themselves again.
        self.shown_step = None;
        action
    }

    fn report(&mut self, message: &str) {
        output::warning(message);
    }
}

impl Interaction for TerminalInteraction {
    fn read_command(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        let line = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(line))
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, CliError> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}

/// Line-per-prompt driver over any reader.
///
/// Field prompts: an empty line keeps the current value, `:back`, `:help`,
/// `:cancel` navigate, `:clear` empties the field, anything else is the new
/// value. Step actions: `next`, `back`, `submit`, `cancel`, `goto N`
/// (1-based). End of input cancels.
pub struct ScriptedInteraction<R: BufRead> {
    lines: io::Lines<R>,
}

impl ScriptedInteraction<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> ScriptedInteraction<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    fn next_line(&mut self) -> Option<String> {
        match self.lines.next() {
            Some(Ok(line)) => Some(line),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "failed to read script input");
                None
            }
            None => None,
        }
    }
}

impl<R: BufRead> WizardInteraction for ScriptedInteraction<R> {
    fn prompt_field(&mut self, _step: &StepContext, field: &FieldPrompt<'_>) -> PromptResponse {
        if let Some(error) = field.error {
            output::warning(error);
        }
        match self.next_line() {
            Some(line) => interpret_text(&line, field.current),
            None => PromptResponse::Cancel,
        }
    }

    fn choose_action(&mut self, step: &StepContext) -> StepAction {
        while let Some(line) = self.next_line() {
            match parse_action(&line) {
                Some(action) => return action,
                None => output::warning(format!(
                    "Unknown step action `{}` on {} (use next, back, submit, cancel or goto N)",
                    line.trim(),
                    step.title
                )),
            }
        }
        StepAction::Cancel
    }

    fn report(&mut self, message: &str) {
        output::warning(message);
    }
}

impl<R: BufRead> Interaction for ScriptedInteraction<R> {
    fn read_command(&mut self, _prompt: &str) -> Result<Option<String>, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Some(line?)),
            None => Ok(None),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, CliError> {
        let answer = self.next_line().unwrap_or_default();
        let confirmed = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
        if !confirmed {
            output::info(format!("{prompt} Not confirmed."));
        }
        Ok(confirmed)
    }
}

fn interpret_text(text: &str, current: Option<&str>) -> PromptResponse {
    match text.trim() {
        ":back" => PromptResponse::Back,
        ":help" => PromptResponse::Help,
        ":cancel" => PromptResponse::Cancel,
        ":clear" => PromptResponse::Value(String::new()),
        "" => PromptResponse::Keep,
        _ if current == Some(text) => PromptResponse::Keep,
        _ => PromptResponse::Value(text.to_string()),
    }
}

fn parse_action(line: &str) -> Option<StepAction> {
    let mut words = line.split_whitespace();
    let action = match words.next()?.to_ascii_lowercase().as_str() {
        "next" | "n" => StepAction::Next,
        "back" | "b" => StepAction::Back,
        "submit" | "s" => StepAction::Submit,
        "cancel" | "q" => StepAction::Cancel,
        "goto" => {
            let step: usize = words.next()?.parse().ok()?;
            StepAction::Jump(step.checked_sub(1)?)
        }
        _ => return None,
    };
    Some(action)
}
