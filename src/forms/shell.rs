//! Interactive driver for a [`Wizard`].
//!
//! The shell walks the current step's fields through a [`WizardInteraction`],
//! then asks for a navigation action. Recoverable failures (a blocked
//! step, a rejected submission) are reported and the loop continues with the
//! session untouched.

use tracing::debug;

use crate::api::SubmitCollaborator;
use crate::errors::FormError;

use super::record::FormField;
use super::validation::FieldDescriptor;
use super::wizard::{FormDefinition, Wizard};

/// High-level outcome of an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Answer to a single field prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value.
    Value(String),
    /// Keep the current value.
    Keep,
    /// Return to the previous field (or step).
    Back,
    /// Show the field help, then ask again.
    Help,
    /// Abandon the whole form.
    Cancel,
}

/// Navigation chosen once a step's fields have been visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Next,
    Back,
    Jump(usize),
    Submit,
    Cancel,
}

/// Where the session stands, for headers and progress bars.
#[derive(Debug, Clone)]
pub struct StepContext {
    pub form: &'static str,
    pub index: usize,
    pub total: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub estimated_time: &'static str,
    pub progress: f64,
    pub is_last: bool,
}

/// One field as presented to the user.
#[derive(Debug, Clone)]
pub struct FieldPrompt<'a> {
    pub key: &'static str,
    pub descriptor: &'a FieldDescriptor,
    pub current: Option<&'a str>,
    pub error: Option<&'a str>,
}

/// Front end used by [`FormShell`]: a terminal in the binary, a scripted
/// double in tests.
pub trait WizardInteraction {
    fn prompt_field(&mut self, step: &StepContext, field: &FieldPrompt<'_>) -> PromptResponse;

    fn choose_action(&mut self, step: &StepContext) -> StepAction;

    /// Shows a recoverable problem (validation summary, rejected submit).
    fn report(&mut self, message: &str);
}

/// Runs a wizard to completion or cancellation.
pub struct FormShell<'w, D: FormDefinition> {
    wizard: &'w mut Wizard<D>,
}

impl<'w, D: FormDefinition> FormShell<'w, D> {
    pub fn new(wizard: &'w mut Wizard<D>) -> Self {
        Self { wizard }
    }

    pub fn run<C, I>(
        &mut self,
        collaborator: &mut C,
        interaction: &mut I,
    ) -> Result<FormResult<C::Response>, FormError>
    where
        C: SubmitCollaborator<D::Output>,
        I: WizardInteraction + ?Sized,
    {
        loop {
            let context = self.context();
            match self.visit_fields(&context, interaction)? {
                Visit::Cancelled => return Ok(FormResult::Cancelled),
                Visit::SteppedBack => continue,
                Visit::Done => {}
            }

            let outcome = match interaction.choose_action(&context) {
                StepAction::Cancel => return Ok(FormResult::Cancelled),
                StepAction::Next => self.wizard.next(),
                StepAction::Back => self.wizard.previous(),
                StepAction::Jump(target) => self.wizard.go_to_step(target),
                StepAction::Submit => match self.wizard.submit(collaborator) {
                    Ok(response) => return Ok(FormResult::Completed(response)),
                    Err(err) => Err(err),
                },
            };

            if let Err(err) = outcome {
                self.recover(err, interaction)?;
            }
        }
    }

    fn context(&self) -> StepContext {
        let step = self.wizard.current_step();
        StepContext {
            form: self.wizard.definition().name(),
            index: self.wizard.current_step_index(),
            total: self.wizard.step_count(),
            title: step.title,
            description: step.description,
            estimated_time: step.estimated_time,
            progress: self.wizard.progress(),
            is_last: self.wizard.is_last_step(),
        }
    }

    fn visit_fields<I: WizardInteraction + ?Sized>(
        &mut self,
        context: &StepContext,
        interaction: &mut I,
    ) -> Result<Visit, FormError> {
        let fields = self.wizard.current_fields();
        let mut position = 0;
        while let Some((field, descriptor)) = fields.get(position) {
            let error = self.wizard.field_error(*field).map(|err| err.message.clone());
            let prompt = FieldPrompt {
                key: field.key(),
                descriptor,
                current: self.wizard.value(*field),
                error: error.as_deref(),
            };
            match interaction.prompt_field(context, &prompt) {
                PromptResponse::Value(value) => {
                    self.wizard.set_value(*field, value)?;
                    position += 1;
                }
                PromptResponse::Keep => position += 1,
                PromptResponse::Help => {
                    let help = descriptor.help.unwrap_or("No additional help for this field.");
                    interaction.report(help);
                }
                PromptResponse::Back if position > 0 => position -= 1,
                PromptResponse::Back => {
                    if context.index > 0 {
                        self.wizard.previous()?;
                        return Ok(Visit::SteppedBack);
                    }
                }
                PromptResponse::Cancel => {
                    debug!(form = context.form, step = context.index, "form cancelled");
                    return Ok(Visit::Cancelled);
                }
            }
        }
        Ok(Visit::Done)
    }

    /// Reports recoverable errors; anything else ends the session.
    fn recover<I: WizardInteraction + ?Sized>(
        &mut self,
        err: FormError,
        interaction: &mut I,
    ) -> Result<(), FormError> {
        match err {
            FormError::StepIncomplete { index, ref fields, .. } => {
                let mut message = err.to_string();
                for issue in fields {
                    message.push_str(&format!("\n  - {}: {}", issue.label, issue.message));
                }
                interaction.report(&message);
                if index < self.wizard.current_step_index() {
                    self.wizard.go_to_step(index)?;
                }
                Ok(())
            }
            FormError::StepOutOfRange { .. } | FormError::NotAtFinalStep | FormError::Submission(_) => {
                interaction.report(&err.to_string());
                Ok(())
            }
            other => Err(other),
        }
    }
}

enum Visit {
    Done,
    SteppedBack,
    Cancelled,
}
