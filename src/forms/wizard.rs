//! Multi-step wizard engine.
//!
//! A wizard splits one [`FormRecord`] across an ordered list of
//! [`WizardStep`]s. Moving backwards (or staying put) is always allowed;
//! moving forwards validates the step currently occupied and is refused only
//! when that step is required and invalid. Submission happens from the
//! terminal step and hands an assembled payload to a
//! [`SubmitCollaborator`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::api::SubmitCollaborator;
use crate::errors::{FieldIssue, FormError};

use super::record::{FormField, FormRecord};
use super::validation::{FieldDescriptor, ValidationError};

/// Static description of one wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardStep<F: FormField> {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [F],
    pub is_required: bool,
    /// Display only, e.g. "2 min".
    pub estimated_time: &'static str,
}

/// Form contract implemented by the client, project, and issue wizards.
///
/// Implementations describe their steps and per-field rules, optionally
/// supply defaults (when editing an existing record), and turn the collected
/// record into the payload the backend expects.
pub trait FormDefinition {
    type Field: FormField;
    type Output;

    fn name(&self) -> &'static str;

    /// Ordered steps; fixed for the lifetime of the form.
    fn steps(&self) -> &[WizardStep<Self::Field>];

    /// Validation rule for a field.
    fn field(&self, field: Self::Field) -> FieldDescriptor;

    /// Values used to pre-populate the session.
    fn defaults(&self) -> FormRecord<Self::Field> {
        FormRecord::new()
    }

    /// When `true`, submit re-validates every required step, not only the
    /// terminal one.
    fn requires_full_validation(&self) -> bool {
        true
    }

    /// Builds the submit payload from a validated snapshot of the record.
    fn assemble(&self, record: &FormRecord<Self::Field>) -> Result<Self::Output, FormError>;
}

/// Navigation and validation bookkeeping for a wizard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    current_step_index: usize,
    completed_steps: BTreeSet<usize>,
    step_validity: Vec<Option<bool>>,
}

impl WizardState {
    fn new(step_count: usize) -> Self {
        Self {
            current_step_index: 0,
            completed_steps: BTreeSet::new(),
            step_validity: vec![None; step_count],
        }
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn completed_steps(&self) -> &BTreeSet<usize> {
        &self.completed_steps
    }

    /// Result of the last validation attempt for `index`, if any.
    pub fn step_validity(&self, index: usize) -> Option<bool> {
        self.step_validity.get(index).copied().flatten()
    }
}

/// A running wizard session owning its record and navigation state.
pub struct Wizard<D: FormDefinition> {
    definition: D,
    record: FormRecord<D::Field>,
    state: WizardState,
    field_errors: BTreeMap<D::Field, ValidationError>,
    submitted: bool,
}

impl<D: FormDefinition> Wizard<D> {
    pub fn new(definition: D) -> Result<Self, FormError> {
        let step_count = definition.steps().len();
        if step_count == 0 {
            return Err(FormError::NoSteps(definition.name()));
        }
        let record = definition.defaults();
        Ok(Self {
            definition,
            record,
            state: WizardState::new(step_count),
            field_errors: BTreeMap::new(),
            submitted: false,
        })
    }

    pub fn definition(&self) -> &D {
        &self.definition
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn record(&self) -> &FormRecord<D::Field> {
        &self.record
    }

    pub fn steps(&self) -> &[WizardStep<D::Field>] {
        self.definition.steps()
    }

    pub fn step_count(&self) -> usize {
        self.steps().len()
    }

    pub fn current_step_index(&self) -> usize {
        self.state.current_step_index
    }

    pub fn current_step(&self) -> &WizardStep<D::Field> {
        &self.steps()[self.state.current_step_index]
    }

    pub fn is_last_step(&self) -> bool {
        self.state.current_step_index + 1 == self.step_count()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Display-only completion percentage of the current position.
    pub fn progress(&self) -> f64 {
        (self.state.current_step_index + 1) as f64 / self.step_count() as f64 * 100.0
    }

    pub fn value(&self, field: D::Field) -> Option<&str> {
        self.record.get(field)
    }

    pub fn field_error(&self, field: D::Field) -> Option<&ValidationError> {
        self.field_errors.get(&field)
    }

    /// Fields of the current step paired with their rules, in step order.
    pub fn current_fields(&self) -> Vec<(D::Field, FieldDescriptor)> {
        self.current_step()
            .fields
            .iter()
            .map(|field| (*field, self.definition.field(*field)))
            .collect()
    }

    /// Stores a raw value. Validation is deferred to [`Wizard::validate_step`].
    pub fn set_value(&mut self, field: D::Field, raw: impl Into<String>) -> Result<(), FormError> {
        self.ensure_active()?;
        self.record.set(field, raw);
        self.field_errors.remove(&field);
        Ok(())
    }

    /// Validates exactly the fields owned by step `index`.
    ///
    /// Records the outcome in the step validity map and the completed set and
    /// keeps per-field messages for inline display. Never moves the cursor.
    pub fn validate_step(&mut self, index: usize) -> Result<(), FormError> {
        self.ensure_active()?;
        let step = *self.step_at(index)?;
        let mut issues = Vec::new();

        for &field in step.fields {
            let descriptor = self.definition.field(field);
            match descriptor.check(self.record.get(field)) {
                Ok(normalized) if normalized.is_empty() => {
                    self.record.clear(field);
                    self.field_errors.remove(&field);
                }
                Ok(normalized) => {
                    self.record.set(field, normalized);
                    self.field_errors.remove(&field);
                }
                Err(err) => {
                    issues.push(FieldIssue {
                        key: field.key(),
                        label: descriptor.label,
                        message: err.message.clone(),
                    });
                    self.field_errors.insert(field, err);
                }
            }
        }

        let valid = issues.is_empty();
        self.state.step_validity[index] = Some(valid);
        if valid {
            self.state.completed_steps.insert(index);
        } else {
            self.state.completed_steps.remove(&index);
        }
        debug!(
            form = self.definition.name(),
            step = step.id,
            valid,
            "validated wizard step"
        );

        if valid {
            Ok(())
        } else {
            Err(FormError::StepIncomplete {
                index,
                step: step.title,
                fields: issues,
            })
        }
    }

    /// Moves to `target`, validating the current step when moving forward.
    pub fn go_to_step(&mut self, target: usize) -> Result<(), FormError> {
        self.ensure_active()?;
        self.step_at(target)?;
        let current = self.state.current_step_index;

        if target > current {
            let required = self.steps()[current].is_required;
            match self.validate_step(current) {
                Ok(()) => {}
                Err(err) if required => {
                    warn!(
                        form = self.definition.name(),
                        from = current,
                        to = target,
                        "forward navigation refused"
                    );
                    return Err(err);
                }
                Err(_) => {
                    debug!(
                        form = self.definition.name(),
                        step = current,
                        "leaving optional step with validation errors"
                    );
                }
            }
        }

        self.state.current_step_index = target;
        Ok(())
    }

    pub fn next(&mut self) -> Result<(), FormError> {
        let last = self.step_count() - 1;
        let target = (self.state.current_step_index + 1).min(last);
        self.go_to_step(target)
    }

    pub fn previous(&mut self) -> Result<(), FormError> {
        self.go_to_step(self.state.current_step_index.saturating_sub(1))
    }

    /// Validates, assembles, and hands the payload to `collaborator`.
    ///
    /// On failure the session is left exactly where it was so the user can
    /// correct the data and retry.
    pub fn submit<C>(&mut self, collaborator: &mut C) -> Result<C::Response, FormError>
    where
        C: SubmitCollaborator<D::Output>,
    {
        self.ensure_active()?;
        if !self.is_last_step() {
            return Err(FormError::NotAtFinalStep);
        }

        let last = self.step_count() - 1;
        self.validate_step(last)?;
        if self.definition.requires_full_validation() {
            let required: Vec<usize> = self
                .steps()
                .iter()
                .enumerate()
                .filter(|(index, step)| *index != last && step.is_required)
                .map(|(index, _)| index)
                .collect();
            for index in required {
                self.validate_step(index)?;
            }
        }

        let snapshot = self.record.clone();
        let payload = self.definition.assemble(&snapshot)?;
        match collaborator.submit(&payload) {
            Ok(response) => {
                self.submitted = true;
                info!(form = self.definition.name(), "form submitted");
                Ok(response)
            }
            Err(err) => {
                warn!(form = self.definition.name(), error = %err, "form submission failed");
                Err(FormError::Submission(err))
            }
        }
    }

    fn step_at(&self, index: usize) -> Result<&WizardStep<D::Field>, FormError> {
        let total = self.step_count();
        self.steps()
            .get(index)
            .ok_or(FormError::StepOutOfRange { index, total })
    }

    fn ensure_active(&self) -> Result<(), FormError> {
        if self.submitted {
            Err(FormError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }
}
