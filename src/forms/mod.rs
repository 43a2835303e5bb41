//! Multi-step wizard forms: field rules, the navigation engine, an
//! interactive shell, and the client/project/issue form definitions.

pub mod client_form;
pub mod issue_form;
pub mod options;
pub mod project_form;
pub mod record;
pub mod shell;
pub mod validation;
pub mod wizard;

pub use client_form::{ClientField, ClientForm};
pub use issue_form::{IssueField, IssueForm};
pub use options::RecordOptions;
pub use project_form::{ProjectField, ProjectForm};
pub use record::{FormField, FormRecord};
pub use shell::{FieldPrompt, FormResult, FormShell, PromptResponse, StepAction, StepContext, WizardInteraction};
pub use validation::{FieldDescriptor, FieldKind, ValidationError, Validator};
pub use wizard::{FormDefinition, Wizard, WizardState, WizardStep};
