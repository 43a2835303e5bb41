use chrono::NaiveDate;
use uuid::Uuid;

use crate::api::Mutation;
use crate::domain::{Client, Priority, Project, ProjectDraft, ProjectStatus, WcagLevel};
use crate::errors::FormError;

use super::options::RecordOptions;
use super::record::{FormField, FormRecord};
use super::validation::{FieldDescriptor, FieldKind, Validator};
use super::wizard::{FormDefinition, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectField {
    Client,
    Name,
    Description,
    Status,
    Priority,
    WcagLevel,
    Progress,
    StartDate,
    Deadline,
    Budget,
}

impl FormField for ProjectField {
    const ALL: &'static [Self] = &[
        ProjectField::Client,
        ProjectField::Name,
        ProjectField::Description,
        ProjectField::Status,
        ProjectField::Priority,
        ProjectField::WcagLevel,
        ProjectField::Progress,
        ProjectField::StartDate,
        ProjectField::Deadline,
        ProjectField::Budget,
    ];

    fn key(self) -> &'static str {
        match self {
            ProjectField::Client => "clientId",
            ProjectField::Name => "name",
            ProjectField::Description => "description",
            ProjectField::Status => "status",
            ProjectField::Priority => "priority",
            ProjectField::WcagLevel => "wcagLevel",
            ProjectField::Progress => "progress",
            ProjectField::StartDate => "startDate",
            ProjectField::Deadline => "deadline",
            ProjectField::Budget => "budget",
        }
    }
}

const STEPS: [WizardStep<ProjectField>; 3] = [
    WizardStep {
        id: "basics",
        title: "Project basics",
        description: "Which client the work is for and what it covers.",
        fields: &[
            ProjectField::Client,
            ProjectField::Name,
            ProjectField::Description,
        ],
        is_required: true,
        estimated_time: "1 min",
    },
    WizardStep {
        id: "scope",
        title: "Scope and status",
        description: "Conformance level, priority and current progress.",
        fields: &[
            ProjectField::Status,
            ProjectField::Priority,
            ProjectField::WcagLevel,
            ProjectField::Progress,
        ],
        is_required: true,
        estimated_time: "1 min",
    },
    WizardStep {
        id: "schedule",
        title: "Schedule and budget",
        description: "Optional dates and budget.",
        fields: &[
            ProjectField::StartDate,
            ProjectField::Deadline,
            ProjectField::Budget,
        ],
        is_required: false,
        estimated_time: "1 min",
    },
];

/// Wizard for projects. The client step offers the companies known at
/// construction time.
#[derive(Debug, Clone)]
pub struct ProjectForm {
    target: Option<Uuid>,
    clients: RecordOptions,
    defaults: FormRecord<ProjectField>,
}

impl ProjectForm {
    pub fn create(clients: &[Client]) -> Self {
        let defaults = FormRecord::from_pairs([
            (ProjectField::Status, ProjectStatus::Planning.label().to_string()),
            (ProjectField::Priority, Priority::Medium.label().to_string()),
            (ProjectField::WcagLevel, WcagLevel::AA.label().to_string()),
            (ProjectField::Progress, "0".to_string()),
        ]);
        Self {
            target: None,
            clients: client_options(clients),
            defaults,
        }
    }

    pub fn edit(project: &Project, clients: &[Client]) -> Self {
        let clients = client_options(clients);
        let mut pairs = vec![
            (ProjectField::Name, project.name.clone()),
            (ProjectField::Description, project.description.clone()),
            (ProjectField::Status, project.status.label().to_string()),
            (ProjectField::Priority, project.priority.label().to_string()),
            (ProjectField::WcagLevel, project.wcag_level.label().to_string()),
            (ProjectField::Progress, project.progress.to_string()),
        ];
        if let Some(label) = clients.label_for(project.client_id) {
            pairs.push((ProjectField::Client, label.to_string()));
        }
        pairs.extend(project.start_date.map(|date| (ProjectField::StartDate, date.to_string())));
        pairs.extend(project.deadline.map(|date| (ProjectField::Deadline, date.to_string())));
        pairs.extend(project.budget.map(|budget| (ProjectField::Budget, budget.to_string())));
        Self {
            target: Some(project.id),
            clients,
            defaults: FormRecord::from_pairs(pairs),
        }
    }

    fn client_id(&self, label: &str) -> Result<Uuid, FormError> {
        self.clients
            .resolve(label)
            .ok_or_else(|| FormError::Assembly(format!("Unknown client `{label}`")))
    }
}

fn client_options(clients: &[Client]) -> RecordOptions {
    RecordOptions::new(clients.iter().map(|client| (client.company.as_str(), client.id)))
}

impl FormDefinition for ProjectForm {
    type Field = ProjectField;
    type Output = Mutation<ProjectDraft>;

    fn name(&self) -> &'static str {
        "project"
    }

    fn steps(&self) -> &[WizardStep<ProjectField>] {
        &STEPS
    }

    fn field(&self, field: ProjectField) -> FieldDescriptor {
        match field {
            ProjectField::Client => FieldDescriptor::choice(
                "Client",
                self.clients.labels(),
            ),
            ProjectField::Name => {
                FieldDescriptor::new("Project name", FieldKind::Text, Validator::MaxLength(120))
            }
            ProjectField::Description => {
                FieldDescriptor::new("Description", FieldKind::LongText, Validator::MaxLength(2000))
                    .with_optional()
            }
            ProjectField::Status => FieldDescriptor::choice("Status", ProjectStatus::labels()),
            ProjectField::Priority => FieldDescriptor::choice("Priority", Priority::labels()),
            ProjectField::WcagLevel => FieldDescriptor::choice("WCAG level", WcagLevel::labels()),
            ProjectField::Progress => {
                FieldDescriptor::new("Progress (%)", FieldKind::Integer, Validator::Percentage)
            }
            ProjectField::StartDate => {
                FieldDescriptor::new("Start date", FieldKind::Date, Validator::Date).with_optional()
            }
            ProjectField::Deadline => FieldDescriptor::new("Deadline", FieldKind::Date, Validator::Date)
                .with_optional()
                .with_help("Projects past their deadline show as overdue on the dashboard."),
            ProjectField::Budget => {
                FieldDescriptor::new("Budget", FieldKind::Decimal, Validator::NonNegativeDecimal)
                    .with_optional()
            }
        }
    }

    fn defaults(&self) -> FormRecord<ProjectField> {
        self.defaults.clone()
    }

    fn assemble(&self, record: &FormRecord<ProjectField>) -> Result<Mutation<ProjectDraft>, FormError> {
        let start_date: Option<NaiveDate> = record.parse_optional(ProjectField::StartDate)?;
        let deadline: Option<NaiveDate> = record.parse_optional(ProjectField::Deadline)?;
        let draft = ProjectDraft {
            client_id: self.client_id(record.require(ProjectField::Client)?)?,
            name: record.require(ProjectField::Name)?.to_string(),
            description: record.optional(ProjectField::Description).unwrap_or_default(),
            status: record.parse(ProjectField::Status)?,
            priority: record.parse(ProjectField::Priority)?,
            wcag_level: record.parse(ProjectField::WcagLevel)?,
            start_date,
            deadline,
            budget: record.parse_optional(ProjectField::Budget)?,
            progress: record.parse(ProjectField::Progress)?,
        };
        Ok(match self.target {
            Some(id) => Mutation::update(id, draft),
            None => Mutation::create(draft),
        })
    }
}
