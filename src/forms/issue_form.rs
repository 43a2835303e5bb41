use uuid::Uuid;

use crate::api::Mutation;
use crate::domain::{Issue, IssueDraft, IssueStatus, Project, Severity, WcagLevel};
use crate::errors::FormError;

use super::options::RecordOptions;
use super::record::{FormField, FormRecord};
use super::validation::{FieldDescriptor, FieldKind, Validator};
use super::wizard::{FormDefinition, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueField {
    Project,
    Title,
    Description,
    Criterion,
    WcagLevel,
    Severity,
    Status,
    PageUrl,
    Assignee,
    DueDate,
}

impl FormField for IssueField {
    const ALL: &'static [Self] = &[
        IssueField::Project,
        IssueField::Title,
        IssueField::Description,
        IssueField::Criterion,
        IssueField::WcagLevel,
        IssueField::Severity,
        IssueField::Status,
        IssueField::PageUrl,
        IssueField::Assignee,
        IssueField::DueDate,
    ];

    fn key(self) -> &'static str {
        match self {
            IssueField::Project => "projectId",
            IssueField::Title => "title",
            IssueField::Description => "description",
            IssueField::Criterion => "criterion",
            IssueField::WcagLevel => "wcagLevel",
            IssueField::Severity => "severity",
            IssueField::Status => "status",
            IssueField::PageUrl => "pageUrl",
            IssueField::Assignee => "assignee",
            IssueField::DueDate => "dueDate",
        }
    }
}

const STEPS: [WizardStep<IssueField>; 3] = [
    WizardStep {
        id: "details",
        title: "Issue details",
        description: "What is broken and in which project.",
        fields: &[IssueField::Project, IssueField::Title, IssueField::Description],
        is_required: true,
        estimated_time: "1 min",
    },
    WizardStep {
        id: "classification",
        title: "WCAG classification",
        description: "Success criterion, level and impact.",
        fields: &[
            IssueField::Criterion,
            IssueField::WcagLevel,
            IssueField::Severity,
            IssueField::Status,
        ],
        is_required: true,
        estimated_time: "1 min",
    },
    WizardStep {
        id: "tracking",
        title: "Tracking",
        description: "Where it occurs and who owns the fix.",
        fields: &[IssueField::PageUrl, IssueField::Assignee, IssueField::DueDate],
        is_required: false,
        estimated_time: "30 sec",
    },
];

#[derive(Debug, Clone)]
pub struct IssueForm {
    target: Option<Uuid>,
    projects: RecordOptions,
    defaults: FormRecord<IssueField>,
}

impl IssueForm {
    pub fn create(projects: &[Project]) -> Self {
        let defaults = FormRecord::from_pairs([
            (IssueField::WcagLevel, WcagLevel::AA.label().to_string()),
            (IssueField::Severity, Severity::Moderate.label().to_string()),
            (IssueField::Status, IssueStatus::Open.label().to_string()),
        ]);
        Self {
            target: None,
            projects: project_options(projects),
            defaults,
        }
    }

    pub fn edit(issue: &Issue, projects: &[Project]) -> Self {
        let projects = project_options(projects);
        let mut pairs = vec![
            (IssueField::Title, issue.title.clone()),
            (IssueField::Description, issue.description.clone()),
            (IssueField::Criterion, issue.criterion.clone()),
            (IssueField::WcagLevel, issue.wcag_level.label().to_string()),
            (IssueField::Severity, issue.severity.label().to_string()),
            (IssueField::Status, issue.status.label().to_string()),
        ];
        if let Some(label) = projects.label_for(issue.project_id) {
            pairs.push((IssueField::Project, label.to_string()));
        }
        pairs.extend(issue.page_url.clone().map(|url| (IssueField::PageUrl, url)));
        pairs.extend(issue.assignee.clone().map(|who| (IssueField::Assignee, who)));
        pairs.extend(issue.due_date.map(|date| (IssueField::DueDate, date.to_string())));
        Self {
            target: Some(issue.id),
            projects,
            defaults: FormRecord::from_pairs(pairs),
        }
    }

    fn project_id(&self, label: &str) -> Result<Uuid, FormError> {
        self.projects
            .resolve(label)
            .ok_or_else(|| FormError::Assembly(format!("Unknown project `{label}`")))
    }
}

fn project_options(projects: &[Project]) -> RecordOptions {
    RecordOptions::new(projects.iter().map(|project| (project.name.as_str(), project.id)))
}

/// Accepts WCAG success criterion references such as `1.4.3` or `2.4.11`.
fn validate_criterion(value: &str) -> Result<String, String> {
    let parts: Vec<&str> = value.split('.').collect();
    let well_formed = parts.len() == 3
        && parts.iter().all(|part| {
            !part.is_empty() && part.len() <= 2 && part.chars().all(|c| c.is_ascii_digit())
        })
        && matches!(parts[0], "1" | "2" | "3" | "4");
    if well_formed {
        Ok(value.to_string())
    } else {
        Err("Use a WCAG success criterion such as 1.4.3".to_string())
    }
}

impl FormDefinition for IssueForm {
    type Field = IssueField;
    type Output = Mutation<IssueDraft>;

    fn name(&self) -> &'static str {
        "issue"
    }

    fn steps(&self) -> &[WizardStep<IssueField>] {
        &STEPS
    }

    fn field(&self, field: IssueField) -> FieldDescriptor {
        match field {
            IssueField::Project => FieldDescriptor::choice(
                "Project",
                self.projects.labels(),
            ),
            IssueField::Title => FieldDescriptor::new("Title", FieldKind::Text, Validator::MaxLength(160)),
            IssueField::Description => {
                FieldDescriptor::new("Description", FieldKind::LongText, Validator::MaxLength(4000))
                    .with_optional()
            }
            IssueField::Criterion => {
                FieldDescriptor::new("Success criterion", FieldKind::Text, Validator::custom(validate_criterion))
                    .with_help("The WCAG 2.x success criterion number, e.g. 1.4.3 for contrast.")
            }
            IssueField::WcagLevel => FieldDescriptor::choice("WCAG level", WcagLevel::labels()),
            IssueField::Severity => FieldDescriptor::choice("Severity", Severity::labels()),
            IssueField::Status => FieldDescriptor::choice("Status", IssueStatus::labels()),
            IssueField::PageUrl => {
                FieldDescriptor::new("Page URL", FieldKind::Url, Validator::Url).with_optional()
            }
            IssueField::Assignee => {
                FieldDescriptor::new("Assignee", FieldKind::Text, Validator::MaxLength(120)).with_optional()
            }
            IssueField::DueDate => {
                FieldDescriptor::new("Due date", FieldKind::Date, Validator::Date).with_optional()
            }
        }
    }

    fn defaults(&self) -> FormRecord<IssueField> {
        self.defaults.clone()
    }

    fn assemble(&self, record: &FormRecord<IssueField>) -> Result<Mutation<IssueDraft>, FormError> {
        let draft = IssueDraft {
            project_id: self.project_id(record.require(IssueField::Project)?)?,
            title: record.require(IssueField::Title)?.to_string(),
            description: record.optional(IssueField::Description).unwrap_or_default(),
            criterion: record.require(IssueField::Criterion)?.to_string(),
            wcag_level: record.parse(IssueField::WcagLevel)?,
            severity: record.parse(IssueField::Severity)?,
            status: record.parse(IssueField::Status)?,
            page_url: record.optional(IssueField::PageUrl),
            assignee: record.optional(IssueField::Assignee),
            due_date: record.parse_optional(IssueField::DueDate)?,
        };
        Ok(match self.target {
            Some(id) => Mutation::update(id, draft),
            None => Mutation::create(draft),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SubmitCollaborator;
    use crate::domain::short_id;
    use crate::errors::ApiError;
    use crate::forms::wizard::Wizard;

    struct Sink(Vec<Mutation<IssueDraft>>);

    impl SubmitCollaborator<Mutation<IssueDraft>> for Sink {
        type Response = ();

        fn submit(&mut self, payload: &Mutation<IssueDraft>) -> Result<(), ApiError> {
            self.0.push(payload.clone());
            Ok(())
        }
    }

    #[test]
    fn criterion_rule() {
        assert!(validate_criterion("1.4.3").is_ok());
        assert!(validate_criterion("2.4.11").is_ok());
        assert!(validate_criterion("1.4").is_err());
        assert!(validate_criterion("5.1.1").is_err());
        assert!(validate_criterion("1.a.3").is_err());
    }

    #[test]
    fn submits_with_default_classification() {
        let project = Project::new(Uuid::new_v4(), "Checkout audit");
        let mut wizard = Wizard::new(IssueForm::create(std::slice::from_ref(&project))).unwrap();
        wizard.set_value(IssueField::Project, "Checkout audit").unwrap();
        wizard.set_value(IssueField::Title, "Low contrast button").unwrap();
        wizard.next().unwrap();
        wizard.set_value(IssueField::Criterion, "1.4.3").unwrap();
        wizard.set_value(IssueField::Severity, "serious").unwrap();
        wizard.next().unwrap();

        let mut sink = Sink(Vec::new());
        wizard.submit(&mut sink).unwrap();

        let draft = &sink.0[0].draft;
        assert_eq!(draft.project_id, project.id);
        assert_eq!(draft.severity, Severity::Serious);
        assert_eq!(draft.status, IssueStatus::Open);
        assert_eq!(draft.description, "");
    }

    #[test]
    fn projects_sharing_a_name_need_their_short_id() {
        let client_id = Uuid::new_v4();
        let projects = vec![
            Project::new(client_id, "Website audit"),
            Project::new(Uuid::new_v4(), "Website audit"),
        ];
        let mut wizard = Wizard::new(IssueForm::create(&projects)).unwrap();
        wizard.set_value(IssueField::Project, "Website audit").unwrap();
        wizard.set_value(IssueField::Title, "Focus ring missing").unwrap();
        assert!(wizard.next().is_err());

        let label = format!("Website audit ({})", short_id(projects[1].id));
        wizard.set_value(IssueField::Project, label.as_str()).unwrap();
        wizard.next().unwrap();
        wizard.set_value(IssueField::Criterion, "2.4.7").unwrap();
        wizard.next().unwrap();

        let mut sink = Sink(Vec::new());
        wizard.submit(&mut sink).unwrap();
        assert_eq!(sink.0[0].draft.project_id, projects[1].id);

        let edit = Wizard::new(IssueForm::edit(&Issue::new(projects[1].id, "x", "1.1.1"), &projects))
            .unwrap();
        assert_eq!(edit.value(IssueField::Project), Some(label.as_str()));
    }

    #[test]
    fn classification_requires_criterion() {
        let project = Project::new(Uuid::new_v4(), "Audit");
        let mut wizard = Wizard::new(IssueForm::create(std::slice::from_ref(&project))).unwrap();
        wizard.set_value(IssueField::Project, "Audit").unwrap();
        wizard.set_value(IssueField::Title, "Missing alt text").unwrap();
        wizard.next().unwrap();

        let err = wizard.next().unwrap_err();
        assert_eq!(err.to_string(), "Complete \"WCAG classification\" before continuing");
        assert_eq!(wizard.current_step_index(), 1);
    }
}
