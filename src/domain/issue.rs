//! WCAG accessibility issues raised against a project.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Identifiable, IssueStatus, NamedEntity, Severity, WcagLevel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// WCAG success criterion reference, e.g. `1.4.3`.
    pub criterion: String,
    pub wcag_level: WcagLevel,
    pub severity: Severity,
    pub status: IssueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn new(project_id: Uuid, title: impl Into<String>, criterion: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: title.into(),
            description: String::new(),
            criterion: criterion.into(),
            wcag_level: WcagLevel::AA,
            severity: Severity::Moderate,
            status: IssueStatus::Open,
            page_url: None,
            assignee: None,
            due_date: None,
            created_at: None,
        }
    }

    pub fn from_draft(id: Uuid, draft: IssueDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            criterion: draft.criterion,
            wcag_level: draft.wcag_level,
            severity: draft.severity,
            status: draft.status,
            page_url: draft.page_url,
            assignee: draft.assignee,
            due_date: draft.due_date,
            created_at: Some(created_at),
        }
    }

    pub fn apply(&mut self, draft: IssueDraft) {
        let id = self.id;
        let created_at = self.created_at;
        *self = Self::from_draft(id, draft, Utc::now());
        self.created_at = created_at;
    }

    pub fn to_draft(&self) -> IssueDraft {
        IssueDraft {
            project_id: self.project_id,
            title: self.title.clone(),
            description: self.description.clone(),
            criterion: self.criterion.clone(),
            wcag_level: self.wcag_level,
            severity: self.severity,
            status: self.status,
            page_url: self.page_url.clone(),
            assignee: self.assignee.clone(),
            due_date: self.due_date,
        }
    }
}

impl Identifiable for Issue {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Issue {
    fn name(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueDraft {
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub criterion: String,
    pub wcag_level: WcagLevel,
    pub severity: Severity,
    pub status: IssueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}
