//! Accessibility remediation projects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Identifiable, NamedEntity, Priority, ProjectStatus, WcagLevel};

/// An audit or remediation engagement for a single client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    #[serde(default)]
    pub wcag_level: WcagLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Completion percentage in `0..=100`.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(client_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::Planning,
            priority: Priority::Medium,
            wcag_level: WcagLevel::AA,
            start_date: None,
            deadline: None,
            budget: None,
            progress: 0,
            created_at: None,
        }
    }

    pub fn from_draft(id: Uuid, draft: ProjectDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: draft.client_id,
            name: draft.name,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            wcag_level: draft.wcag_level,
            start_date: draft.start_date,
            deadline: draft.deadline,
            budget: draft.budget,
            progress: draft.progress.min(100),
            created_at: Some(created_at),
        }
    }

    pub fn apply(&mut self, draft: ProjectDraft) {
        let id = self.id;
        let created_at = self.created_at;
        *self = Self::from_draft(id, draft, Utc::now());
        self.created_at = created_at;
    }

    pub fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            client_id: self.client_id,
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            wcag_level: self.wcag_level,
            start_date: self.start_date,
            deadline: self.deadline,
            budget: self.budget,
            progress: self.progress,
        }
    }

    /// A project is overdue when its deadline has passed and it is still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_closed() && self.deadline.map_or(false, |deadline| deadline < today)
    }
}

impl Identifiable for Project {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Project {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub client_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub wcag_level: WcagLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default)]
    pub progress: u8,
}
