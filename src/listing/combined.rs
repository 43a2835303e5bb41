//! Mixed client/project listing backing the overview screen.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Client, Project};

use super::predicates::{FilterKey, ListContext, Listable, SortKey, SortValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Client,
    Project,
}

impl EntityKind {
    pub const SLUGS: &'static [&'static str] = &["client", "project"];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Project => "project",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Client => f.write_str("Client"),
            EntityKind::Project => f.write_str("Project"),
        }
    }
}

/// A borrowed client or project; consumers match on the variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombinedEntity<'a> {
    Client(&'a Client),
    Project(&'a Project),
}

impl<'a> CombinedEntity<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            CombinedEntity::Client(_) => EntityKind::Client,
            CombinedEntity::Project(_) => EntityKind::Project,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            CombinedEntity::Client(client) => client.id,
            CombinedEntity::Project(project) => project.id,
        }
    }

    pub fn display_name(&self) -> &'a str {
        match self {
            CombinedEntity::Client(client) => &client.company,
            CombinedEntity::Project(project) => &project.name,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            CombinedEntity::Client(client) => client.status.label(),
            CombinedEntity::Project(project) => project.status.label(),
        }
    }

    fn status_slug(&self) -> &'static str {
        match self {
            CombinedEntity::Client(client) => client.status.as_str(),
            CombinedEntity::Project(project) => project.status.as_str(),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            CombinedEntity::Client(client) => client.created_at,
            CombinedEntity::Project(project) => project.created_at,
        }
    }
}

/// Clients first, then projects, each in source order.
pub fn combine<'a>(clients: &'a [Client], projects: &'a [Project]) -> Vec<CombinedEntity<'a>> {
    clients
        .iter()
        .map(CombinedEntity::Client)
        .chain(projects.iter().map(CombinedEntity::Project))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CombinedFilter {
    Kind,
    Status,
}

/// Union of client and project status slugs.
const COMBINED_STATUSES: &[&str] = &[
    "active",
    "inactive",
    "pending",
    "prospect",
    "planning",
    "on_hold",
    "completed",
    "cancelled",
];

impl FilterKey for CombinedFilter {
    const ALL: &'static [Self] = &[CombinedFilter::Kind, CombinedFilter::Status];

    fn name(self) -> &'static str {
        match self {
            CombinedFilter::Kind => "kind",
            CombinedFilter::Status => "status",
        }
    }

    fn options(self) -> &'static [&'static str] {
        match self {
            CombinedFilter::Kind => EntityKind::SLUGS,
            CombinedFilter::Status => COMBINED_STATUSES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinedSort {
    Name,
    Kind,
    Status,
    CreatedAt,
}

impl SortKey for CombinedSort {
    const ALL: &'static [Self] = &[
        CombinedSort::Name,
        CombinedSort::Kind,
        CombinedSort::Status,
        CombinedSort::CreatedAt,
    ];

    fn name(self) -> &'static str {
        match self {
            CombinedSort::Name => "name",
            CombinedSort::Kind => "kind",
            CombinedSort::Status => "status",
            CombinedSort::CreatedAt => "created_at",
        }
    }
}

impl Listable for CombinedEntity<'_> {
    type Filter = CombinedFilter;
    type Sort = CombinedSort;

    fn search_fields<'s>(&'s self, ctx: &'s ListContext) -> Vec<&'s str> {
        match self {
            CombinedEntity::Client(client) => client.search_fields(ctx),
            CombinedEntity::Project(project) => project.search_fields(ctx),
        }
    }

    fn filter_value(&self, key: CombinedFilter) -> Option<&'static str> {
        match key {
            CombinedFilter::Kind => Some(self.kind().as_str()),
            CombinedFilter::Status => Some(self.status_slug()),
        }
    }

    fn sort_value(&self, key: CombinedSort, _ctx: &ListContext) -> Option<SortValue> {
        match key {
            CombinedSort::Name => Some(SortValue::text(self.display_name())),
            CombinedSort::Kind => Some(SortValue::text(self.kind().as_str())),
            CombinedSort::Status => Some(SortValue::text(self.status_label())),
            CombinedSort::CreatedAt => self.created_at().map(SortValue::instant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_keeps_clients_before_projects() {
        let client = Client::new("Acme", "Jo", "jo@acme.test");
        let project = Project::new(client.id, "Audit");
        let clients = vec![client];
        let projects = vec![project];

        let combined = combine(&clients, &projects);
        let kinds: Vec<_> = combined.iter().map(CombinedEntity::kind).collect();
        assert_eq!(kinds, vec![EntityKind::Client, EntityKind::Project]);
        assert_eq!(combined[1].display_name(), "Audit");
    }

    #[test]
    fn status_filter_values_are_declared() {
        let client = Client::new("Acme", "Jo", "jo@acme.test");
        let project = Project::new(client.id, "Audit");
        for entity in [CombinedEntity::Client(&client), CombinedEntity::Project(&project)] {
            let status = entity.filter_value(CombinedFilter::Status).unwrap();
            assert!(CombinedFilter::Status.options().contains(&status));
        }
    }
}
