//! Aggregate figures shown on the dashboard screen.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Client, ClientStatus, Issue, IssueStatus, Project, ProjectStatus, Severity};
use crate::listing::{apply_sort, ListContext, ProjectSort, SortDirection};

const RECENT_PROJECTS: usize = 5;

/// One headline figure.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCard {
    pub title: &'static str,
    pub value: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_clients: usize,
    pub active_clients: usize,
    pub total_projects: usize,
    pub projects_by_status: Vec<(ProjectStatus, usize)>,
    /// Mean progress over all projects; `None` when there are no projects.
    pub average_progress: Option<f64>,
    pub overdue_projects: usize,
    pub total_issues: usize,
    pub issues_by_severity: Vec<(Severity, usize)>,
    pub issues_by_status: Vec<(IssueStatus, usize)>,
    pub open_critical_issues: usize,
    /// Share of issues resolved or verified; `None` when there are no issues.
    pub resolution_rate: Option<f64>,
    pub recent_projects: Vec<Project>,
}

impl DashboardSummary {
    pub fn build(clients: &[Client], projects: &[Project], issues: &[Issue], today: NaiveDate) -> Self {
        let average_progress = if projects.is_empty() {
            None
        } else {
            let total: f64 = projects.iter().map(|project| f64::from(project.progress)).sum();
            Some(total / projects.len() as f64)
        };

        let resolved = issues.iter().filter(|issue| issue.status.is_resolved()).count();
        let resolution_rate = if issues.is_empty() {
            None
        } else {
            Some(resolved as f64 / issues.len() as f64 * 100.0)
        };

        let all: Vec<&Project> = projects.iter().collect();
        let ctx = ListContext::from_records(clients, projects);
        let recent_projects = apply_sort(&all, ProjectSort::CreatedAt, SortDirection::Desc, &ctx)
            .into_iter()
            .take(RECENT_PROJECTS)
            .cloned()
            .collect();

        let summary = Self {
            total_clients: clients.len(),
            active_clients: clients
                .iter()
                .filter(|client| client.status == ClientStatus::Active)
                .count(),
            total_projects: projects.len(),
            projects_by_status: tally(ProjectStatus::ALL, projects.iter().map(|p| p.status)),
            average_progress,
            overdue_projects: projects.iter().filter(|project| project.is_overdue(today)).count(),
            total_issues: issues.len(),
            issues_by_severity: tally(Severity::ALL, issues.iter().map(|i| i.severity)),
            issues_by_status: tally(IssueStatus::ALL, issues.iter().map(|i| i.status)),
            open_critical_issues: issues
                .iter()
                .filter(|issue| issue.severity == Severity::Critical && issue.status.is_open())
                .count(),
            resolution_rate,
            recent_projects,
        };
        debug!(
            clients = summary.total_clients,
            projects = summary.total_projects,
            issues = summary.total_issues,
            "dashboard summary built"
        );
        summary
    }

    pub fn project_count(&self, status: ProjectStatus) -> usize {
        count_of(&self.projects_by_status, status)
    }

    pub fn issue_count(&self, status: IssueStatus) -> usize {
        count_of(&self.issues_by_status, status)
    }

    pub fn severity_count(&self, severity: Severity) -> usize {
        count_of(&self.issues_by_severity, severity)
    }

    /// Headline cards. Missing averages display as 0%.
    pub fn cards(&self) -> Vec<DashboardCard> {
        vec![
            DashboardCard {
                title: "Clients",
                value: self.total_clients.to_string(),
                detail: format!("{} active", self.active_clients),
            },
            DashboardCard {
                title: "Projects",
                value: self.total_projects.to_string(),
                detail: format!(
                    "{} active, {} overdue",
                    self.project_count(ProjectStatus::Active),
                    self.overdue_projects
                ),
            },
            DashboardCard {
                title: "Average progress",
                value: percent(self.average_progress),
                detail: format!("{} completed", self.project_count(ProjectStatus::Completed)),
            },
            DashboardCard {
                title: "Open issues",
                value: (self.issue_count(IssueStatus::Open) + self.issue_count(IssueStatus::InProgress))
                    .to_string(),
                detail: format!("{} critical", self.open_critical_issues),
            },
            DashboardCard {
                title: "Resolution rate",
                value: percent(self.resolution_rate),
                detail: format!("{} of {} issues", self.total_issues - self.unresolved(), self.total_issues),
            },
        ]
    }

    fn unresolved(&self) -> usize {
        self.issues_by_status
            .iter()
            .filter(|(status, _)| !status.is_resolved())
            .map(|(_, count)| count)
            .sum()
    }
}

fn percent(value: Option<f64>) -> String {
    format!("{:.0}%", value.unwrap_or(0.0))
}

fn tally<K: Copy + PartialEq>(keys: &[K], values: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = keys.iter().map(|key| (*key, 0)).collect();
    for value in values {
        if let Some((_, count)) = counts.iter_mut().find(|(key, _)| *key == value) {
            *count += 1;
        }
    }
    counts
}

fn count_of<K: PartialEq>(counts: &[(K, usize)], key: K) -> usize {
    counts
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map_or(0, |(_, count)| *count)
}
