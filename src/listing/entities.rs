use crate::domain::{
    Client, ClientStatus, Issue, IssueStatus, Priority, Project, ProjectStatus, ServiceTier, Severity,
    WcagLevel,
};

use super::predicates::{FilterKey, ListContext, Listable, SortKey, SortValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientFilter {
    Status,
    Tier,
    ComplianceTarget,
}

impl FilterKey for ClientFilter {
    const ALL: &'static [Self] = &[
        ClientFilter::Status,
        ClientFilter::Tier,
        ClientFilter::ComplianceTarget,
    ];

    fn name(self) -> &'static str {
        match self {
            ClientFilter::Status => "status",
            ClientFilter::Tier => "tier",
            ClientFilter::ComplianceTarget => "compliance_target",
        }
    }

    fn options(self) -> &'static [&'static str] {
        match self {
            ClientFilter::Status => ClientStatus::SLUGS,
            ClientFilter::Tier => ServiceTier::SLUGS,
            ClientFilter::ComplianceTarget => WcagLevel::SLUGS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientSort {
    Company,
    ContactName,
    Status,
    Tier,
    CreatedAt,
}

impl SortKey for ClientSort {
    const ALL: &'static [Self] = &[
        ClientSort::Company,
        ClientSort::ContactName,
        ClientSort::Status,
        ClientSort::Tier,
        ClientSort::CreatedAt,
    ];

    fn name(self) -> &'static str {
        match self {
            ClientSort::Company => "company",
            ClientSort::ContactName => "contact_name",
            ClientSort::Status => "status",
            ClientSort::Tier => "tier",
            ClientSort::CreatedAt => "created_at",
        }
    }
}

impl Listable for Client {
    type Filter = ClientFilter;
    type Sort = ClientSort;

    fn search_fields<'a>(&'a self, _ctx: &'a ListContext) -> Vec<&'a str> {
        let mut fields = vec![
            self.company.as_str(),
            self.contact_name.as_str(),
            self.email.as_str(),
        ];
        fields.extend(self.industry.as_deref());
        fields
    }

    fn filter_value(&self, key: ClientFilter) -> Option<&'static str> {
        Some(match key {
            ClientFilter::Status => self.status.as_str(),
            ClientFilter::Tier => self.tier.as_str(),
            ClientFilter::ComplianceTarget => self.compliance_target.as_str(),
        })
    }

    fn sort_value(&self, key: ClientSort, _ctx: &ListContext) -> Option<SortValue> {
        match key {
            ClientSort::Company => Some(SortValue::text(&self.company)),
            ClientSort::ContactName => Some(SortValue::text(&self.contact_name)),
            ClientSort::Status => Some(SortValue::text(self.status.label())),
            ClientSort::Tier => Some(SortValue::number(tier_rank(self.tier))),
            ClientSort::CreatedAt => self.created_at.map(SortValue::instant),
        }
    }
}

fn tier_rank(tier: ServiceTier) -> u8 {
    match tier {
        ServiceTier::Basic => 1,
        ServiceTier::Standard => 2,
        ServiceTier::Premium => 3,
        ServiceTier::Enterprise => 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectFilter {
    Status,
    Priority,
    WcagLevel,
}

impl FilterKey for ProjectFilter {
    const ALL: &'static [Self] = &[
        ProjectFilter::Status,
        ProjectFilter::Priority,
        ProjectFilter::WcagLevel,
    ];

    fn name(self) -> &'static str {
        match self {
            ProjectFilter::Status => "status",
            ProjectFilter::Priority => "priority",
            ProjectFilter::WcagLevel => "wcag_level",
        }
    }

    fn options(self) -> &'static [&'static str] {
        match self {
            ProjectFilter::Status => ProjectStatus::SLUGS,
            ProjectFilter::Priority => Priority::SLUGS,
            ProjectFilter::WcagLevel => WcagLevel::SLUGS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectSort {
    Name,
    Client,
    Status,
    Priority,
    Progress,
    Budget,
    Deadline,
    CreatedAt,
}

impl SortKey for ProjectSort {
    const ALL: &'static [Self] = &[
        ProjectSort::Name,
        ProjectSort::Client,
        ProjectSort::Status,
        ProjectSort::Priority,
        ProjectSort::Progress,
        ProjectSort::Budget,
        ProjectSort::Deadline,
        ProjectSort::CreatedAt,
    ];

    fn name(self) -> &'static str {
        match self {
            ProjectSort::Name => "name",
            ProjectSort::Client => "client",
            ProjectSort::Status => "status",
            ProjectSort::Priority => "priority",
            ProjectSort::Progress => "progress",
            ProjectSort::Budget => "budget",
            ProjectSort::Deadline => "deadline",
            ProjectSort::CreatedAt => "created_at",
        }
    }
}

impl Listable for Project {
    type Filter = ProjectFilter;
    type Sort = ProjectSort;

    fn search_fields<'a>(&'a self, ctx: &'a ListContext) -> Vec<&'a str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(ctx.client_name(self.client_id));
        fields
    }

    fn filter_value(&self, key: ProjectFilter) -> Option<&'static str> {
        Some(match key {
            ProjectFilter::Status => self.status.as_str(),
            ProjectFilter::Priority => self.priority.as_str(),
            ProjectFilter::WcagLevel => self.wcag_level.as_str(),
        })
    }

    fn sort_value(&self, key: ProjectSort, ctx: &ListContext) -> Option<SortValue> {
        match key {
            ProjectSort::Name => Some(SortValue::text(&self.name)),
            ProjectSort::Client => ctx.client_name(self.client_id).map(SortValue::text),
            ProjectSort::Status => Some(SortValue::text(self.status.label())),
            ProjectSort::Priority => Some(SortValue::number(self.priority.rank())),
            ProjectSort::Progress => Some(SortValue::number(self.progress)),
            ProjectSort::Budget => self.budget.map(SortValue::number),
            ProjectSort::Deadline => self.deadline.and_then(SortValue::date),
            ProjectSort::CreatedAt => self.created_at.map(SortValue::instant),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueFilter {
    Severity,
    Status,
    WcagLevel,
}

impl FilterKey for IssueFilter {
    const ALL: &'static [Self] = &[
        IssueFilter::Severity,
        IssueFilter::Status,
        IssueFilter::WcagLevel,
    ];

    fn name(self) -> &'static str {
        match self {
            IssueFilter::Severity => "severity",
            IssueFilter::Status => "status",
            IssueFilter::WcagLevel => "wcag_level",
        }
    }

    fn options(self) -> &'static [&'static str] {
        match self {
            IssueFilter::Severity => Severity::SLUGS,
            IssueFilter::Status => IssueStatus::SLUGS,
            IssueFilter::WcagLevel => WcagLevel::SLUGS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueSort {
    Title,
    Project,
    Severity,
    Status,
    Criterion,
    DueDate,
    CreatedAt,
}

impl SortKey for IssueSort {
    const ALL: &'static [Self] = &[
        IssueSort::Title,
        IssueSort::Project,
        IssueSort::Severity,
        IssueSort::Status,
        IssueSort::Criterion,
        IssueSort::DueDate,
        IssueSort::CreatedAt,
    ];

    fn name(self) -> &'static str {
        match self {
            IssueSort::Title => "title",
            IssueSort::Project => "project",
            IssueSort::Severity => "severity",
            IssueSort::Status => "status",
            IssueSort::Criterion => "criterion",
            IssueSort::DueDate => "due_date",
            IssueSort::CreatedAt => "created_at",
        }
    }
}

impl Listable for Issue {
    type Filter = IssueFilter;
    type Sort = IssueSort;

    fn search_fields<'a>(&'a self, _ctx: &'a ListContext) -> Vec<&'a str> {
        let mut fields = vec![
            self.title.as_str(),
            self.description.as_str(),
            self.criterion.as_str(),
        ];
        fields.extend(self.page_url.as_deref());
        fields.extend(self.assignee.as_deref());
        fields
    }

    fn filter_value(&self, key: IssueFilter) -> Option<&'static str> {
        Some(match key {
            IssueFilter::Severity => self.severity.as_str(),
            IssueFilter::Status => self.status.as_str(),
            IssueFilter::WcagLevel => self.wcag_level.as_str(),
        })
    }

    fn sort_value(&self, key: IssueSort, ctx: &ListContext) -> Option<SortValue> {
        match key {
            IssueSort::Title => Some(SortValue::text(&self.title)),
            IssueSort::Project => ctx.project_name(self.project_id).map(SortValue::text),
            IssueSort::Severity => Some(SortValue::number(self.severity.rank())),
            IssueSort::Status => Some(SortValue::text(self.status.label())),
            IssueSort::Criterion => Some(SortValue::text(&self.criterion)),
            IssueSort::DueDate => self.due_date.and_then(SortValue::date),
            IssueSort::CreatedAt => self.created_at.map(SortValue::instant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::engine::{apply_search, apply_sort, derive_view};
    use crate::listing::state::{EntityFilterState, SortDirection};
    use chrono::{TimeZone, Utc};

    #[test]
    fn project_search_matches_client_company() {
        let acme = Client::new("Acme Corp", "Jo Smith", "jo@acme.test");
        let project = Project::new(acme.id, "Website audit");
        let projects = vec![project];
        let ctx = ListContext::from_records(std::slice::from_ref(&acme), &projects);
        let all: Vec<&Project> = projects.iter().collect();

        assert_eq!(apply_search(&all, "acme", &ctx).len(), 1);
        assert!(apply_search(&all, "globex", &ctx).is_empty());
    }

    #[test]
    fn client_filters_use_declared_slugs() {
        let mut prospect = Client::new("Globex", "Hank", "hank@globex.test");
        prospect.status = ClientStatus::Prospect;
        let clients = vec![Client::new("Acme", "Jo", "jo@acme.test"), prospect];

        let mut state = EntityFilterState::new(ClientSort::Company, SortDirection::Asc);
        state.select(ClientFilter::Status, "prospect").unwrap();
        let view = derive_view(&clients, &state, &ListContext::default());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].company, "Globex");
    }

    #[test]
    fn issues_sort_by_severity_rank() {
        let project_id = uuid::Uuid::new_v4();
        let mut minor = Issue::new(project_id, "Focus ring", "2.4.7");
        minor.severity = Severity::Minor;
        let mut critical = Issue::new(project_id, "Keyboard trap", "2.1.2");
        critical.severity = Severity::Critical;
        let issues = vec![minor, critical];
        let all: Vec<&Issue> = issues.iter().collect();

        let sorted = apply_sort(&all, IssueSort::Severity, SortDirection::Desc, &ListContext::default());
        assert_eq!(sorted[0].title, "Keyboard trap");
    }

    #[test]
    fn projects_without_created_at_sort_last() {
        let client_id = uuid::Uuid::new_v4();
        let mut dated = Project::new(client_id, "Dated");
        dated.created_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let mut undated = Project::new(client_id, "Undated");
        undated.created_at = None;
        let projects = vec![undated, dated];
        let all: Vec<&Project> = projects.iter().collect();

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sorted = apply_sort(&all, ProjectSort::CreatedAt, direction, &ListContext::default());
            assert_eq!(sorted[0].name, "Dated");
            assert_eq!(sorted[1].name, "Undated");
        }
    }

    #[test]
    fn every_filter_value_is_a_declared_option() {
        let client = Client::new("Acme", "Jo", "jo@acme.test");
        for key in ClientFilter::ALL {
            let value = client.filter_value(*key).unwrap();
            assert!(key.options().contains(&value));
        }
        let project = Project::new(client.id, "Audit");
        for key in ProjectFilter::ALL {
            let value = project.filter_value(*key).unwrap();
            assert!(key.options().contains(&value));
        }
        let issue = Issue::new(project.id, "Alt text", "1.1.1");
        for key in IssueFilter::ALL {
            let value = issue.filter_value(*key).unwrap();
            assert!(key.options().contains(&value));
        }
    }
}
