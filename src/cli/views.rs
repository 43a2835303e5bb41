//! Listing screens: argument parsing, view configuration, and table rows.

use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::table::{Table, TableColumn};
use crate::config::parse_sort_spec;
pub use crate::domain::short_id;
use crate::domain::{Client, Issue, Project};
use crate::errors::CliError;
use crate::listing::{
    ClientSort, CombinedEntity, CombinedSort, EntityFilterState, FilterKey, IssueSort, ListContext,
    ListView, Listable, ProjectSort, SortDirection, SortKey,
};

/// Options accepted by every listing command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingArgs {
    pub search: Option<String>,
    pub filters: Vec<(String, Vec<String>)>,
    pub sort: Option<String>,
    /// One-based.
    pub page: usize,
}

impl ListingArgs {
    pub fn parse(args: &[&str]) -> Result<Self, CliError> {
        let mut parsed = ListingArgs {
            page: 1,
            ..ListingArgs::default()
        };
        let mut iter = args.iter();
        while let Some(flag) = iter.next() {
            let mut value = || {
                iter.next()
                    .copied()
                    .ok_or_else(|| CliError::Usage(format!("`{flag}` expects a value")))
            };
            match *flag {
                "--search" | "-s" => parsed.search = Some(value()?.to_string()),
                "--sort" => parsed.sort = Some(value()?.to_string()),
                "--filter" | "-f" => {
                    let spec = value()?;
                    let (key, values) = spec.split_once('=').ok_or_else(|| {
                        CliError::Usage(format!("filter `{spec}` must look like key=value[,value]"))
                    })?;
                    let values = values
                        .split(',')
                        .map(str::trim)
                        .filter(|value| !value.is_empty())
                        .map(str::to_string)
                        .collect();
                    parsed.filters.push((key.trim().to_string(), values));
                }
                "--page" | "-p" => {
                    let raw = value()?;
                    parsed.page = raw
                        .parse()
                        .ok()
                        .filter(|page| *page > 0)
                        .ok_or_else(|| CliError::Usage(format!("invalid page `{raw}`")))?;
                }
                other => return Err(CliError::Usage(format!("unexpected argument `{other}`"))),
            }
        }
        Ok(parsed)
    }
}

/// A record type with a table rendering.
pub trait RowView: Listable {
    const DEFAULT_SORT: (Self::Sort, SortDirection);
    /// Plural noun used in summaries.
    const NOUN: &'static str;

    fn columns() -> Vec<TableColumn>;

    fn cells(&self, ctx: &ListContext) -> Vec<String>;
}

/// Builds the starting criteria: explicit `--sort`, else the configured
/// default, else the record's own default.
pub fn initial_state<T: RowView>(
    args: &ListingArgs,
    configured: Option<&str>,
) -> Result<EntityFilterState<T::Filter, T::Sort>, CliError> {
    let (key, direction) = match args.sort.as_deref().or(configured) {
        Some(spec) => {
            let (name, direction) = parse_sort_spec(spec).map_err(CliError::Usage)?;
            (T::Sort::from_name(name)?, direction)
        }
        None => T::DEFAULT_SORT,
    };
    Ok(EntityFilterState::new(key, direction))
}

/// Applies search and filters from `args` to a loaded view.
pub fn apply_args<T: RowView>(view: &mut ListView<T>, args: &ListingArgs) -> Result<(), CliError> {
    if let Some(search) = &args.search {
        view.set_search(search.as_str());
    }
    for (name, values) in &args.filters {
        let key = T::Filter::from_name(name)?;
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        view.set_filter(key, &values)?;
    }
    Ok(())
}

/// Renders the requested page, or the view's empty message.
pub fn render_page<T: RowView>(view: &ListView<T>, page: usize) -> String {
    if let Some(message) = view.empty_message() {
        return message;
    }
    let index = page.saturating_sub(1);
    let rows = view.page(index);
    if rows.is_empty() {
        return format!(
            "Page {page} is past the end ({} page(s) of {})",
            view.page_count(),
            T::NOUN
        );
    }

    let mut table = Table::new(T::columns());
    for row in &rows {
        table.push_row(row.cells(view.context()));
    }
    let first = index * view.page_size() + 1;
    let last = first + rows.len() - 1;
    format!(
        "{}\n\nShowing {first}-{last} of {} {} (page {page} of {})",
        table.render(),
        view.len(),
        T::NOUN,
        view.page_count()
    )
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|date| date.to_string()).unwrap_or_default()
}

fn created(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|instant| instant.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

impl RowView for Client {
    const DEFAULT_SORT: (ClientSort, SortDirection) = (ClientSort::Company, SortDirection::Asc);
    const NOUN: &'static str = "clients";

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::left("ID"),
            TableColumn::left("Company").max(28),
            TableColumn::left("Contact").max(20),
            TableColumn::left("Email").max(28),
            TableColumn::left("Status"),
            TableColumn::left("Tier"),
            TableColumn::left("Target"),
            TableColumn::left("Created"),
        ]
    }

    fn cells(&self, _ctx: &ListContext) -> Vec<String> {
        vec![
            short_id(self.id),
            self.company.clone(),
            self.contact_name.clone(),
            self.email.clone(),
            self.status.label().to_string(),
            self.tier.label().to_string(),
            self.compliance_target.label().to_string(),
            created(self.created_at),
        ]
    }
}

impl RowView for Project {
    const DEFAULT_SORT: (ProjectSort, SortDirection) = (ProjectSort::CreatedAt, SortDirection::Desc);
    const NOUN: &'static str = "projects";

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::left("ID"),
            TableColumn::left("Project").max(28),
            TableColumn::left("Client").max(20),
            TableColumn::left("Status"),
            TableColumn::left("Priority"),
            TableColumn::left("WCAG"),
            TableColumn::right("Progress"),
            TableColumn::right("Budget"),
            TableColumn::left("Deadline"),
        ]
    }

    fn cells(&self, ctx: &ListContext) -> Vec<String> {
        vec![
            short_id(self.id),
            self.name.clone(),
            ctx.client_name(self.client_id).unwrap_or("(unknown)").to_string(),
            self.status.label().to_string(),
            self.priority.label().to_string(),
            self.wcag_level.label().to_string(),
            format!("{}%", self.progress),
            self.budget.map(|budget| format!("{budget:.2}")).unwrap_or_default(),
            date(self.deadline),
        ]
    }
}

impl RowView for Issue {
    const DEFAULT_SORT: (IssueSort, SortDirection) = (IssueSort::Severity, SortDirection::Desc);
    const NOUN: &'static str = "issues";

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::left("ID"),
            TableColumn::left("Title").max(32),
            TableColumn::left("Project").max(20),
            TableColumn::left("Criterion"),
            TableColumn::left("Severity"),
            TableColumn::left("Status"),
            TableColumn::left("Due"),
        ]
    }

    fn cells(&self, ctx: &ListContext) -> Vec<String> {
        vec![
            short_id(self.id),
            self.title.clone(),
            ctx.project_name(self.project_id).unwrap_or("(unknown)").to_string(),
            format!("{} ({})", self.criterion, self.wcag_level.label()),
            self.severity.label().to_string(),
            self.status.label().to_string(),
            date(self.due_date),
        ]
    }
}

impl RowView for CombinedEntity<'_> {
    const DEFAULT_SORT: (CombinedSort, SortDirection) = (CombinedSort::Name, SortDirection::Asc);
    const NOUN: &'static str = "records";

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::left("ID"),
            TableColumn::left("Kind"),
            TableColumn::left("Name").max(32),
            TableColumn::left("Status"),
            TableColumn::left("Created"),
        ]
    }

    fn cells(&self, _ctx: &ListContext) -> Vec<String> {
        let kind = match self {
            CombinedEntity::Client(_) => "Client",
            CombinedEntity::Project(_) => "Project",
        };
        vec![
            short_id(self.id()),
            kind.to_string(),
            self.display_name().to_string(),
            self.status_label().to_string(),
            created(self.created_at()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ClientFilter;

    fn clients() -> Vec<Client> {
        let mut acme = Client::new("Acme", "Jo Smith", "jo@acme.test");
        acme.status = crate::domain::ClientStatus::Active;
        let mut zed = Client::new("Zed Inc", "Ann Lee", "ann@zed.io");
        zed.status = crate::domain::ClientStatus::Prospect;
        vec![acme, zed]
    }

    #[test]
    fn parses_every_flag() {
        let args = ListingArgs::parse(&[
            "--search",
            "acme",
            "--filter",
            "status=active, prospect",
            "--sort",
            "company:desc",
            "--page",
            "2",
        ])
        .unwrap();
        assert_eq!(args.search.as_deref(), Some("acme"));
        assert_eq!(
            args.filters,
            vec![("status".to_string(), vec!["active".to_string(), "prospect".to_string()])]
        );
        assert_eq!(args.sort.as_deref(), Some("company:desc"));
        assert_eq!(args.page, 2);
    }

    #[test]
    fn rejects_malformed_flags() {
        assert!(ListingArgs::parse(&["--page", "0"]).is_err());
        assert!(ListingArgs::parse(&["--filter", "status"]).is_err());
        assert!(ListingArgs::parse(&["--search"]).is_err());
        assert!(ListingArgs::parse(&["stray"]).is_err());
    }

    #[test]
    fn explicit_sort_beats_configured_default() {
        let args = ListingArgs::parse(&["--sort", "tier"]).unwrap();
        let state = initial_state::<Client>(&args, Some("company:desc")).unwrap();
        assert_eq!(state.sort_key(), ClientSort::Tier);
        assert_eq!(state.sort_direction(), SortDirection::Asc);

        let state = initial_state::<Client>(&ListingArgs::default(), Some("company:desc")).unwrap();
        assert_eq!(state.sort_key(), ClientSort::Company);
        assert_eq!(state.sort_direction(), SortDirection::Desc);
    }

    #[test]
    fn filtered_page_renders_matching_rows_only() {
        let args = ListingArgs::parse(&["--filter", "status=active"]).unwrap();
        let mut view = ListView::new(initial_state::<Client>(&args, None).unwrap(), 20);
        view.set_items(clients());
        apply_args(&mut view, &args).unwrap();

        assert_eq!(view.state().active_filters().len(), 1);
        assert!(view.state().active_filters().contains_key(&ClientFilter::Status));
        let rendered = render_page(&view, 1);
        assert!(rendered.contains("Acme"));
        assert!(!rendered.contains("Zed Inc"));
        assert!(rendered.ends_with("Showing 1-1 of 1 clients (page 1 of 1)"));
    }

    #[test]
    fn empty_and_out_of_range_pages_explain_themselves() {
        let mut view: ListView<Client> =
            ListView::new(initial_state::<Client>(&ListingArgs::default(), None).unwrap(), 20);
        view.set_items(Vec::new());
        assert_eq!(render_page(&view, 1), "No records yet");

        view.set_items(clients());
        assert!(render_page(&view, 3).starts_with("Page 3 is past the end"));
    }
}
