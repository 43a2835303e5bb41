use chrono::Local;
use tracing::warn;

use crate::api::{ApiClient, Resource, Transport};
use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};
use crate::cli::views::{apply_args, initial_state, render_page, short_id, ListingArgs, RowView};
use crate::dashboard::DashboardSummary;
use crate::domain::{Client, Issue, Project};
use crate::config::Config;
use crate::errors::{ApiError, CliError};
use crate::listing::{combine, CombinedEntity, ListContext, ListView};

const LIST_USAGE: &str = "[--search TEXT] [--filter key=v1,v2] [--sort key[:asc|desc]] [--page N]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "clients",
            "List clients (filters: status, tier, compliance_target)",
            "clients [--search TEXT] [--filter key=v1,v2] [--sort key[:asc|desc]] [--page N]",
            cmd_clients,
        ),
        CommandDefinition::new(
            "projects",
            "List projects (filters: status, priority, wcag_level)",
            "projects [--search TEXT] [--filter key=v1,v2] [--sort key[:asc|desc]] [--page N]",
            cmd_projects,
        ),
        CommandDefinition::new(
            "issues",
            "List accessibility issues (filters: severity, status, wcag_level)",
            "issues [--search TEXT] [--filter key=v1,v2] [--sort key[:asc|desc]] [--page N]",
            cmd_issues,
        ),
        CommandDefinition::new(
            "overview",
            "List clients and projects together (filters: kind, status)",
            "overview [--search TEXT] [--filter key=v1,v2] [--sort key[:asc|desc]] [--page N]",
            cmd_overview,
        ),
        CommandDefinition::new(
            "dashboard",
            "Show headline figures and recent projects",
            "dashboard",
            cmd_dashboard,
        ),
    ]
}

fn cmd_clients(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    show_listing::<Client>(context, "clients", args)
}

fn cmd_projects(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    show_listing::<Project>(context, "projects", args)
}

fn cmd_issues(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    show_listing::<Issue>(context, "issues", args)
}

fn show_listing<T: RowView + Resource>(
    context: &mut ShellContext,
    listing: &str,
    raw: &[&str],
) -> CommandResult {
    let args = ListingArgs::parse(raw).map_err(|err| with_usage(err, listing))?;
    let page = listing_page::<T, _>(&mut context.api, &context.config, listing, &args)?;

    output::section(capitalize(listing));
    println!("{page}");
    Ok(())
}

fn listing_page<R: RowView + Resource, T: Transport>(
    api: &mut ApiClient<T>,
    config: &Config,
    listing: &str,
    args: &ListingArgs,
) -> Result<String, CliError> {
    let state = initial_state::<R>(args, config.default_sort(listing))?;
    let mut view: ListView<R> = ListView::new(state, config.page_size);
    view.set_context(lookup_context(api, &config.locale));
    view.load_from(api);
    apply_args(&mut view, args)?;
    Ok(render_page(&view, args.page))
}

fn cmd_overview(context: &mut ShellContext, raw: &[&str]) -> CommandResult {
    let args = ListingArgs::parse(raw).map_err(|err| with_usage(err, "overview"))?;
    let page = overview_page(&mut context.api, &context.config, &args)?;

    output::section("Overview");
    println!("{page}");
    Ok(())
}

/// Clients and projects share one load: if either fetch fails the overview
/// shows the failure instead of a partial list.
fn overview_page<T: Transport>(
    api: &mut ApiClient<T>,
    config: &Config,
    args: &ListingArgs,
) -> Result<String, CliError> {
    let fetched = fetch_lookups(api);
    let (clients, projects) = match &fetched {
        Ok((clients, projects)) => (clients.as_slice(), projects.as_slice()),
        Err(_) => (&[][..], &[][..]),
    };

    let state = initial_state::<CombinedEntity<'_>>(args, config.default_sort("overview"))?;
    let mut view = ListView::new(state, config.page_size);
    view.set_context(ListContext::from_records(clients, projects).with_locale(&config.locale));
    if let Some(ticket) = view.begin_load() {
        let result = match &fetched {
            Ok(_) => Ok(combine(clients, projects)),
            Err(err) => Err(err.clone()),
        };
        view.complete_load(ticket, result);
    }
    apply_args(&mut view, args)?;
    Ok(render_page(&view, args.page))
}

fn cmd_dashboard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(CliError::Usage("usage: dashboard".into()));
    }
    let data = load_dashboard(&mut context.api);
    let summary = DashboardSummary::build(
        &data.clients,
        &data.projects,
        &data.issues,
        Local::now().date_naive(),
    );

    output::section("Dashboard");
    if !data.failures.is_empty() {
        output::warning(format!(
            "Figures below are incomplete. Could not load {}",
            data.failures.join("; ")
        ));
    }
    let mut cards = Table::new(vec![
        TableColumn::left("Metric"),
        TableColumn::right("Value"),
        TableColumn::left("Detail"),
    ]);
    for card in summary.cards() {
        cards.push_row(vec![card.title.to_string(), card.value, card.detail]);
    }
    println!("{}", cards.render());

    let by_status: Vec<String> = summary
        .projects_by_status
        .iter()
        .map(|(status, count)| format!("{} {count}", status.label()))
        .collect();
    println!("\nProjects by status: {}", by_status.join(", "));
    let by_severity: Vec<String> = summary
        .issues_by_severity
        .iter()
        .map(|(severity, count)| format!("{} {count}", severity.label()))
        .collect();
    println!("Issues by severity: {}", by_severity.join(", "));

    output::section("Recent projects");
    if summary.recent_projects.is_empty() {
        println!("No projects yet");
        return Ok(());
    }
    let ctx = ListContext::from_records(&data.clients, &data.projects);
    let mut recent = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Project").max(28),
        TableColumn::left("Client").max(20),
        TableColumn::left("Status"),
        TableColumn::right("Progress"),
    ]);
    for project in &summary.recent_projects {
        recent.push_row(vec![
            short_id(project.id),
            project.name.clone(),
            ctx.client_name(project.client_id).unwrap_or("(unknown)").to_string(),
            project.status.label().to_string(),
            format!("{}%", project.progress),
        ]);
    }
    println!("{}", recent.render());
    Ok(())
}

/// Collections behind the dashboard. A collection that fails to load is
/// empty and named in `failures`.
#[derive(Debug, Default)]
struct DashboardData {
    clients: Vec<Client>,
    projects: Vec<Project>,
    issues: Vec<Issue>,
    failures: Vec<String>,
}

fn load_dashboard<T: Transport>(api: &mut ApiClient<T>) -> DashboardData {
    let mut failures = Vec::new();
    let clients = list_or_empty(api, "clients", &mut failures);
    let projects = list_or_empty(api, "projects", &mut failures);
    let issues = list_or_empty(api, "issues", &mut failures);
    DashboardData {
        clients,
        projects,
        issues,
        failures,
    }
}

fn list_or_empty<R: Resource, T: Transport>(
    api: &mut ApiClient<T>,
    noun: &str,
    failures: &mut Vec<String>,
) -> Vec<R> {
    match api.list::<R>() {
        Ok(items) => items,
        Err(err) => {
            warn!(collection = noun, error = %err, "dashboard fetch failed");
            failures.push(format!("{noun} ({err})"));
            Vec::new()
        }
    }
}

fn fetch_lookups<T: Transport>(
    api: &mut ApiClient<T>,
) -> Result<(Vec<Client>, Vec<Project>), ApiError> {
    let clients = api.list::<Client>()?;
    let projects = api.list::<Project>()?;
    Ok((clients, projects))
}

/// Name lookups for table cells. Without them rows still render, only the
/// client and project columns stay blank.
fn lookup_context<T: Transport>(api: &mut ApiClient<T>, locale: &str) -> ListContext {
    let context = match fetch_lookups(api) {
        Ok((clients, projects)) => ListContext::from_records(&clients, &projects),
        Err(err) => {
            warn!(error = %err, "name lookups unavailable");
            ListContext::default()
        }
    };
    context.with_locale(locale)
}

fn with_usage(err: CliError, listing: &str) -> CliError {
    match err {
        CliError::Usage(message) => {
            CliError::Usage(format!("{message}\nusage: {listing} {LIST_USAGE}"))
        }
        other => other,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiRequest, ApiResponse};
    use crate::storage::{LocalTransport, Workspace};

    struct Unreachable;

    impl Transport for Unreachable {
        fn send(&mut self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
            Err(ApiError::Transport("connection refused".into()))
        }
    }

    fn seeded() -> ApiClient<LocalTransport> {
        let acme = Client::new("Acme", "Jo Smith", "jo@acme.test");
        let project = Project::new(acme.id, "Checkout audit");
        ApiClient::new(LocalTransport::in_memory(Workspace {
            clients: vec![acme],
            projects: vec![project],
            issues: Vec::new(),
        }))
    }

    #[test]
    fn listing_survives_failed_name_lookups() {
        let mut api = ApiClient::new(Unreachable);
        let context = lookup_context(&mut api, "fr-FR");
        assert_eq!(context.client_name(uuid::Uuid::new_v4()), None);
        assert_eq!(context.collator().locale(), "fr-FR");

        let args = ListingArgs::parse(&[]).unwrap();
        let page = listing_page::<Client, _>(&mut api, &Config::default(), "clients", &args).unwrap();
        assert_eq!(page, "Could not load records: Transport error: connection refused");
    }

    #[test]
    fn overview_shows_load_failure() {
        let mut api = ApiClient::new(Unreachable);
        let args = ListingArgs::parse(&["--search", "acme"]).unwrap();
        let page = overview_page(&mut api, &Config::default(), &args).unwrap();
        assert_eq!(page, "Could not load records: Transport error: connection refused");
    }

    #[test]
    fn overview_combines_clients_and_projects() {
        let mut api = seeded();
        let args = ListingArgs::parse(&[]).unwrap();
        let page = overview_page(&mut api, &Config::default(), &args).unwrap();
        assert!(page.contains("Acme"));
        assert!(page.contains("Checkout audit"));
    }

    #[test]
    fn dashboard_falls_back_to_empty_collections() {
        let mut api = ApiClient::new(Unreachable);
        let data = load_dashboard(&mut api);
        assert!(data.clients.is_empty() && data.projects.is_empty() && data.issues.is_empty());
        assert_eq!(data.failures.len(), 3);
        assert!(data.failures[0].starts_with("clients (Transport error"));

        let data = load_dashboard(&mut seeded());
        assert!(data.failures.is_empty());
        assert_eq!(data.projects.len(), 1);
    }
}
