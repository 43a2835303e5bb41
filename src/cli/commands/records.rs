use crate::api::{Mutation, Resource};
use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};
use crate::cli::views::short_id;
use crate::domain::{Client, Identifiable, Issue, NamedEntity, Project};
use crate::errors::CliError;
use crate::forms::{
    ClientForm, FormDefinition, FormResult, FormShell, IssueForm, ProjectForm, Wizard,
};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "client",
            "Create, edit, show, or delete a client",
            "client new | client edit <id> | client show <id> | client delete <id>",
            cmd_client,
        ),
        CommandDefinition::new(
            "project",
            "Create, edit, show, or delete a project",
            "project new | project edit <id> | project show <id> | project delete <id>",
            cmd_project,
        ),
        CommandDefinition::new(
            "issue",
            "Create, edit, show, or delete an accessibility issue",
            "issue new | issue edit <id> | issue show <id> | issue delete <id>",
            cmd_issue,
        ),
    ]
}

enum Action<'a> {
    New,
    Edit(&'a str),
    Show(&'a str),
    Delete(&'a str),
}

fn parse_action<'a>(command: &str, args: &[&'a str]) -> Result<Action<'a>, CliError> {
    let usage = || {
        CliError::Usage(format!(
            "usage: {command} new | {command} edit <id> | {command} show <id> | {command} delete <id>"
        ))
    };
    match args {
        [sub] if sub.eq_ignore_ascii_case("new") => Ok(Action::New),
        [sub, id] => match sub.to_ascii_lowercase().as_str() {
            "edit" => Ok(Action::Edit(id)),
            "show" => Ok(Action::Show(id)),
            "delete" | "rm" => Ok(Action::Delete(id)),
            _ => Err(usage()),
        },
        _ => Err(usage()),
    }
}

fn cmd_client(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match parse_action("client", args)? {
        Action::New => run_wizard::<Client, _>(context, ClientForm::create()),
        Action::Edit(raw) => {
            let client: Client = resolve(context, raw)?;
            run_wizard::<Client, _>(context, ClientForm::edit(&client))
        }
        Action::Show(raw) => {
            let client: Client = resolve(context, raw)?;
            let projects = context
                .api
                .list::<Project>()?
                .into_iter()
                .filter(|project| project.client_id == client.id)
                .count();
            print_details(
                &client.company,
                vec![
                    ("ID", client.id.to_string()),
                    ("Contact", client.contact_name.clone()),
                    ("Email", client.email.clone()),
                    ("Phone", client.phone.clone().unwrap_or_default()),
                    ("Website", client.website.clone().unwrap_or_default()),
                    ("Industry", client.industry.clone().unwrap_or_default()),
                    ("Status", client.status.label().to_string()),
                    ("Tier", client.tier.label().to_string()),
                    ("Target", client.compliance_target.label().to_string()),
                    ("Projects", projects.to_string()),
                    ("Notes", client.notes.clone().unwrap_or_default()),
                ],
            );
            Ok(())
        }
        Action::Delete(raw) => delete::<Client>(context, raw),
    }
}

fn cmd_project(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match parse_action("project", args)? {
        Action::New => {
            let clients = context.api.list::<Client>()?;
            if clients.is_empty() {
                return Err(CliError::Usage(
                    "No clients yet. Create a client first with `client new`.".into(),
                ));
            }
            run_wizard::<Project, _>(context, ProjectForm::create(&clients))
        }
        Action::Edit(raw) => {
            let project: Project = resolve(context, raw)?;
            let clients = context.api.list::<Client>()?;
            run_wizard::<Project, _>(context, ProjectForm::edit(&project, &clients))
        }
        Action::Show(raw) => {
            let project: Project = resolve(context, raw)?;
            let client = context
                .api
                .get::<Client>(project.client_id)
                .map(|client| client.company)
                .unwrap_or_else(|_| "(unknown)".to_string());
            let issues: Vec<Issue> = context
                .api
                .list::<Issue>()?
                .into_iter()
                .filter(|issue| issue.project_id == project.id)
                .collect();
            let open = issues.iter().filter(|issue| issue.status.is_open()).count();
            print_details(
                &project.name,
                vec![
                    ("ID", project.id.to_string()),
                    ("Client", client),
                    ("Status", project.status.label().to_string()),
                    ("Priority", project.priority.label().to_string()),
                    ("WCAG", project.wcag_level.label().to_string()),
                    ("Progress", format!("{}%", project.progress)),
                    ("Start", optional_date(project.start_date)),
                    ("Deadline", optional_date(project.deadline)),
                    (
                        "Budget",
                        project.budget.map(|budget| format!("{budget:.2}")).unwrap_or_default(),
                    ),
                    ("Issues", format!("{} ({open} open)", issues.len())),
                    ("Description", project.description.clone()),
                ],
            );
            Ok(())
        }
        Action::Delete(raw) => delete::<Project>(context, raw),
    }
}

fn cmd_issue(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match parse_action("issue", args)? {
        Action::New => {
            let projects = context.api.list::<Project>()?;
            if projects.is_empty() {
                return Err(CliError::Usage(
                    "No projects yet. Create a project first with `project new`.".into(),
                ));
            }
            run_wizard::<Issue, _>(context, IssueForm::create(&projects))
        }
        Action::Edit(raw) => {
            let issue: Issue = resolve(context, raw)?;
            let projects = context.api.list::<Project>()?;
            run_wizard::<Issue, _>(context, IssueForm::edit(&issue, &projects))
        }
        Action::Show(raw) => {
            let issue: Issue = resolve(context, raw)?;
            let project = context
                .api
                .get::<Project>(issue.project_id)
                .map(|project| project.name)
                .unwrap_or_else(|_| "(unknown)".to_string());
            print_details(
                &issue.title,
                vec![
                    ("ID", issue.id.to_string()),
                    ("Project", project),
                    ("Criterion", issue.criterion.clone()),
                    ("WCAG", issue.wcag_level.label().to_string()),
                    ("Severity", issue.severity.label().to_string()),
                    ("Status", issue.status.label().to_string()),
                    ("Page", issue.page_url.clone().unwrap_or_default()),
                    ("Assignee", issue.assignee.clone().unwrap_or_default()),
                    ("Due", optional_date(issue.due_date)),
                    ("Description", issue.description.clone()),
                ],
            );
            Ok(())
        }
        Action::Delete(raw) => delete::<Issue>(context, raw),
    }
}

/// Runs a create/edit wizard and submits it through the API client.
fn run_wizard<R, D>(context: &mut ShellContext, form: D) -> CommandResult
where
    R: Resource + Identifiable + NamedEntity,
    D: FormDefinition<Output = Mutation<R::Draft>>,
{
    let mut wizard = Wizard::new(form)?;
    let mut writer = context.api.writer::<R>();
    let outcome = FormShell::new(&mut wizard).run(&mut writer, &mut *context.interaction)?;
    match outcome {
        FormResult::Completed(record) => output::success(format!(
            "{} `{}` saved ({})",
            R::KIND,
            record.name(),
            short_id(record.id())
        )),
        FormResult::Cancelled => {
            output::warning(format!("{} form cancelled; nothing saved", R::KIND))
        }
    }
    Ok(())
}

fn delete<R>(context: &mut ShellContext, raw: &str) -> CommandResult
where
    R: Resource + Identifiable + NamedEntity,
{
    let record: R = resolve(context, raw)?;
    let prompt = format!("Delete {} `{}`?", R::KIND.to_lowercase(), record.name());
    if !context.confirm(&prompt)? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    context.api.delete::<R>(record.id())?;
    output::success(format!("{} `{}` deleted", R::KIND, record.name()));
    Ok(())
}

/// Finds a record by full id or by a unique prefix of its hex digits.
fn resolve<R>(context: &mut ShellContext, raw: &str) -> Result<R, CliError>
where
    R: Resource + Identifiable,
{
    let wanted = raw.trim().replace('-', "").to_ascii_lowercase();
    if wanted.is_empty() {
        return Err(CliError::Usage(format!("{} id cannot be empty", R::KIND)));
    }
    let mut matches: Vec<R> = context
        .api
        .list::<R>()?
        .into_iter()
        .filter(|record| record.id().simple().to_string().starts_with(&wanted))
        .collect();
    match matches.len() {
        0 => Err(CliError::Usage(format!(
            "No {} matches id `{raw}`",
            R::KIND.to_lowercase()
        ))),
        1 => Ok(matches.remove(0)),
        count => Err(CliError::Usage(format!(
            "Id `{raw}` matches {count} {} records; use more digits",
            R::KIND.to_lowercase()
        ))),
    }
}

fn optional_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|date| date.to_string()).unwrap_or_default()
}

fn print_details(title: &str, rows: Vec<(&str, String)>) {
    output::section(title);
    let mut table = Table::new(vec![
        TableColumn::left("Field"),
        TableColumn::left("Value").max(60),
    ]);
    table.show_headers = false;
    for (field, value) in rows {
        table.push_row(vec![field.to_string(), value]);
    }
    println!("{}", table.render());
}
