mod common;

use compliance_desk::{
    api::{ApiClient, DataSource},
    domain::{
        Client, ClientStatus, Issue, IssueDraft, IssueStatus, Priority, Project, ProjectDraft,
        ProjectStatus, Severity,
    },
    errors::{ApiError, FormError},
    forms::{ClientField, ClientForm, ProjectField, ProjectForm, Wizard},
    storage::{JsonStore, LocalTransport},
};
use uuid::Uuid;

use common::{sample_workspace, setup_test_env, temp_home};

fn fill_client(wizard: &mut Wizard<ClientForm>, company: &str) {
    wizard.set_value(ClientField::Company, company).unwrap();
    wizard.set_value(ClientField::ContactName, "Ana Diaz").unwrap();
    wizard.set_value(ClientField::Email, "Ana@Example.test").unwrap();
    wizard.next().unwrap();
}

#[test]
fn client_wizard_creates_then_edits_through_the_api() {
    let (mut api, _config) = setup_test_env();

    let mut wizard = Wizard::new(ClientForm::create()).unwrap();
    fill_client(&mut wizard, "Acme");
    let created: Client = wizard.submit(&mut api.writer::<Client>()).unwrap();
    assert_eq!(created.email, "ana@example.test");
    assert_eq!(created.status, ClientStatus::Active);
    assert!(created.created_at.is_some());

    let mut edit = Wizard::new(ClientForm::edit(&created)).unwrap();
    edit.set_value(ClientField::Company, "Acme Holdings").unwrap();
    edit.next().unwrap();
    let updated: Client = edit.submit(&mut api.writer::<Client>()).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    let clients: Vec<Client> = api.fetch().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].company, "Acme Holdings");
}

#[test]
fn mutations_survive_reopening_the_store() {
    let home = temp_home();
    let path = home.join("data.json");
    let mut api = ApiClient::new(LocalTransport::open(JsonStore::new(&path)).unwrap());

    let mut wizard = Wizard::new(ClientForm::create()).unwrap();
    fill_client(&mut wizard, "Globex");
    let client: Client = wizard.submit(&mut api.writer::<Client>()).unwrap();

    let reopened = LocalTransport::open(JsonStore::new(&path)).unwrap();
    assert_eq!(reopened.workspace().clients.len(), 1);
    assert_eq!(reopened.workspace().clients[0].id, client.id);
}

#[test]
fn rejected_submission_leaves_wizard_ready_for_retry() {
    let workspace = sample_workspace();
    let acme = workspace.clients[0].clone();
    let mut api = ApiClient::new(LocalTransport::in_memory(workspace));

    // The client disappears between opening the form and submitting it.
    let mut other = ApiClient::new(LocalTransport::in_memory(Default::default()));
    let mut wizard = Wizard::new(ProjectForm::create(&[acme.clone()])).unwrap();
    wizard.set_value(ProjectField::Client, "Acme").unwrap();
    wizard.set_value(ProjectField::Name, "Audit").unwrap();
    wizard.go_to_step(2).unwrap();

    let err = wizard.submit(&mut other.writer::<Project>()).unwrap_err();
    match err {
        FormError::Submission(ApiError::Status { status, message }) => {
            assert_eq!(status, 422);
            assert!(message.contains("does not exist"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!wizard.is_submitted());
    assert_eq!(wizard.current_step_index(), 2);

    let project: Project = wizard.submit(&mut api.writer::<Project>()).unwrap();
    assert_eq!(project.client_id, acme.id);
    assert_eq!(project.name, "Audit");
}

#[test]
fn referential_rules_map_to_unprocessable() {
    let workspace = sample_workspace();
    let acme_id = workspace.clients[0].id;
    let beta_id = workspace.projects[0].id;
    let mut api = ApiClient::new(LocalTransport::in_memory(workspace));

    let err = api.delete::<Client>(acme_id).unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 422, .. }));

    let draft = IssueDraft {
        project_id: beta_id,
        title: "Missing alt text".into(),
        description: String::new(),
        criterion: "1.1.1".into(),
        wcag_level: Default::default(),
        severity: Severity::Serious,
        status: IssueStatus::Open,
        page_url: None,
        assignee: None,
        due_date: None,
    };
    let issue = api.create::<Issue>(&draft).unwrap();
    let err = api.delete::<Project>(beta_id).unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 422, .. }));

    api.delete::<Issue>(issue.id).unwrap();
    api.delete::<Project>(beta_id).unwrap();
    api.delete::<Client>(acme_id).unwrap();
    assert_eq!(api.list::<Client>().unwrap().len(), 1);
}

#[test]
fn unknown_ids_are_not_found() {
    let mut api = ApiClient::new(LocalTransport::in_memory(sample_workspace()));
    let missing = Uuid::new_v4();

    assert!(matches!(
        api.get::<Client>(missing),
        Err(ApiError::Status { status: 404, .. })
    ));
    let draft = ProjectDraft {
        client_id: missing,
        name: "Orphan".into(),
        description: String::new(),
        status: ProjectStatus::Planning,
        priority: Priority::Medium,
        wcag_level: Default::default(),
        start_date: None,
        deadline: None,
        budget: None,
        progress: 0,
    };
    assert!(matches!(
        api.create::<Project>(&draft),
        Err(ApiError::Status { status: 422, .. })
    ));
}

#[test]
fn paged_listing_reports_totals() {
    let mut api = ApiClient::new(LocalTransport::in_memory(sample_workspace()));
    let page = api.list_page::<Client>(2, 1).unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].company, "Zed Inc");
}
