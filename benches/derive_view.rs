use chrono::{Duration, NaiveDate, TimeZone, Utc};
use compliance_desk::dashboard::DashboardSummary;
use compliance_desk::domain::{Client, Issue, Project, ProjectStatus, Severity};
use compliance_desk::listing::{
    combine, derive_view, CombinedEntity, CombinedSort, EntityFilterState, ListContext,
    ProjectFilter, ProjectSort, SortDirection,
};
use compliance_desk::storage::{JsonStore, Workspace};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

fn build_sample_workspace(project_count: usize) -> Workspace {
    let clients: Vec<Client> = (0..project_count / 10 + 1)
        .map(|idx| Client::new(format!("Client {idx:04}"), "Jo Smith", "jo@example.test"))
        .collect();

    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let deadline = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let statuses = ProjectStatus::ALL;
    let mut projects = Vec::with_capacity(project_count);
    for idx in 0..project_count {
        let owner = &clients[idx % clients.len()];
        let mut project = Project::new(owner.id, format!("Audit {idx:05}"));
        project.status = statuses[idx % statuses.len()];
        project.progress = (idx % 101) as u8;
        project.budget = (idx % 4 != 0).then(|| 1_000.0 + idx as f64);
        project.deadline = Some(deadline + Duration::days((idx % 365) as i64));
        // Every seventh record has no creation time so null ordering is exercised.
        project.created_at = (idx % 7 != 0).then(|| created + Duration::hours(idx as i64));
        projects.push(project);
    }

    let severities = Severity::ALL;
    let issues = projects
        .iter()
        .step_by(2)
        .enumerate()
        .map(|(idx, project)| {
            let mut issue = Issue::new(project.id, format!("Missing alt text {idx}"), "1.1.1");
            issue.severity = severities[idx % severities.len()];
            issue
        })
        .collect();

    Workspace {
        clients,
        projects,
        issues,
    }
}

fn bench_listing(c: &mut Criterion) {
    let workspace = build_sample_workspace(black_box(10_000));
    let ctx = ListContext::from_records(&workspace.clients, &workspace.projects);

    let mut state = EntityFilterState::new(ProjectSort::Deadline, SortDirection::Asc);
    state.set_search("client 00");
    state
        .set_filter(ProjectFilter::Status, &["active", "planning"])
        .expect("valid status filter");

    c.bench_function("derive_projects_10k", |b| {
        b.iter(|| black_box(derive_view(&workspace.projects, &state, &ctx)).len())
    });

    let sorted = EntityFilterState::new(ProjectSort::CreatedAt, SortDirection::Desc);
    c.bench_function("sort_projects_created_10k", |b| {
        b.iter(|| black_box(derive_view(&workspace.projects, &sorted, &ctx)).len())
    });

    let combined: Vec<CombinedEntity<'_>> = combine(&workspace.clients, &workspace.projects);
    let combined_state = EntityFilterState::new(CombinedSort::Name, SortDirection::Asc);
    c.bench_function("derive_combined_11k", |b| {
        b.iter(|| black_box(derive_view(&combined, &combined_state, &ctx)).len())
    });
}

fn bench_dashboard(c: &mut Criterion) {
    let workspace = build_sample_workspace(10_000);
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    c.bench_function("dashboard_summary_10k", |b| {
        b.iter(|| {
            black_box(DashboardSummary::build(
                &workspace.clients,
                &workspace.projects,
                &workspace.issues,
                today,
            ))
        })
    });
}

fn bench_store_io(c: &mut Criterion) {
    let workspace = build_sample_workspace(5_000);
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::new(dir.path().join("data.json"));

    c.bench_function("workspace_save_5k", |b| {
        b.iter(|| store.save(&workspace).expect("save workspace"))
    });

    store.save(&workspace).expect("seed");
    c.bench_function("workspace_load_5k", |b| {
        b.iter(|| black_box(store.load().expect("load workspace")))
    });
}

criterion_group!(benches, bench_listing, bench_dashboard, bench_store_io);
criterion_main!(benches);
