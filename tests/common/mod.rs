#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use compliance_desk::{
    api::ApiClient,
    config::ConfigManager,
    domain::{Client, ClientStatus, Project, ProjectStatus},
    storage::{JsonStore, LocalTransport, Workspace},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory usable as `COMPLIANCE_DESK_HOME`.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Isolated config manager and an API client persisting under the same directory.
pub fn setup_test_env() -> (ApiClient<LocalTransport>, ConfigManager) {
    let base = temp_home();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let store = JsonStore::new(base.join("data.json"));
    let transport = LocalTransport::open(store).expect("open local data store");
    (ApiClient::new(transport), config_manager)
}

/// Clients "Acme" and "Zed Inc" plus project "Beta Launch" owned by Acme.
pub fn sample_workspace() -> Workspace {
    let mut acme = Client::new("Acme", "Ana Diaz", "ana@acme.test");
    acme.status = ClientStatus::Active;
    acme.industry = Some("Retail".into());
    acme.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());

    let mut zed = Client::new("Zed Inc", "Jo Smith", "jo@zed.io");
    zed.status = ClientStatus::Prospect;
    zed.created_at = Some(Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap());

    let mut beta = Project::new(acme.id, "Beta Launch");
    beta.status = ProjectStatus::Active;
    beta.progress = 40;
    beta.created_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());

    Workspace {
        clients: vec![acme, zed],
        projects: vec![beta],
        issues: Vec::new(),
    }
}

/// Writes `workspace` to `home/data.json` so a CLI run can pick it up.
pub fn seed_home(home: &PathBuf, workspace: &Workspace) {
    JsonStore::new(home.join("data.json"))
        .save(workspace)
        .expect("seed data file");
}
