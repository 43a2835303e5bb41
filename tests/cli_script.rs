mod common;

use assert_cmd::Command;
use compliance_desk::config::ConfigManager;
use compliance_desk::storage::JsonStore;
use predicates::str::contains;
use regex::Regex;

use common::{sample_workspace, seed_home, temp_home};

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("compliance_desk_cli").unwrap();
    cmd.env("COMPLIANCE_DESK_HOME", home)
        .env("COMPLIANCE_DESK_CLI_SCRIPT", "1")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn version_prints_package_headline() {
    let home = temp_home();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(format!("compliance_desk {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn help_lists_listing_and_record_commands() {
    let home = temp_home();
    cli(&home)
        .arg("help")
        .assert()
        .success()
        .stdout(contains("Listings\n  clients"))
        .stdout(contains("dashboard"))
        .stdout(contains("Records\n  client "))
        .stdout(contains("issue"));
}

#[test]
fn unknown_command_fails_with_suggestion() {
    let home = temp_home();
    cli(&home)
        .arg("clinets")
        .assert()
        .failure()
        .stderr(contains("Did you mean `clients`?"));
}

#[test]
fn config_set_persists_between_runs() {
    let home = temp_home();
    cli(&home)
        .args(["config", "set", "page_size", "5"])
        .assert()
        .success()
        .stdout(contains("Set page_size = 5"));

    let manager = ConfigManager::with_base_dir(home.clone()).unwrap();
    assert_eq!(manager.load().unwrap().page_size, 5);

    cli(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("page_size"));
}

#[test]
fn clients_listing_reads_seeded_data() {
    let home = temp_home();
    seed_home(&home, &sample_workspace());

    let output = cli(&home)
        .args(["clients", "--filter", "status=active"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Acme"));
    assert!(!stdout.contains("Zed Inc"));
    assert!(stdout.contains("Showing 1-1 of 1 clients (page 1 of 1)"));

    let short_id = Regex::new(r"\b[0-9a-f]{8}\b").unwrap();
    assert!(short_id.is_match(&stdout));
}

#[test]
fn bad_filter_value_is_reported() {
    let home = temp_home();
    seed_home(&home, &sample_workspace());
    cli(&home)
        .args(["projects", "--filter", "status=sleeping"])
        .assert()
        .failure()
        .stderr(contains("sleeping"));
}

#[test]
fn script_session_creates_client_through_wizard() {
    let home = temp_home();
    let input = [
        "client new",
        "Acme",
        "Ana Diaz",
        "ana@acme.test",
        "",
        "next",
        "",
        "",
        "",
        "Retail",
        "",
        "",
        "submit",
        "clients",
        "exit",
    ]
    .join("\n");

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Client `Acme` saved"))
        .stdout(contains("Showing 1-1 of 1 clients"));

    let workspace = JsonStore::new(home.join("data.json")).load().unwrap();
    assert_eq!(workspace.clients.len(), 1);
    assert_eq!(workspace.clients[0].industry.as_deref(), Some("Retail"));
}

#[test]
fn script_session_blocks_incomplete_step_and_keeps_going() {
    let home = temp_home();
    let input = [
        "client new",
        "",
        "",
        "",
        "",
        "next",
        ":cancel",
        "clinets",
        "version",
        "exit",
    ]
    .join("\n");

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Complete \"Contact details\" before continuing"))
        .stdout(contains("Client form cancelled; nothing saved"))
        .stderr(contains("Unknown command `clinets`"))
        .stdout(contains("compliance_desk"));

    let workspace = JsonStore::new(home.join("data.json")).load().unwrap();
    assert!(workspace.clients.is_empty());
}

#[test]
fn script_delete_requires_confirmation() {
    let home = temp_home();
    let workspace = sample_workspace();
    seed_home(&home, &workspace);
    let zed = workspace
        .clients
        .iter()
        .find(|client| client.company == "Zed Inc")
        .unwrap();
    let prefix = zed.id.simple().to_string()[..8].to_string();

    cli(&home)
        .write_stdin(format!("client delete {prefix}\nno\nexit\n"))
        .assert()
        .success()
        .stdout(contains("Nothing deleted."));
    assert_eq!(JsonStore::new(home.join("data.json")).load().unwrap().clients.len(), 2);

    cli(&home)
        .write_stdin(format!("client delete {prefix}\ny\nexit\n"))
        .assert()
        .success()
        .stdout(contains("Client `Zed Inc` deleted"));
    assert_eq!(JsonStore::new(home.join("data.json")).load().unwrap().clients.len(), 1);
}
