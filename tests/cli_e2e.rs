//! End-to-end CLI tests for the iacatalog binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

fn write_iacatalog_config(config_home: &Path, contents: &str) {
    let config_dir = config_home.join("iacatalog");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
}

fn toml_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}

fn iacatalog(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("iacatalog").unwrap();
    cmd.current_dir(workdir.path())
        .env("XDG_CONFIG_HOME", workdir.path().join("config"))
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

async fn mount_single_item(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/services/search/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"identifier": "id1"}],
            "count": 1,
            "total": 1
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/metadata/id1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dir": "/1/items/id1",
            "metadata": {"title": "My Book", "creator": "Smith", "year": "1920"},
            "files": [{"name": "id1_text.pdf"}, {"name": "id1_meta.xml"}]
        })))
        .mount(server)
        .await;
}

#[test]
fn test_no_search_flag_prints_help() {
    let workdir = TempDir::new().unwrap();
    iacatalog(&workdir)
        .assert()
        .success()
        .stdout(predicate::str::contains("--search"));
    assert!(!workdir.path().join("download.csv").exists());
}

#[test]
fn test_help_flag_describes_tool() {
    let workdir = TempDir::new().unwrap();
    iacatalog(&workdir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("--overwrite"));
}

#[test]
fn test_invalid_config_fails_with_key_name() {
    let workdir = TempDir::new().unwrap();
    write_iacatalog_config(&workdir.path().join("config"), "colour = true\n");
    iacatalog(&workdir)
        .args(["-s", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_run_writes_catalog() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_single_item(&server).await;
    let workdir = TempDir::new().unwrap();

    iacatalog(&workdir)
        .args(["-s", "Test Author", "-t", "pdf", "--archive-url"])
        .arg(server.uri())
        .assert()
        .success();

    let catalog = std::fs::read_to_string(workdir.path().join("download.csv")).unwrap();
    let lines: Vec<&str> = catalog.lines().collect();
    assert_eq!(
        lines[0],
        "query,identifier,title,creator,year,uploader,uploader_email,language,in_file_path,in_file_name,out_file_path,out_file_name"
    );
    assert_eq!(lines.len(), 2, "unexpected catalog: {catalog}");
    assert!(lines[1].starts_with("Test Author,id1,My Book,Smith,1920,"));
    assert!(lines[1].ends_with("Test Author,\"My Book, Smith (1920).pdf\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_supplies_output_and_archive_url() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_single_item(&server).await;
    let workdir = TempDir::new().unwrap();
    let output = workdir.path().join("plan.csv");
    write_iacatalog_config(
        &workdir.path().join("config"),
        &format!(
            "output = \"{}\"\narchive_url = \"{}\"\ntypes = \"pdf\"\n",
            toml_path(&output),
            server.uri()
        ),
    );

    iacatalog(&workdir).args(["-s", "Test Author"]).assert().success();
    // Second run extends the catalog and finds nothing new.
    iacatalog(&workdir).args(["-s", "Test Author"]).assert().success();

    let catalog = std::fs::read_to_string(&output).unwrap();
    assert_eq!(catalog.lines().count(), 2, "unexpected catalog: {catalog}");
    assert!(!workdir.path().join("download.csv").exists());
}
