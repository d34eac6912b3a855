//! Smoke tests for the non-interactive commands

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's config and layout store
fn cloakdiff(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cloakdiff").unwrap();
    cmd.env("CLOAKDIFF_CONFIG", home.path().join("config.toml"))
        .env("HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

// === Render Command Tests ===

#[test]
fn test_render_pretty_json() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("a.json");
    std::fs::write(&file, r#"{"x":1}"#).unwrap();

    cloakdiff(&home)
        .arg("render")
        .arg(&file)
        .assert()
        .success()
        .stdout("{\n  \"x\": 1\n}\n");
}

#[test]
fn test_render_invalid_json_shows_notice_and_raw() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("a.json");
    std::fs::write(&file, r#"{"x":1,}"#).unwrap();

    cloakdiff(&home)
        .arg("render")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Error parsing JSON:"))
        .stdout(predicate::str::contains("\n\n{\"x\":1,}"));
}

#[test]
fn test_render_kind_override() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("data.json");
    std::fs::write(&file, r#"{"x":1}"#).unwrap();

    cloakdiff(&home)
        .args(["render", "--kind", "text"])
        .arg(&file)
        .assert()
        .success()
        .stdout("{\"x\":1}\n");
}

#[test]
fn test_render_sample_location() {
    let home = TempDir::new().unwrap();
    cloakdiff(&home)
        .args(["render", "sample:json/right"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[REDACTED]"));
}

#[test]
fn test_render_missing_file_fails() {
    let home = TempDir::new().unwrap();
    cloakdiff(&home)
        .args(["render", "/nonexistent/cloakdiff/a.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load artifact"));
}

// === Export Command Tests ===

#[test]
fn test_export_writes_html() {
    let home = TempDir::new().unwrap();
    let left = home.path().join("README.md");
    let right = home.path().join("README.masked.md");
    std::fs::write(&left, "# Title\n\nSee [docs](https://example.com/docs).").unwrap();
    std::fs::write(&right, "# Title\n\nSee [docs]([REDACTED]).").unwrap();
    let out = home.path().join("out").join("diff.html");

    cloakdiff(&home)
        .arg("export")
        .arg(&left)
        .arg(&right)
        .arg("--out")
        .arg(&out)
        .args(["--ratio", "0.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains(r#"target="_blank" rel="noopener noreferrer""#));
    assert!(html.contains("README.masked.md"));
    // 0.9 is clamped to the 30% minimum on the right
    assert!(html.contains("flex:0 0 70.00%"));
}

// === Sample / Config / Help Tests ===

#[test]
fn test_sample_list() {
    let home = TempDir::new().unwrap();
    cloakdiff(&home)
        .args(["sample", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown"))
        .stdout(predicate::str::contains("config.json (masked)"));
}

#[test]
fn test_config_path_follows_env() {
    let home = TempDir::new().unwrap();
    cloakdiff(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let home = TempDir::new().unwrap();
    cloakdiff(&home).args(["config", "init"]).assert().success();
    cloakdiff(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("min_pane_fraction = 0.3"));
    cloakdiff(&home).args(["config", "init"]).assert().failure();
}

#[test]
fn test_invalid_config_rejected() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "[layout]\nmin_pane_fraction = 0.9\n",
    )
    .unwrap();
    cloakdiff(&home)
        .args(["render", "sample:json/left"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_pane_fraction"));
}

#[test]
fn test_view_help() {
    let home = TempDir::new().unwrap();
    cloakdiff(&home)
        .args(["view", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Masked artifact"));
}
