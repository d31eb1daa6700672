//! Integration tests for the `sidekick` CLI binary.
//!
//! Argument parsing, help output, completions, offline resolution with
//! `--no-remote`, and status fetches against a wiremock admin service.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const PREVIEW_PAGE: &str = "https://main--blog--adobe.hlx.page/en/post";

/// Build a command for the `sidekick` binary with env isolation.
///
/// Clears all `SIDEKICK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn sidekick_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sidekick");
    cmd.env("HOME", "/tmp/sidekick-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sidekick-cli-test-nonexistent")
        .env_remove("SIDEKICK_CONFIG")
        .env_remove("SIDEKICK_PROJECT")
        .env_remove("SIDEKICK_ADMIN_ORIGIN")
        .env_remove("SIDEKICK_AUTH_TOKEN")
        .env_remove("SIDEKICK_OUTPUT")
        .env_remove("SIDEKICK_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// A command for the blog project that never fetches the project config.
fn offline_cmd() -> assert_cmd::Command {
    let mut cmd = sidekick_cmd();
    cmd.args(["--no-remote", "--owner", "adobe", "--repo", "blog"]);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sidekick_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sidekick_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("hosts")
            .and(predicate::str::contains("classify"))
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("views")),
    );
}

#[test]
fn test_version_flag() {
    sidekick_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sidekick"));
}

#[test]
fn test_completions_zsh() {
    sidekick_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    sidekick_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_hosts_without_project() {
    let output = sidekick_cmd().arg("hosts").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("No project configured"),
        "Expected missing project error:\n{text}"
    );
}

#[test]
fn test_classify_rejects_relative_url() {
    let output = offline_cmd()
        .args(["classify", "/en/post"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_project_lists_available() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    sidekick_cmd()
        .args(["--config", config.to_str().unwrap()])
        .args(["config", "init", "--project-owner", "adobe", "--project-repo", "blog"])
        .assert()
        .success();

    let output = sidekick_cmd()
        .args(["--config", config.to_str().unwrap(), "--project", "nope", "hosts"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("default"));
}

// ── Offline resolution ──────────────────────────────────────────────

#[test]
fn test_hosts_standard_domains() {
    offline_cmd()
        .args(["hosts", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "main--blog--adobe.hlx.page\nmain--blog--adobe.hlx.live\n",
        ));
}

#[test]
fn test_hosts_json_with_custom_preview_host() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();

    sidekick_cmd()
        .args(["--config", config, "config", "init"])
        .args(["--project-owner", "adobe", "--project-repo", "blog"])
        .args(["--host", "blog.adobe.com"])
        .assert()
        .success();
    sidekick_cmd()
        .args(["--config", config, "config", "set", "previewHost", "preview.adobe.com"])
        .assert()
        .success();

    let output = sidekick_cmd()
        .args(["--config", config, "--no-remote", "hosts", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let hosts: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hosts["preview"], json!("preview.adobe.com"));
    assert_eq!(hosts["stdPreview"], json!("main--blog--adobe.hlx.page"));
    assert_eq!(hosts["live"], json!("main--blog--adobe.hlx.live"));
    assert_eq!(hosts["prod"], json!("blog.adobe.com"));
}

#[test]
fn test_hosts_aem_domain() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();

    sidekick_cmd()
        .args(["--config", config, "config", "init", "--aem-domain"])
        .args(["--project-owner", "adobe", "--project-repo", "blog"])
        .assert()
        .success();

    sidekick_cmd()
        .args(["--config", config, "--no-remote", "hosts", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main--blog--adobe.aem.page"));
}

#[test]
fn test_classify_preview() {
    offline_cmd()
        .args(["classify", PREVIEW_PAGE, "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff("preview\n"));
}

#[test]
fn test_classify_google_doc_json() {
    let output = offline_cmd()
        .args([
            "classify",
            "https://docs.google.com/document/d/1abc/edit",
            "-o",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["environment"], json!("editor"));
    assert_eq!(view["editor"], json!(true));
    assert_eq!(view["content"], json!(true));
    assert_eq!(view["project"], json!(false));
}

#[test]
fn test_views_default_json_viewer() {
    offline_cmd()
        .args(["views", "/data/products.json", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("/view/json/json.html\n"));
}

#[test]
fn test_views_no_match_is_empty() {
    offline_cmd()
        .args(["views", "/en/post", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    sidekick_cmd()
        .args(["--config", "/tmp/sidekick-custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::diff("/tmp/sidekick-custom.toml\n"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();
    let init = ["config", "init", "--project-owner", "adobe", "--project-repo", "blog"];

    sidekick_cmd().args(["--config", config]).args(init).assert().success();
    sidekick_cmd()
        .args(["--config", config])
        .args(init)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
    sidekick_cmd()
        .args(["--config", config])
        .args(init)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_config_set_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    sidekick_cmd()
        .args(["--config", config.to_str().unwrap(), "config", "set", "bogus", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_default_output_applies_without_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();

    sidekick_cmd()
        .args(["--config", config, "config", "init"])
        .args(["--project-owner", "adobe", "--project-repo", "blog"])
        .assert()
        .success();
    sidekick_cmd()
        .args(["--config", config, "config", "set", "defaults.output", "json"])
        .assert()
        .success();

    let output = sidekick_cmd()
        .args(["--config", config, "--no-remote", "hosts"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let hosts: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hosts["stdPreview"], json!("main--blog--adobe.hlx.page"));

    // An explicit flag still wins.
    sidekick_cmd()
        .args(["--config", config, "--no-remote", "hosts", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("main--blog--adobe.hlx.page\n"));
}

#[test]
fn test_config_show_masks_token() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();

    sidekick_cmd()
        .args(["--config", config, "config", "init"])
        .args(["--project-owner", "adobe", "--project-repo", "blog"])
        .assert()
        .success();
    sidekick_cmd()
        .args(["--config", config, "config", "set", "authToken", "hunter2"])
        .assert()
        .success();

    sidekick_cmd()
        .args(["--config", config, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****").and(predicate::str::contains("hunter2").not()));
}

// ── Status against a mock admin service ─────────────────────────────

async fn run_status(server: &MockServer, extra: &[&str]) -> std::process::Output {
    let mut cmd = offline_cmd();
    cmd.args(["--admin-origin", &server.uri(), "status", PREVIEW_PAGE])
        .args(extra);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/adobe/blog/main/en/post"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webPath": "/en/post",
            "preview": { "status": 200 },
            "live": { "status": 404 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_status(&server, &["-o", "json"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let status: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["webPath"], json!("/en/post"));
    assert_eq!(status["live"]["status"], json!(404));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/adobe/blog/main/en/post"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output = run_status(&server, &[]).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("error_status_404_content"));
}

#[test]
fn test_status_unreachable_exit_code() {
    let output = offline_cmd()
        .args(["--admin-origin", "http://127.0.0.1:9", "--timeout", "2"])
        .args(["status", PREVIEW_PAGE])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    let text = combined_output(&output);
    assert!(
        text.contains("Could not reach the admin service"),
        "Expected connection error:\n{text}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/adobe/blog/main/en/post"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let output = run_status(&server, &[]).await;
    assert_eq!(output.status.code(), Some(3));
}
