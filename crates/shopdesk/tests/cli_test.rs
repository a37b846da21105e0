//! Integration tests for the `shopdesk` CLI binary.
//!
//! Offline tests cover argument parsing, help, completions and the local
//! resource catalog. Backend flows run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `shopdesk` binary with env isolation.
///
/// Clears all `SHOPDESK_*` env vars and points config and data
/// directories into `home` so tests never touch real configuration.
fn shopdesk_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("shopdesk");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("SHOPDESK_PROFILE")
        .env_remove("SHOPDESK_API_URL")
        .env_remove("SHOPDESK_OUTPUT")
        .env_remove("SHOPDESK_INSECURE")
        .env_remove("SHOPDESK_TIMEOUT")
        .env_remove("SHOPDESK_SESSION_FILE")
        .env_remove("SHOPDESK_EMAIL")
        .env_remove("SHOPDESK_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// A scratch home plus a mock backend rooted at `/api`.
struct Backend {
    home: TempDir,
    server: MockServer,
}

impl Backend {
    async fn start() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            server: MockServer::start().await,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    fn session_file(&self) -> String {
        self.home.path().join("session.json").display().to_string()
    }

    /// Run the binary off the async runtime so the mock server keeps serving.
    async fn run(&self, args: &[&str]) -> std::process::Output {
        let mut cmd = shopdesk_cmd(self.home.path());
        cmd.args(["--api-url", &self.api_url(), "--session-file", &self.session_file()])
            .args(args)
            .env("SHOPDESK_EMAIL", "admin@shop.io")
            .env("SHOPDESK_PASSWORD", "s3cret");
        tokio::task::spawn_blocking(move || cmd.output().unwrap())
            .await
            .unwrap()
    }

    async fn mount_login(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"email": "admin@shop.io", "password": "s3cret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt-cli",
                "user": {"id": 1, "username": "admin", "email": "admin@shop.io", "roles": ["ADMIN"]}
            })))
            .mount(&self.server)
            .await;
    }

    async fn login(&self) {
        self.mount_login().await;
        let out = self.run(&["login"]).await;
        assert!(out.status.success(), "login failed:\n{}", combined_output(&out));
    }
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = shopdesk_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("e-commerce")
            .and(predicate::str::contains("login"))
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("dashboard")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shopdesk"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shopdesk"));
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_resources_catalog_lists_every_resource() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["resources", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("products")
                .and(predicate::str::contains("blog_posts"))
                .and(predicate::str::contains("payments")),
        );
}

#[test]
fn test_config_path_points_into_config_home() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_status_without_session_reports_logged_out() {
    let home = TempDir::new().unwrap();
    let session = home.path().join("session.json");
    shopdesk_cmd(home.path())
        .args(["status", "-o", "plain", "--session-file"])
        .arg(&session)
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

#[test]
fn test_list_without_login_is_auth_error() {
    let home = TempDir::new().unwrap();
    let session = home.path().join("session.json");
    let output = shopdesk_cmd(home.path())
        .args(["list", "products", "--session-file"])
        .arg(&session)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("shopdesk login"));
}

#[test]
fn test_unknown_resource_is_usage_error() {
    let home = TempDir::new().unwrap();
    let output = shopdesk_cmd(home.path())
        .args(["list", "widgets"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("widgets"));
}

#[test]
fn test_unsupported_operation_is_permission_error() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["delete", "carts", "3", "--yes"])
        .assert()
        .failure()
        .code(5);
}

#[test]
fn test_unknown_explicit_profile() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["status", "--profile", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

// ── Backend flows ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_writes_session_file() {
    let backend = Backend::start().await;
    backend.login().await;

    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(backend.session_file()).unwrap()).unwrap();
    assert_eq!(stored["token"], "jwt-cli");

    let status = backend.run(&["status", "-o", "plain"]).await;
    assert_eq!(String::from_utf8_lossy(&status.stdout).trim(), "true");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let backend = Backend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
        .mount(&backend.server)
        .await;

    let out = backend.run(&["login"]).await;
    assert_eq!(out.status.code(), Some(3));
    assert!(combined_output(&out).contains("Bad credentials"));
    assert!(!Path::new(&backend.session_file()).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_keeps_envelope() {
    let backend = Backend::start().await;
    backend.login().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("page", "1"))
        .and(query_param("size", "2"))
        .and(header("authorization", "Bearer jwt-cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"id": 3, "name": "Boots"}, {"id": 4, "name": "Hat"}],
            "totalElements": 14
        })))
        .mount(&backend.server)
        .await;

    let out = backend
        .run(&["list", "products", "--page", "2", "-l", "2", "-o", "json"])
        .await;
    assert!(out.status.success(), "{}", combined_output(&out));
    let page: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(page["total"], 14);
    assert_eq!(page["data"][1]["name"], "Hat");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_is_dropped() {
    let backend = Backend::start().await;
    backend.login().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "token expired"})))
        .mount(&backend.server)
        .await;

    let out = backend.run(&["list", "orders"]).await;
    assert_eq!(out.status.code(), Some(3));

    let status = backend.run(&["status", "-o", "plain"]).await;
    assert_eq!(String::from_utf8_lossy(&status.stdout).trim(), "false");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let backend = Backend::start().await;
    backend.login().await;

    Mock::given(method("DELETE"))
        .and(path("/api/products/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let out = backend.run(&["delete", "products", "9", "--yes"]).await;
    assert!(out.status.success(), "{}", combined_output(&out));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Deleted products 9"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_session() {
    let backend = Backend::start().await;
    backend.login().await;

    let out = backend.run(&["logout"]).await;
    assert!(out.status.success());

    let status = backend.run(&["status", "-o", "plain"]).await;
    assert_eq!(String::from_utf8_lossy(&status.stdout).trim(), "false");
}
