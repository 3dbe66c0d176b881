//! Integration tests for `perspectiq login` and `perspectiq sessions` against
//! a mock backend.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Creates a temp PERSPECTIQ_HOME with stored credentials.
fn logged_in_home() -> TempDir {
    let home = TempDir::new().expect("create temp home");
    fs::write(
        home.path().join("auth.toml"),
        "token = \"tok-123\"\nuser_id = 7\nusername = \"alice\"\nrole = \"pm\"\n",
    )
    .unwrap();
    home
}

fn history_body() -> serde_json::Value {
    json!({
        "sessions": [
            {
                "id": 1,
                "scenario": "Scope cut before launch",
                "persona": "Engineering Lead",
                "created_at": "2024-03-01T09:00:00",
                "summary": null,
                "evaluation": null,
                "message_count": 4
            },
            {
                "id": 2,
                "scenario": "",
                "persona": "CFO",
                "created_at": "2024-03-02T10:00:00",
                "summary": "Budget approved.",
                "evaluation": null,
                "message_count": 6
            }
        ]
    })
}

#[tokio::test]
async fn test_login_stores_credentials() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "alice", "role": "pm", "age": 31})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-123",
            "user_id": 7,
            "username": "alice",
            "role": "pm"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("perspectiq")
        .env("PERSPECTIQ_HOME", home.path())
        .env_remove("PERSPECTIQ_API_URL")
        .args(["--api-url", &mock_server.uri()])
        .args(["login", "--username", " alice ", "--role", "pm", "--age", "31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice (pm)"));

    let stored = fs::read_to_string(home.path().join("auth.toml")).unwrap();
    assert!(stored.contains("tok-123"));
    assert!(stored.contains("alice"));
}

#[tokio::test]
async fn test_login_conflict_shows_friendly_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Username already taken"})),
        )
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("perspectiq")
        .env("PERSPECTIQ_HOME", home.path())
        .env_remove("PERSPECTIQ_API_URL")
        .args(["--api-url", &mock_server.uri()])
        .args(["login", "--username", "alice", "--role", "pm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Username already taken. Please choose another.",
        ));

    assert!(!home.path().join("auth.toml").exists());
}

#[tokio::test]
async fn test_sessions_list_newest_first_with_bearer_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = cargo_bin_cmd!("perspectiq")
        .env("PERSPECTIQ_HOME", home.path())
        .env_remove("PERSPECTIQ_API_URL")
        .args(["--api-url", &mock_server.uri()])
        .args(["sessions", "list"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let newest = stdout.find("#2").expect("session 2 listed");
    let oldest = stdout.find("#1").expect("session 1 listed");
    assert!(newest < oldest, "expected newest first:\n{stdout}");
    assert!(stdout.contains("Untitled Negotiation"));
    assert!(stdout.contains("2024-03-01"));
}

#[tokio::test]
async fn test_sessions_show_prints_summary_and_transcript() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/messages/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                {"role": "user", "content": "We need to cut scope."},
                {"role": "assistant", "content": "Which features?", "persona": null}
            ]
        })))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("perspectiq")
        .env("PERSPECTIQ_HOME", home.path())
        .env_remove("PERSPECTIQ_API_URL")
        .args(["--api-url", &mock_server.uri()])
        .args(["sessions", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No summary available for this session yet.",
        ))
        .stdout(predicate::str::contains("You: We need to cut scope."))
        .stdout(predicate::str::contains("Engineering Lead: Which features?"));
}

#[tokio::test]
async fn test_sessions_delete_calls_backend() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home();
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/chat/delete/5"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Session deleted", "session_id": 5})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("perspectiq")
        .env("PERSPECTIQ_HOME", home.path())
        .env_remove("PERSPECTIQ_API_URL")
        .args(["--api-url", &mock_server.uri()])
        .args(["sessions", "delete", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted session 5."));
}

#[test]
fn test_sessions_require_login() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("perspectiq")
        .env("PERSPECTIQ_HOME", home.path())
        .args(["--api-url", "http://127.0.0.1:9"])
        .args(["sessions", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}
