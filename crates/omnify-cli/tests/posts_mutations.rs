//! Integration tests for create/edit/delete, including the login gate.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_session(home: &std::path::Path) {
    fs::write(
        home.join("session.json"),
        serde_json::json!({
            "token": "jwt-mutation-token",
            "user": { "id": "u1", "email": "ada@example.com", "name": "Ada" }
        })
        .to_string(),
    )
    .unwrap();
}

#[tokio::test]
async fn test_create_requires_login() {
    let server = MockServer::start().await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("omnify")
        .env("OMNIFY_HOME", home.path())
        .env("OMNIFY_API_URL", server.uri())
        .args(["posts", "create", "--title", "T", "--content", "C"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    // Nothing reached the server.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/blogs"))
        .and(header("authorization", "Bearer jwt-mutation-token"))
        .and(body_json(serde_json::json!({
            "title": "T",
            "content": "C"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "9",
            "title": "T",
            "content": "C",
            "authorName": "Ada",
            "createdAt": "2025-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    write_session(home.path());

    cargo_bin_cmd!("omnify")
        .env("OMNIFY_HOME", home.path())
        .env("OMNIFY_API_URL", server.uri())
        .args(["posts", "create", "--title", "T", "--content", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created post 9"));
}

#[tokio::test]
async fn test_edit_patches_post() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/blogs/9"))
        .and(header("authorization", "Bearer jwt-mutation-token"))
        .and(body_json(serde_json::json!({
            "title": "T2",
            "content": "C2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "9",
            "title": "T2",
            "content": "C2",
            "authorName": "Ada",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-02-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    write_session(home.path());

    cargo_bin_cmd!("omnify")
        .env("OMNIFY_HOME", home.path())
        .env("OMNIFY_API_URL", server.uri())
        .args(["posts", "edit", "9", "--title", "T2", "--content", "C2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated post 9"));
}

#[tokio::test]
async fn test_delete_post() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/blogs/9"))
        .and(header("authorization", "Bearer jwt-mutation-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "Blog deleted successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    write_session(home.path());

    cargo_bin_cmd!("omnify")
        .env("OMNIFY_HOME", home.path())
        .env("OMNIFY_API_URL", server.uri())
        .args(["posts", "delete", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted post 9"));
}

#[tokio::test]
async fn test_delete_forbidden_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/blogs/9"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({ "message": "Not your post" })),
        )
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    write_session(home.path());

    cargo_bin_cmd!("omnify")
        .env("OMNIFY_HOME", home.path())
        .env("OMNIFY_API_URL", server.uri())
        .args(["posts", "delete", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not your post"));
}
