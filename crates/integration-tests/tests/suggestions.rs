//! Integration tests for suggestion intake and moderation.
//!
//! Each test spawns its own server over an in-memory store.

use std::collections::HashSet;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::task::JoinSet;

use suggestion_box_integration_tests::TestServer;

async fn list(server: &TestServer, query: &str) -> Vec<Value> {
    let resp = server
        .client
        .get(server.url(&format!("/api/suggestions{query}")))
        .send()
        .await
        .expect("Failed to list suggestions");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to read list")
}

// ============================================================================
// Intake
// ============================================================================

#[tokio::test]
async fn test_submissions_get_sequential_labels() {
    let server = TestServer::spawn().await;

    for (i, expected) in ["A001", "A002", "A003"].iter().enumerate() {
        let created = server
            .submit(&json!({
                "suggestion": format!("Idea {i}"),
                "category": "Operations",
                "employeeId": "E-100",
            }))
            .await;
        assert_eq!(created["hash"], *expected);
        assert_eq!(created["status"], "unread");
        assert_eq!(created["employeeId"], "E-100");
        assert!(created["dateTime"].is_string());
    }

    let all = list(&server, "").await;
    let labels: Vec<&str> = all.iter().filter_map(|s| s["hash"].as_str()).collect();
    assert_eq!(labels, ["A001", "A002", "A003"]);
}

#[tokio::test]
async fn test_blank_employee_id_is_anonymous() {
    let server = TestServer::spawn().await;
    let created = server
        .submit(&json!({"suggestion": "Better coffee", "category": "Facilities", "employeeId": "  "}))
        .await;
    assert_eq!(created["employeeId"], "Anonymous");
}

#[tokio::test]
async fn test_concurrent_submissions_get_distinct_labels() {
    let server = TestServer::spawn().await;
    let mut tasks = JoinSet::new();

    for i in 0..25 {
        let client = server.client.clone();
        let url = server.url("/api/suggestions");
        tasks.spawn(async move {
            let resp = client
                .post(url)
                .json(&json!({"suggestion": format!("Concurrent {i}"), "category": "IT"}))
                .send()
                .await
                .expect("Failed to submit");
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = resp.json().await.expect("Failed to read body");
            body["hash"].as_str().expect("hash").to_owned()
        });
    }

    let mut labels = HashSet::new();
    while let Some(label) = tasks.join_next().await {
        assert!(labels.insert(label.expect("task panicked")));
    }
    assert_eq!(labels.len(), 25);
    assert!(labels.contains("A001"));
    assert!(labels.contains("A025"));
}

#[tokio::test]
async fn test_invalid_submissions_are_rejected() {
    let server = TestServer::spawn().await;

    for body in [
        json!({}),
        json!({"suggestion": "No category"}),
        json!({"category": "HR"}),
        json!({"suggestion": "   ", "category": "HR"}),
    ] {
        let resp = server
            .client
            .post(server.url("/api/suggestions"))
            .json(&body)
            .send()
            .await
            .expect("Failed to submit");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let error: Value = resp.json().await.expect("Failed to read error");
        assert!(error["message"].is_string());
    }

    let resp = server
        .client
        .post(server.url("/api/suggestions"))
        .header("content-type", "application/json")
        .body("{\"suggestion\":")
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(list(&server, "").await.is_empty());
}

#[tokio::test]
async fn test_categories() {
    let server = TestServer::spawn().await;
    let categories: Vec<String> = server
        .client
        .get(server.url("/api/suggestions/categories"))
        .send()
        .await
        .expect("Failed to get categories")
        .json()
        .await
        .expect("Failed to read categories");
    assert!(categories.iter().any(|c| c == "HR"));
    assert!(categories.iter().any(|c| c == "IT"));
}

#[tokio::test]
async fn test_trailing_slash_is_accepted() {
    let server = TestServer::spawn().await;
    let resp = server
        .client
        .get(server.url("/api/suggestions/"))
        .send()
        .await
        .expect("Failed to list");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Moderation
// ============================================================================

#[tokio::test]
async fn test_moderation_requires_valid_token() {
    let server = TestServer::spawn().await;
    server
        .submit(&json!({"suggestion": "Keep me", "category": "HR"}))
        .await;

    let resp = server
        .client
        .delete(server.url("/api/suggestions/1"))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .put(server.url("/api/suggestions/1/read"))
        .bearer_auth("not.a.token")
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .delete(server.url("/api/suggestions/1"))
        .header("authorization", "Token abc")
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .get(server.url("/api/suggestions/stats"))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(list(&server, "").await.len(), 1);
}

#[tokio::test]
async fn test_mark_and_filter() {
    let server = TestServer::spawn().await;
    let token = server.admin_token("mod@example.com").await;
    server
        .submit(&json!({"suggestion": "Fix the door", "category": "Facilities"}))
        .await;
    server
        .submit(&json!({"suggestion": "More monitors", "category": "IT"}))
        .await;

    let resp = server
        .client
        .put(server.url("/api/suggestions/2/read"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to mark");
    assert_eq!(resp.status(), StatusCode::OK);
    let marked: Value = resp.json().await.expect("Failed to read");
    assert_eq!(marked["status"], "read");
    assert_eq!(marked["hash"], "A002");

    let read = list(&server, "?status=read").await;
    assert_eq!(read.len(), 1);
    assert_eq!(read[0]["suggestion"], "More monitors");

    let facilities = list(&server, "?category=Facilities").await;
    assert_eq!(facilities.len(), 1);
    assert_eq!(facilities[0]["status"], "unread");

    let resp = server
        .client
        .get(server.url("/api/suggestions?status=archived"))
        .send()
        .await
        .expect("Failed to list");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .client
        .put(server.url("/api/suggestions/2/archived"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to mark");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .client
        .put(server.url("/api/suggestions/42/unread"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to mark");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_does_not_reuse_labels() {
    let server = TestServer::spawn().await;
    let token = server.admin_token("mod@example.com").await;
    server
        .submit(&json!({"suggestion": "First", "category": "HR"}))
        .await;
    server
        .submit(&json!({"suggestion": "Second", "category": "HR"}))
        .await;

    let resp = server
        .client
        .delete(server.url("/api/suggestions/2"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read");
    assert_eq!(body["message"], "Suggestion deleted successfully");

    let resp = server
        .client
        .delete(server.url("/api/suggestions/2"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let third = server
        .submit(&json!({"suggestion": "Third", "category": "HR"}))
        .await;
    assert_eq!(third["hash"], "A003");
}

#[tokio::test]
async fn test_stats() {
    let server = TestServer::spawn().await;
    let token = server.admin_token("mod@example.com").await;
    for category in ["HR", "HR", "IT"] {
        server
            .submit(&json!({"suggestion": "Something", "category": category}))
            .await;
    }
    server
        .client
        .put(server.url("/api/suggestions/1/read"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to mark");

    let stats: Value = server
        .client
        .get(server.url("/api/suggestions/stats"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get stats")
        .json()
        .await
        .expect("Failed to read stats");
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["unread"], 2);
    assert_eq!(stats["byCategory"]["HR"], 2);
    assert_eq!(stats["byCategory"]["IT"], 1);
}

// ============================================================================
// Surface
// ============================================================================

#[tokio::test]
async fn test_health_and_unknown_route() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .get(server.url("/health/ready"))
        .send()
        .await
        .expect("Failed to check readiness");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server
        .client
        .get(server.url("/api/nothing-here"))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to read");
    assert_eq!(body["message"], "Endpoint not found");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let server = TestServer::spawn().await;
    let origin = server.state.config().cors_origin.clone();

    let resp = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/api/suggestions"))
        .header("origin", &origin)
        .header("access-control-request-method", "POST")
        .send()
        .await
        .expect("Failed to send preflight");
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(origin.as_str())
    );
}
