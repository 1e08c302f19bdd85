//! `PostgreSQL`-backed tests.
//!
//! These tests require a database reachable via `SUGGESTIONS_DATABASE_URL`
//! (or `DATABASE_URL`). Migrations are applied on startup.

use std::collections::HashSet;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::task::JoinSet;

use suggestion_box_integration_tests::TestServer;

#[tokio::test]
#[ignore = "Requires PostgreSQL (SUGGESTIONS_DATABASE_URL)"]
async fn test_postgres_concurrent_labels_are_unique() {
    let server = TestServer::spawn_postgres()
        .await
        .expect("SUGGESTIONS_DATABASE_URL must be set");
    let mut tasks = JoinSet::new();

    for i in 0..20 {
        let client = server.client.clone();
        let url = server.url("/api/suggestions");
        tasks.spawn(async move {
            let resp = client
                .post(url)
                .json(&json!({"suggestion": format!("pg {i}"), "category": "IT"}))
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
    assert_eq!(labels.len(), 20);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SUGGESTIONS_DATABASE_URL)"]
async fn test_postgres_admin_roundtrip() {
    let server = TestServer::spawn_postgres()
        .await
        .expect("SUGGESTIONS_DATABASE_URL must be set");
    let email = format!("pg-{}@example.com", std::process::id());
    let token = server.admin_token(&email).await;

    let stats = server
        .client
        .get(server.url("/api/admin/stats"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get stats");
    assert_eq!(stats.status(), StatusCode::OK);
}
