//! Integration tests for the HTTP surface.
//! Boots the router on a random port with an in-memory store and drives it
//! with reqwest: auth gating, status codes, ordering and cascade delete.

use std::sync::Arc;

use quire_api::config::AppConfig;
use quire_api::routes::build_app;
use quire_api::state::AppState;
use quire_core::events::EventBus;
use quire_core::store::{KvStore, MemoryStore};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Helper: start the server on a random port and return (base_url, store).
async fn start_test_server() -> (String, MemoryStore) {
    let store = MemoryStore::new();
    let config = AppConfig {
        jwt_secret: "test-secret".to_string(),
        ..AppConfig::default()
    };
    let state = AppState::new(Arc::new(store.clone()), config, EventBus::new(64));

    let app = build_app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), store)
}

/// Helper: provision the admin and return a bearer token.
async fn admin_token(base_url: &str) -> String {
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base_url}/api/auth/setup"))
        .json(&json!({
            "email": "admin@example.com",
            "password": "correct horse",
            "name": "Admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({
            "email": "admin@example.com",
            "password": "correct horse",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert!(body.get("expiresAt").is_some());
    assert!(body["account"].get("passwordHash").is_none());
    body["token"].as_str().unwrap().to_string()
}

async fn create_article(base_url: &str, token: &str, body: Value) -> Value {
    let resp = reqwest::Client::new()
        .post(format!("{base_url}/api/articles"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn health_and_ping() {
    let (base_url, _) = start_test_server().await;

    let body: Value = reqwest::get(format!("{base_url}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");

    let resp = reqwest::get(format!("{base_url}/ping")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn cross_origin_requests_get_cors_headers() {
    let (base_url, _) = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base_url}/ping"))
        .header("Origin", "https://reader.example")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let resp = client
        .request(reqwest::Method::OPTIONS, format!("{base_url}/api/articles"))
        .header("Origin", "https://reader.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let allowed = resp.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_ascii_uppercase();
    assert!(allowed.contains("POST"));
    assert!(allowed.contains("DELETE"));
}

#[tokio::test]
async fn mutations_without_credentials_are_unauthorized() {
    let (base_url, store) = start_test_server().await;
    let client = reqwest::Client::new();

    let attempts = [
        client
            .post(format!("{base_url}/api/articles"))
            .json(&json!({"title": "A", "content": "hello world"})),
        client
            .put(format!("{base_url}/api/articles/some-id"))
            .json(&json!({"title": "B"})),
        client.delete(format!("{base_url}/api/articles/some-id")),
        client.delete(format!("{base_url}/api/articles/some-id/comments/c1")),
        client
            .post(format!("{base_url}/api/articles"))
            .header("Authorization", "Bearer not-a-token")
            .json(&json!({"title": "A", "content": "hello world"})),
        client
            .post(format!("{base_url}/api/articles"))
            .header("Authorization", "Token abc")
            .json(&json!({"title": "A", "content": "hello world"})),
    ];

    for request in attempts {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["type"], "unauthorized");
        assert_eq!(body["error"]["statusCode"], 401);
    }

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn rejected_credentials_leave_existing_records_untouched() {
    let (base_url, store) = start_test_server().await;
    let client = reqwest::Client::new();
    let token = admin_token(&base_url).await;

    let post = create_article(&base_url, &token, json!({"title": "P", "content": "Body"})).await;
    let post_id = post["id"].as_str().unwrap();
    let resp = client
        .post(format!("{base_url}/api/articles/{post_id}/comments"))
        .json(&json!({"name": "Ann", "content": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = resp.json().await.unwrap();
    let comment_id = comment["id"].as_str().unwrap();

    let article_url = format!("{base_url}/api/articles/{post_id}");
    let comment_url = format!("{article_url}/comments/{comment_id}");

    for auth in [None, Some("Bearer not-a-token")] {
        let attempts = [
            client
                .put(&article_url)
                .json(&json!({"title": "Hijacked", "content": "gone"})),
            client.delete(&article_url),
            client.delete(&comment_url),
        ];
        for request in attempts {
            let request = match auth {
                Some(value) => request.header("Authorization", value),
                None => request,
            };
            let resp = request.send().await.unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "auth: {auth:?}");
            let body: Value = resp.json().await.unwrap();
            assert_eq!(body["error"]["type"], "unauthorized");
        }
    }

    let fetched: Value = reqwest::get(&article_url)
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, post);

    let comments: Vec<Value> = reqwest::get(format!("{article_url}/comments"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(comments, vec![comment.clone()]);
    assert_eq!(store.scan_prefix("comment:").await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreadable_bodies_use_the_error_envelope() {
    let (base_url, store) = start_test_server().await;
    let client = reqwest::Client::new();
    let token = admin_token(&base_url).await;

    let attempts = [
        // Wrongly typed field.
        client
            .post(format!("{base_url}/api/articles/missing/comments"))
            .json(&json!({"name": 1, "content": "hi"})),
        // No content type.
        client
            .post(format!("{base_url}/api/articles/missing/comments"))
            .body(r#"{"name":"Ann","content":"hi"}"#),
        // Syntactically broken JSON.
        client
            .post(format!("{base_url}/api/articles"))
            .bearer_auth(&token)
            .header("Content-Type", "application/json")
            .body(r#"{"title": "A", "content": "#),
    ];

    for request in attempts {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["type"], "badRequest");
        assert_eq!(body["error"]["statusCode"], 400);
        assert!(body["error"]["message"].is_string());
    }

    assert!(store.scan_prefix("article:").await.unwrap().is_empty());
    assert!(store.scan_prefix("comment:").await.unwrap().is_empty());
}

#[tokio::test]
async fn article_lifecycle_scenario() {
    let (base_url, store) = start_test_server().await;
    let client = reqwest::Client::new();
    let token = admin_token(&base_url).await;

    let first = create_article(
        &base_url,
        &token,
        json!({"title": "A", "content": "hello world"}),
    )
    .await;
    assert_eq!(first["excerpt"], "hello world...");
    assert_eq!(first["imageUrl"], Value::Null);
    assert!(first["authorId"].is_string());

    let second = create_article(
        &base_url,
        &token,
        json!({"title": "B", "content": "second post"}),
    )
    .await;

    let listed: Vec<Value> = reqwest::get(format!("{base_url}/api/articles"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<_> = listed.iter().map(|a| a["id"].clone()).collect();
    assert_eq!(ids, vec![second["id"].clone(), first["id"].clone()]);

    // Anonymous comment on the first article.
    let first_id = first["id"].as_str().unwrap();
    let resp = client
        .post(format!("{base_url}/api/articles/{first_id}/comments"))
        .json(&json!({"name": "Reader", "content": "Nice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .delete(format!("{base_url}/api/articles/{first_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["success"], true);
    assert_eq!(ack["removedComments"], 1);

    let listed: Vec<Value> = reqwest::get(format!("{base_url}/api/articles"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], second["id"]);

    let comments: Vec<Value> =
        reqwest::get(format!("{base_url}/api/articles/{first_id}/comments"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    assert!(comments.is_empty());
    assert!(store.scan_prefix("comment:").await.unwrap().is_empty());

    let resp = reqwest::get(format!("{base_url}/api/articles/{first_id}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_article_validation_is_bad_request() {
    let (base_url, _) = start_test_server().await;
    let token = admin_token(&base_url).await;

    let resp = reqwest::Client::new()
        .post(format!("{base_url}/api/articles"))
        .bearer_auth(&token)
        .json(&json!({"title": "No content"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["type"], "badRequest");

    let listed: Vec<Value> = reqwest::get(format!("{base_url}/api/articles"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn partial_update_over_http() {
    let (base_url, _) = start_test_server().await;
    let token = admin_token(&base_url).await;
    let created = create_article(
        &base_url,
        &token,
        json!({
            "title": "Old",
            "content": "Body",
            "imageUrl": "https://img",
            "audioUrl": "https://aud",
        }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let resp = reqwest::Client::new()
        .put(format!("{base_url}/api/articles/{id}"))
        .bearer_auth(&token)
        .json(&json!({"title": "New", "imageUrl": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();

    assert_eq!(updated["title"], "New");
    assert_eq!(updated["content"], "Body");
    assert_eq!(updated["imageUrl"], Value::Null);
    assert_eq!(updated["audioUrl"], "https://aud");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let resp = reqwest::Client::new()
        .put(format!("{base_url}/api/articles/missing"))
        .bearer_auth(&token)
        .json(&json!({"title": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_flow() {
    let (base_url, store) = start_test_server().await;
    let client = reqwest::Client::new();
    let token = admin_token(&base_url).await;
    let post = create_article(&base_url, &token, json!({"title": "P", "content": "Body"})).await;
    let post_id = post["id"].as_str().unwrap();

    // Missing article.
    let resp = client
        .post(format!("{base_url}/api/articles/missing/comments"))
        .json(&json!({"name": "Ann", "content": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(store.scan_prefix("comment:").await.unwrap().is_empty());

    // Missing name.
    let resp = client
        .post(format!("{base_url}/api/articles/{post_id}/comments"))
        .json(&json!({"content": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut created = Vec::new();
    for (name, content) in [("Ann", "first"), ("Bob", "second")] {
        let resp = client
            .post(format!("{base_url}/api/articles/{post_id}/comments"))
            .json(&json!({"name": name, "content": content}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        created.push(resp.json::<Value>().await.unwrap());
    }

    let listed: Vec<Value> = reqwest::get(format!("{base_url}/api/articles/{post_id}/comments"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = listed.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Ann", "Bob"]);

    let comment_id = created[0]["id"].as_str().unwrap();
    let url = format!("{base_url}/api/articles/{post_id}/comments/{comment_id}");

    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client.delete(&url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.delete(&url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn setup_is_one_shot_and_login_rejects_bad_password() {
    let (base_url, _) = start_test_server().await;
    let client = reqwest::Client::new();
    let token = admin_token(&base_url).await;

    let resp = client
        .post(format!("{base_url}/api/auth/setup"))
        .json(&json!({
            "email": "intruder@example.com",
            "password": "whatever123",
            "name": "Intruder",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({"email": "admin@example.com", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let me: Value = client
        .get(format!("{base_url}/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["email"], "admin@example.com");
}
