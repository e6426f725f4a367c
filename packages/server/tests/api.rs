//! HTTP-level tests driving the router with in-memory dependencies.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use ai_client::testing::MockProducer;
use ai_client::ProviderRegistry;
use server_core::server::build_app;
use server_core::store::{ContentKind, ContentStore, MemoryContentStore, NewContent};
use server_core::tasks::TaskWorkerConfig;

fn test_app() -> (Router, Arc<MemoryContentStore>) {
    let store = Arc::new(MemoryContentStore::new());

    let mut registry = ProviderRegistry::new();
    registry.register(
        "gemini",
        Arc::new(
            MockProducer::new()
                .with_response("Title: Reusable rockets\nBoosters land now.")
                .with_response("The finished post."),
        ),
    );

    let (app, _shutdown) = build_app(
        store.clone(),
        Arc::new(registry),
        TaskWorkerConfig {
            max_concurrency: 4,
            worker_id: "api-test-worker".into(),
        },
    );
    (app, store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn seed_record(store: &Arc<MemoryContentStore>, idea: Option<&str>) -> Uuid {
    store
        .create(NewContent {
            kind: ContentKind::Idea,
            provider: "gemini".into(),
            input_text: "rockets".into(),
            reference_posts: vec![],
            idea: idea.map(String::from),
            posts: vec![],
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn health_is_always_healthy() {
    let (app, _store) = test_app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn generate_returns_a_pending_task_handle() {
    let (app, _store) = test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/generate",
            json!({"reference_keywords": "rockets", "provider": "gemini"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert!(body["task_id"].is_string());
    assert_eq!(body["message"], "Content generation started");
}

#[tokio::test]
async fn generate_rejects_empty_keywords() {
    let (app, _store) = test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/generate",
            json!({"reference_keywords": "   ", "provider": "gemini"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn generate_rejects_unknown_provider() {
    let (app, _store) = test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/generate",
            json!({"reference_keywords": "rockets", "provider": "bogus"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("bogus"));
}

#[tokio::test]
async fn task_polling_reaches_succeeded() {
    let (app, store) = test_app();

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/generate",
            json!({"reference_keywords": "rockets", "provider": "gemini"}),
        ),
    )
    .await;
    let task_id = body["task_id"].as_str().unwrap().to_string();

    let final_body = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let (status, body) = send(&app, get(&format!("/task/{}", task_id))).await;
            assert_eq!(status, StatusCode::OK);
            match body["status"].as_str().unwrap() {
                "succeeded" | "failed" => return body,
                _ => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
    })
    .await
    .expect("task should reach a terminal state");

    assert_eq!(final_body["status"], "succeeded");
    let content_id: Uuid = final_body["result"]["content_id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(final_body["result"]["text"]
        .as_str()
        .unwrap()
        .contains("Title:"));

    // The record is fetchable over the API too.
    let (status, record) = send(&app, get(&format!("/content/{}", content_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["kind"], "idea");

    // And the store has it with the same idea text.
    let stored = store.get(content_id).await.unwrap().unwrap();
    assert!(stored.idea.unwrap().contains("Title:"));
}

#[tokio::test]
async fn unknown_task_is_404() {
    let (app, _store) = test_app();

    let (status, _) = send(&app, get(&format!("/task/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contents_crud_round_trip() {
    let (app, store) = test_app();
    let id = seed_record(&store, Some("Title: Stored idea")).await;

    // Point read
    let (status, record) = send(&app, get(&format!("/content/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["idea"], "Title: Stored idea");

    // List
    let (status, page) = send(&app, get("/contents?skip=0&limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.as_array().unwrap().len(), 1);

    // Shallow merge-update
    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/content/{}", id),
            json!({"idea": "Title: Edited idea"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["idea"], "Title: Edited idea");
    assert_eq!(updated["input_text"], "rockets");

    // Delete
    let (status, deleted) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/content/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted"], true);

    let (status, _) = send(&app, get(&format!("/content/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_content_is_404_everywhere() {
    let (app, _store) = test_app();
    let missing = Uuid::new_v4();

    let (status, _) = send(&app, get(&format!("/content/{}", missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/content/{}", missing), json!({"idea": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/content/{}", missing))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/regenerate-post",
            json!({"content_id": missing, "provider": "gemini"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn regenerate_requires_an_idea() {
    let (app, store) = test_app();
    let id = seed_record(&store, None).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/regenerate-post",
            json!({"content_id": id, "provider": "gemini"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no idea"));
}

#[tokio::test]
async fn regenerate_appends_a_post_variant() {
    let (app, store) = test_app();
    let id = seed_record(&store, Some("Title: Stored idea")).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/regenerate-post",
            json!({"content_id": id, "provider": "gemini"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let record = store.get(id).await.unwrap().unwrap();
            if record.posts.len() == 1 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("regenerated post should be appended");
}
