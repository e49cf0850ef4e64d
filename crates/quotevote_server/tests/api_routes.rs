use std::net::SocketAddr;
use std::path::Path;

use axum::{
    body::{to_bytes, Body},
    extract::connect_info::MockConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use quotevote_server::{app, config::Config, open_store, state::State};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app(db_dir: &Path, seed: bool, visitor: [u8; 4]) -> Router {
    let mut config = Config::from_lookup(|_| None).unwrap();
    config.db_path = db_dir.join("api.db");
    config.seed = seed;
    let store = open_store(&config).unwrap();
    app(State::new(config, store)).layer(MockConnectInfo(SocketAddr::from((visitor, 40000))))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
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

fn post_vote(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/vote")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upvotes_of(quotes: &Value, id: i64) -> i64 {
    quotes
        .as_array()
        .unwrap()
        .iter()
        .find(|quote| quote["id"] == id)
        .map(|quote| quote["upvotes"].as_i64().unwrap())
        .unwrap()
}

#[tokio::test]
async fn vote_lifecycle_reports_recorded_existing_and_updated() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), true, [1, 2, 3, 4]);

    let (status, before) = send(&app, get("/api/quotes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upvotes_of(&before, 1), 0);

    let (status, body) = send(&app, post_vote(json!({"quote_id": 1, "vote_type": "up"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Vote recorded"}));

    let (_, after) = send(&app, get("/api/quotes")).await;
    assert_eq!(upvotes_of(&after, 1), 1);
    assert_eq!(after[0]["id"], 1);

    let (_, body) = send(&app, post_vote(json!({"quote_id": 1, "vote_type": "up"}))).await;
    assert_eq!(body["message"], "Vote already exists");

    let (_, body) = send(&app, post_vote(json!({"quote_id": 1, "vote_type": "down"}))).await;
    assert_eq!(body["message"], "Vote updated");

    let (_, last) = send(&app, get("/api/quotes")).await;
    let quote = last
        .as_array()
        .unwrap()
        .iter()
        .find(|quote| quote["id"] == 1)
        .unwrap();
    assert_eq!(quote["upvotes"], 0);
    assert_eq!(quote["downvotes"], 1);
    assert_eq!(last.as_array().unwrap().last().unwrap()["id"], 1);
}

#[tokio::test]
async fn invalid_votes_map_to_client_errors() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), true, [5, 6, 7, 8]);

    let (status, body) = send(&app, post_vote(json!({"quote_id": 1, "vote_type": "meh"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");

    let (status, _) = send(&app, post_vote(json!({"vote_type": "up"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/vote")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");

    let (status, body) = send(&app, post_vote(json!({"quote_id": 999, "vote_type": "up"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (_, quotes) = send(&app, get("/api/quotes")).await;
    assert!(quotes
        .as_array()
        .unwrap()
        .iter()
        .all(|quote| quote["upvotes"] == 0 && quote["downvotes"] == 0));
}

#[tokio::test]
async fn quotes_filter_by_category() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), true, [1, 1, 1, 1]);

    let (status, body) = send(&app, get("/api/quotes?category=success")).await;
    assert_eq!(status, StatusCode::OK);
    let quotes = body.as_array().unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0]["category"], "success");
    assert_eq!(quotes[0]["author_name"], "Albert Einstein");

    let (_, all) = send(&app, get("/api/quotes")).await;
    assert_eq!(all.as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn quote_of_the_day_joins_author_or_reports_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let seeded = test_app(dir.path(), true, [1, 1, 1, 1]);
    let (status, body) = send(&seeded, get("/api/quote-of-the-day")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["author_name"].is_string());
    assert!(body["author_bio"].is_string());
    assert!(body["id"].as_i64().unwrap() >= 1);

    let empty_dir = tempfile::tempdir().unwrap();
    let empty = test_app(empty_dir.path(), false, [1, 1, 1, 1]);
    let (status, body) = send(&empty, get("/api/quote-of-the-day")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No quotes found");
}

#[tokio::test]
async fn authors_and_health_respond() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), true, [1, 1, 1, 1]);

    let (status, authors) = send(&app, get("/api/authors")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(authors.as_array().unwrap().len(), 7);
    assert_eq!(authors[0]["quote_count"], 2);

    let (status, health) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn distinct_peers_hold_independent_votes() {
    let dir = tempfile::tempdir().unwrap();
    let first = test_app(dir.path(), true, [10, 0, 0, 1]);
    let second = test_app(dir.path(), true, [10, 0, 0, 2]);

    send(&first, post_vote(json!({"quote_id": 3, "vote_type": "up"}))).await;
    let (_, body) = send(&second, post_vote(json!({"quote_id": 3, "vote_type": "up"}))).await;
    assert_eq!(body["message"], "Vote recorded");

    let (_, quotes) = send(&first, get("/api/quotes")).await;
    assert_eq!(upvotes_of(&quotes, 3), 2);
    assert_eq!(quotes[0]["id"], 3);
}
