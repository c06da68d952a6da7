//! Router tests against the in-memory backend

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use booklib_server::{api, repository::Repository, seed, AppConfig, AppState};

fn app() -> Router {
    api::router(AppState::new(AppConfig::default(), Repository::in_memory()))
}

async fn seeded_app() -> Router {
    let state = AppState::new(AppConfig::default(), Repository::in_memory());
    seed::seed_sample_data(&state.services).await.unwrap();
    api::router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_api_info() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"].as_array().unwrap().len() > 10);
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Resource not found");
}

#[tokio::test]
async fn test_author_book_lifecycle() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/authors",
        Some(json!({"name": "Robert C. Martin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Author created successfully");
    assert_eq!(body["data"]["id"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({
            "title": "Clean Code",
            "isbn": "9780132350884",
            "year": 2008,
            "author_id": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["author_name"], "Robert C. Martin");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({
            "title": "Clean Code again",
            "isbn": "978-0-13-235088-4",
            "year": 2009,
            "author_id": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "A book with ISBN 9780132350884 already exists");

    let (status, body) = send(&app, Method::DELETE, "/api/v1/authors/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Cannot delete author with existing books. Delete 1 book(s) first."
    );

    let (status, body) = send(&app, Method::DELETE, "/api/v1/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book \"Clean Code\" deleted successfully");
    assert!(body.get("data").is_none());

    let (status, body) = send(&app, Method::DELETE, "/api/v1/authors/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Author \"Robert C. Martin\" deleted successfully");

    let (status, _) = send(&app, Method::GET, "/api/v1/authors/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_and_year_filters_intersect() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/books?search=clean", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = send(&app, Method::GET, "/api/v1/books?search=CLEAN&year=2008", None).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["isbn"], "9780132350884");

    let (_, body) = send(&app, Method::GET, "/api/v1/books?search=orwell", None).await;
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn test_category_filter() {
    let app = seeded_app().await;

    let (_, body) = send(&app, Method::GET, "/api/v1/books?category=science", None).await;
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/books?category=programming&search=martin",
        None,
    )
    .await;
    assert_eq!(body["data"]["total"], 3);
}

#[tokio::test]
async fn test_pagination_metadata() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/books?page=2&per_page=3", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total"], 8);
    assert_eq!(data["pages"], 3);
    assert_eq!(data["page"], 2);
    assert_eq!(data["has_next"], true);
    assert_eq!(data["has_prev"], true);
    assert_eq!(data["items"][0]["id"], 4);

    let (status, body) = send(&app, Method::GET, "/api/v1/books?page=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_query_parameters() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/books?per_page=101", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, Method::GET, "/api/v1/books?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/v1/books?year=recent", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_non_numeric_path_id() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/books/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = app();
    let (status, body) = send_raw(&app, Method::POST, "/api/v1/authors", "{\"name\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_book_validation_errors() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Short ISBN", "isbn": "12345", "year": 2000, "author_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ISBN must be 10 or 13 digits");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Future", "isbn": "1234567890", "year": 9999, "author_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "No year", "isbn": "1234567890", "year": "2000", "author_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Orphan", "isbn": "1234567890", "year": 2000, "author_id": 99})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Author with ID 99 not found");
}

#[tokio::test]
async fn test_partial_book_update() {
    let app = seeded_app().await;
    let (_, before) = send(&app, Method::GET, "/api/v1/books/1", None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/books/1",
        Some(json!({"pages": 500, "description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");

    let after = &body["data"];
    assert_eq!(after["pages"], 500);
    assert_eq!(after["description"], Value::Null);
    assert_eq!(after["title"], before["data"]["title"]);
    assert_eq!(after["isbn"], before["data"]["isbn"]);
    assert_eq!(after["created_at"], before["data"]["created_at"]);
    assert!(after["updated_at"].is_string());
    assert_eq!(before["data"]["updated_at"], Value::Null);
}

#[tokio::test]
async fn test_author_detail_includes_books_by_default() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/authors/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["books"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/api/v1/authors/1?include_books=false", None).await;
    assert!(body["data"].get("books").is_none());
    assert_eq!(body["data"]["book_count"], 2);
}

#[tokio::test]
async fn test_categories_crud() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Business", "Fiction", "History", "Programming", "Science"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(json!({"name": "History"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Category 'History' already exists");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(json!({"name": "Philosophy", "description": "Thinking about thinking"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/categories/{}", id),
        Some(json!({"description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], Value::Null);

    let (status, body) = send(&app, Method::GET, "/api/v1/categories/4?include_books=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["books"].as_array().unwrap().len(), 4);

    let (status, body) = send(&app, Method::DELETE, "/api/v1/categories/4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category \"History\" deleted successfully");

    let (_, body) = send(&app, Method::GET, "/api/v1/books?search=orwell", None).await;
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn test_stats() {
    let app = seeded_app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["total_books"], 8);
    assert_eq!(stats["total_authors"], 5);
    assert_eq!(stats["total_categories"], 5);
    assert_eq!(stats["earliest_year"], 1945);
    assert_eq!(stats["latest_year"], 2017);
    assert_eq!(stats["average_books_per_author"], 1.6);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/books").is_some());
}
