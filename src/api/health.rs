//! Health check and API information endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::StorageBackend;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    /// `connected` or `disconnected`
    pub database: String,
    /// Storage backend in use
    pub backend: String,
    /// Version of the service
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ApiInfo {
    pub message: String,
    pub version: String,
    pub backend: String,
    pub documentation: String,
    pub endpoints: Vec<String>,
}

fn backend_name(backend: StorageBackend) -> String {
    match backend {
        StorageBackend::Memory => "memory".to_string(),
        StorageBackend::Postgres => "postgres".to_string(),
    }
}

/// Health check endpoint (checks storage connectivity)
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Storage is unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(state): State<crate::AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let backend = backend_name(state.config.database.backend);
    let version = env!("CARGO_PKG_VERSION").to_string();

    match state.services.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database: "connected".to_string(),
                backend,
                version,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    database: "disconnected".to_string(),
                    backend,
                    version,
                    error: Some("Storage backend is unreachable".to_string()),
                }),
            )
        }
    }
}

/// API information
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "API information", body = ApiInfo)
    )
)]
pub async fn api_info(State(state): State<crate::AppState>) -> Json<ApiInfo> {
    let endpoints = [
        "GET /api/v1/health",
        "GET /api/v1/books",
        "POST /api/v1/books",
        "GET /api/v1/books/:id",
        "PUT /api/v1/books/:id",
        "DELETE /api/v1/books/:id",
        "GET /api/v1/authors",
        "POST /api/v1/authors",
        "GET /api/v1/authors/:id",
        "PUT /api/v1/authors/:id",
        "DELETE /api/v1/authors/:id",
        "GET /api/v1/categories",
        "POST /api/v1/categories",
        "GET /api/v1/categories/:id",
        "PUT /api/v1/categories/:id",
        "DELETE /api/v1/categories/:id",
        "GET /api/v1/stats",
    ];

    Json(ApiInfo {
        message: "Book Library API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: backend_name(state.config.database.backend),
        documentation: "/swagger-ui".to_string(),
        endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
    })
}
