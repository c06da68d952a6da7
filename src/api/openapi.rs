//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, categories, health, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booklib API",
        version = "0.3.0",
        description = "Book library REST API. Successful responses wrap their payload as \
                       `{\"success\": true, \"message\"?, \"data\"?}`."
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::api_info,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Books
            crate::models::Book,
            crate::models::BookSummary,
            crate::models::BookPage,
            crate::models::CreateBook,
            crate::models::UpdateBook,
            // Authors
            crate::models::Author,
            crate::models::AuthorPage,
            crate::models::CreateAuthor,
            crate::models::UpdateAuthor,
            // Categories
            crate::models::Category,
            crate::models::CategoryRef,
            crate::models::CreateCategory,
            crate::models::UpdateCategory,
            // Stats
            crate::models::LibraryStats,
            crate::models::AuthorBookCount,
            crate::models::CategoryBookCount,
            // Health
            health::HealthResponse,
            health::ApiInfo,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book management"),
        (name = "authors", description = "Author management"),
        (name = "categories", description = "Category management"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
