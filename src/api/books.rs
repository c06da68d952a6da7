//! Book endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{Book, BookPage, BookQuery, CreateBook, Page, UpdateBook},
};

use super::{ApiResponse, JsonBody, PathParam, QueryParams};

/// List books with search, filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "One page of books, in the `data` field", body = BookPage),
        (status = 400, description = "Invalid query parameters", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    QueryParams(query): QueryParams<BookQuery>,
) -> AppResult<Json<ApiResponse<Page<Book>>>> {
    let page = state.services.books.list(&query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details, in the `data` field", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(ApiResponse::data(book)))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid book data", body = crate::error::ErrorResponse),
        (status = 404, description = "Author or category not found", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    JsonBody(data): JsonBody<CreateBook>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let book = state.services.books.create(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(book, "Book created successfully")),
    ))
}

/// Update a book; only supplied fields change
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid book data", body = crate::error::ErrorResponse),
        (status = 404, description = "Book, author or category not found", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(data): JsonBody<UpdateBook>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.books.update(id, &data).await?;
    Ok(Json(ApiResponse::with_message(book, "Book updated successfully")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    let book = state.services.books.delete(id).await?;
    Ok(Json(ApiResponse::message(format!(
        "Book \"{}\" deleted successfully",
        book.title
    ))))
}
