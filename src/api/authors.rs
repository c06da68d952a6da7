//! Author endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        author::{AuthorDetailQuery, AuthorQuery},
        Author, AuthorPage, CreateAuthor, Page, UpdateAuthor,
    },
};

use super::{ApiResponse, JsonBody, PathParam, QueryParams};

/// List authors ordered by name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "One page of authors, in the `data` field", body = AuthorPage),
        (status = 400, description = "Invalid pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    QueryParams(query): QueryParams<AuthorQuery>,
) -> AppResult<Json<ApiResponse<Page<Author>>>> {
    let page = state.services.authors.list(&query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// Get an author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID"), AuthorDetailQuery),
    responses(
        (status = 200, description = "Author details, in the `data` field", body = Author),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
    QueryParams(query): QueryParams<AuthorDetailQuery>,
) -> AppResult<Json<ApiResponse<Author>>> {
    let author = state.services.authors.get(id, query.include_books).await?;
    Ok(Json(ApiResponse::data(author)))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid author data", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    JsonBody(data): JsonBody<CreateAuthor>,
) -> AppResult<(StatusCode, Json<ApiResponse<Author>>)> {
    let author = state.services.authors.create(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(author, "Author created successfully")),
    ))
}

/// Update an author; only supplied fields change
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid author data", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(data): JsonBody<UpdateAuthor>,
) -> AppResult<Json<ApiResponse<Author>>> {
    let author = state.services.authors.update(id, &data).await?;
    Ok(Json(ApiResponse::with_message(author, "Author updated successfully")))
}

/// Delete an author who has no books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Author still has books", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    let author = state.services.authors.delete(id).await?;
    Ok(Json(ApiResponse::message(format!(
        "Author \"{}\" deleted successfully",
        author.name
    ))))
}
