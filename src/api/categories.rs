//! Category endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{category::CategoryDetailQuery, Category, CreateCategory, UpdateCategory},
};

use super::{ApiResponse, JsonBody, PathParam, QueryParams};

/// List all categories ordered by name
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories, in the `data` field", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = state.services.categories.list().await?;
    Ok(Json(ApiResponse::data(categories)))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID"), CategoryDetailQuery),
    responses(
        (status = 200, description = "Category details, in the `data` field", body = Category),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
    QueryParams(query): QueryParams<CategoryDetailQuery>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = state.services.categories.get(id, query.include_books).await?;
    Ok(Json(ApiResponse::data(category)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid category data", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    JsonBody(data): JsonBody<CreateCategory>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let category = state.services.categories.create(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(category, "Category created successfully")),
    ))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Invalid category data", body = crate::error::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(data): JsonBody<UpdateCategory>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = state.services.categories.update(id, &data).await?;
    Ok(Json(ApiResponse::with_message(
        category,
        "Category updated successfully",
    )))
}

/// Delete a category; its books are kept
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    let category = state.services.categories.delete(id).await?;
    Ok(Json(ApiResponse::message(format!(
        "Category \"{}\" deleted successfully",
        category.name
    ))))
}
