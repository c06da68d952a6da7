//! Statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::LibraryStats};

use super::ApiResponse;

/// Get collection statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Collection statistics, in the `data` field", body = LibraryStats)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ApiResponse<LibraryStats>>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(ApiResponse::data(stats)))
}
