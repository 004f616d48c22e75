use axum::{
    Json,
    extract::{Path, State},
};
use shelf_types::feed::UpdateBlock;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /feed — latest activity of everyone; `null` when there is none.
pub async fn global_feed(
    State(state): State<AppState>,
) -> Result<Json<Option<Vec<UpdateBlock>>>, ApiError> {
    // Run the blocking DB query off the async runtime
    let db = state.clone();
    let blocks = tokio::task::spawn_blocking(move || shelf_feed::global_feed(&db.db)).await??;

    Ok(Json(blocks))
}

/// GET /users/{user_id}/feed — latest activity authored by one user.
pub async fn user_feed(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Option<Vec<UpdateBlock>>>, ApiError> {
    let db = state.clone();
    let blocks =
        tokio::task::spawn_blocking(move || shelf_feed::user_feed(&db.db, &user_id)).await??;

    Ok(Json(blocks))
}
