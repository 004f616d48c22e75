use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use shelf_db::models::{BookRow, ReadingBookRow, UpdateRow};
use shelf_types::api::{LatestUpdateQuery, ReadingBookResponse};
use shelf_types::feed::progress_label;
use shelf_types::models::{Book, ProgressUpdate, Shelf};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /users/{user_id}/reading — books on the user's reading shelf with
/// their newest update. An unknown user simply has an empty shelf.
pub async fn reading_books(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ReadingBookResponse>>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.get_reading_books(&user_id)).await??;

    Ok(Json(rows.into_iter().map(to_reading_book).collect()))
}

/// GET /saved-books/{saved_book_id}/latest-update?user_id= — the newest
/// update the user posted for that saved book, or `null`.
pub async fn latest_update(
    State(state): State<AppState>,
    Path(saved_book_id): Path<String>,
    Query(query): Query<LatestUpdateQuery>,
) -> Result<Json<Option<ProgressUpdate>>, ApiError> {
    if query.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id must not be empty".into()));
    }

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.get_last_update(&query.user_id, &saved_book_id)
    })
    .await??;

    Ok(Json(row.map(to_update)))
}

fn to_reading_book(row: ReadingBookRow) -> ReadingBookResponse {
    let ReadingBookRow { saved_book, book, last_update } = row;

    let shelf = saved_book.shelf.parse::<Shelf>().unwrap_or_else(|e| {
        warn!("Corrupt shelf on saved book '{}': {}", saved_book.id, e);
        Shelf::None
    });
    let book = to_book(book);
    let last_update = last_update.map(to_update);
    let label = last_update
        .as_ref()
        .map(|u| progress_label(u.progress, book.page_count));

    ReadingBookResponse {
        saved_book_id: saved_book.id,
        shelf,
        book,
        last_update,
        progress_label: label,
    }
}

fn to_book(row: BookRow) -> Book {
    Book {
        created_at: timestamp(row.created_at, "book", &row.id),
        id: row.id,
        name: row.name,
        authors: row.authors,
        page_count: row.page_count,
        thumbnail_url: row.thumbnail_url,
    }
}

fn to_update(row: UpdateRow) -> ProgressUpdate {
    ProgressUpdate {
        created_at: timestamp(row.created_at, "update", &row.id),
        id: row.id,
        saved_book_id: row.saved_book_id,
        user_id: row.user_id,
        progress: row.progress,
        content: row.content,
    }
}

fn timestamp(millis: i64, kind: &str, id: &str) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(|| {
        warn!("Corrupt created_at {} on {} '{}'", millis, kind, id);
        DateTime::default()
    })
}
