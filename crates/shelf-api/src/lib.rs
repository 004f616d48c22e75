pub mod error;
pub mod feed;
pub mod reading;
pub mod state;

use axum::{Router, routing::get};

pub use state::{AppState, AppStateInner};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/feed", get(feed::global_feed))
        .route("/users/{user_id}/feed", get(feed::user_feed))
        .route("/users/{user_id}/reading", get(reading::reading_books))
        .route(
            "/saved-books/{saved_book_id}/latest-update",
            get(reading::latest_update),
        )
        .with_state(state)
}
