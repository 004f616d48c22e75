use serde::{Deserialize, Serialize};

use crate::models::{Book, ProgressUpdate, Shelf};

// -- Reading shelf --

/// A saved book on the `reading` shelf together with its newest update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingBookResponse {
    pub saved_book_id: String,
    pub shelf: Shelf,
    pub book: Book,
    pub last_update: Option<ProgressUpdate>,
    pub progress_label: Option<String>,
}

// -- Updates --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatestUpdateQuery {
    pub user_id: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
