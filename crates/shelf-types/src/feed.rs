use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// "This user posted these updates about this book."
///
/// Computed fresh for every feed request and never persisted. All entries
/// of `updates` share one (user, saved book) pair and there is at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBlock {
    pub user: FeedUser,
    pub book: FeedBook,
    pub updates: Vec<FeedUpdate>,
}

impl UpdateBlock {
    /// Timestamp of the newest update in the block, the feed's sort key.
    pub fn last_update_at(&self) -> Option<DateTime<Utc>> {
        self.updates.iter().map(|u| u.created_at).max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedUser {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedBook {
    pub id: String,
    pub name: Option<String>,
    pub authors: Option<String>,
    pub thumbnail_url: Option<String>,
    pub page_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedUpdate {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub progress: i64,
    pub content: String,
}

/// Human-readable progress, e.g. `Page 42/300 (14 %)`.
///
/// Without a usable page count only the page is shown.
pub fn progress_label(progress: i64, page_count: Option<i64>) -> String {
    match page_count {
        Some(pages) if pages > 0 => {
            let percent = (progress as f64 * 100.0 / pages as f64).round() as i64;
            format!("Page {}/{} ({} %)", progress, pages, percent)
        }
        _ => format!("Page {}", progress),
    }
}
