/// Database row types — these map directly to SQLite rows.
/// Distinct from shelf-types API models to keep the DB layer independent.
/// Timestamps are epoch milliseconds.

pub struct UserRow {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: i64,
}

pub struct BookRow {
    pub id: String,
    pub name: Option<String>,
    pub authors: Option<String>,
    pub page_count: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub created_at: i64,
}

pub struct SavedBookRow {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub shelf: String,
    pub created_at: i64,
    pub updated_at: i64,
}

pub struct UpdateRow {
    pub id: String,
    pub saved_book_id: String,
    pub user_id: String,
    pub progress: i64,
    pub content: String,
    pub created_at: i64,
}

/// A saved book joined with its book and, if any, its newest update.
pub struct ReadingBookRow {
    pub saved_book: SavedBookRow,
    pub book: BookRow,
    pub last_update: Option<UpdateRow>,
}

/// One update joined with its author, saved book and book.
///
/// `last_update_at` is the newest `created_at` of the (user, saved book)
/// group the row belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    pub last_update_at: i64,
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
    pub saved_book_id: String,
    pub book_id: String,
    pub book_name: Option<String>,
    pub book_authors: Option<String>,
    pub book_page_count: Option<i64>,
    pub book_thumbnail_url: Option<String>,
    pub book_created_at: i64,
    pub update_id: String,
    pub update_created_at: i64,
    pub progress: i64,
    pub content: String,
}

impl FeedRow {
    pub fn group_key(&self) -> (&str, &str) {
        (&self.user_id, &self.saved_book_id)
    }
}
