//! In-memory [`FeedStore`] with the same grouping, ordering and limit
//! semantics as the SQLite query. Lets the feed pipeline run without a
//! database.

use std::cmp::Reverse;
use std::collections::HashMap;

use shelf_db::models::FeedRow;
use shelf_db::FeedQuery;
use shelf_types::models::{Book, ProgressUpdate, SavedBook, User};

use crate::FeedStore;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: Vec<User>,
    books: Vec<Book>,
    saved_books: Vec<SavedBook>,
    updates: Vec<ProgressUpdate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, user: User) -> &mut Self {
        self.users.push(user);
        self
    }

    pub fn add_book(&mut self, book: Book) -> &mut Self {
        self.books.push(book);
        self
    }

    pub fn add_saved_book(&mut self, saved_book: SavedBook) -> &mut Self {
        self.saved_books.push(saved_book);
        self
    }

    pub fn add_update(&mut self, update: ProgressUpdate) -> &mut Self {
        self.updates.push(update);
        self
    }

    /// Drop a book without touching what references it.
    pub fn remove_book(&mut self, book_id: &str) -> &mut Self {
        self.books.retain(|b| b.id != book_id);
        self
    }

    /// Every update joined with its author, saved book and book. Updates
    /// with a dangling reference are skipped, like an inner join.
    fn joined_rows(&self) -> Vec<FeedRow> {
        self.updates
            .iter()
            .filter_map(|update| {
                let user = self.users.iter().find(|u| u.id == update.user_id)?;
                let saved = self.saved_books.iter().find(|s| s.id == update.saved_book_id)?;
                let book = self.books.iter().find(|b| b.id == saved.book_id)?;
                Some(FeedRow {
                    last_update_at: 0,
                    user_id: user.id.clone(),
                    user_name: user.name.clone(),
                    user_image: user.image.clone(),
                    saved_book_id: saved.id.clone(),
                    book_id: book.id.clone(),
                    book_name: book.name.clone(),
                    book_authors: book.authors.clone(),
                    book_page_count: book.page_count,
                    book_thumbnail_url: book.thumbnail_url.clone(),
                    book_created_at: book.created_at.timestamp_millis(),
                    update_id: update.id.clone(),
                    update_created_at: update.created_at.timestamp_millis(),
                    progress: update.progress,
                    content: update.content.clone(),
                })
            })
            .collect()
    }
}

impl FeedStore for MemoryStore {
    fn feed_rows(&self, query: &FeedQuery) -> anyhow::Result<Vec<FeedRow>> {
        let user_filter = query.user_filter();

        let mut groups: HashMap<(String, String), Vec<FeedRow>> = HashMap::new();
        for row in self.joined_rows() {
            if user_filter.is_some_and(|id| id != row.user_id) {
                continue;
            }
            groups
                .entry((row.user_id.clone(), row.saved_book_id.clone()))
                .or_default()
                .push(row);
        }

        let mut groups: Vec<(i64, (String, String), Vec<FeedRow>)> = groups
            .into_iter()
            .map(|(key, rows)| {
                let last = rows.iter().map(|r| r.update_created_at).max().unwrap_or_default();
                (last, key, rows)
            })
            .collect();
        groups.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        groups.truncate(query.limit as usize);

        let mut out = Vec::new();
        for (last, _, mut rows) in groups {
            rows.sort_by_key(|r| (Reverse(r.update_created_at), Reverse(r.update_id.clone())));
            out.extend(rows.into_iter().map(|mut r| {
                r.last_update_at = last;
                r
            }));
        }
        Ok(out)
    }
}
