//! Activity feed query.
//!
//! Selects the most recently active (user, saved book) groups and returns
//! every update belonging to them as flat [`FeedRow`]s. Shaping the rows
//! into blocks happens in application code, not in SQL.

use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

use crate::models::FeedRow;
use crate::Database;

/// Number of (user, saved book) groups on a feed page.
pub const FEED_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// Everyone's activity (home feed).
    Global,
    /// Updates authored by one user.
    User(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub scope: FeedScope,
    pub limit: u32,
}

impl FeedQuery {
    pub fn global() -> Self {
        Self {
            scope: FeedScope::Global,
            limit: FEED_LIMIT,
        }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            scope: FeedScope::User(user_id.into()),
            limit: FEED_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// User filter bound to `?1`; `NULL` disables it.
    pub fn user_filter(&self) -> Option<&str> {
        match &self.scope {
            FeedScope::Global => None,
            FeedScope::User(id) => Some(id),
        }
    }
}

/// The inner joins drop saved books without updates and updates whose
/// author, saved book or book no longer exists. Ties on the sort key are
/// broken by the group key so the limit is deterministic.
const FEED_SQL: &str = "
    WITH recent_groups AS (
        SELECT u.user_id          AS user_id,
               u.saved_book_id    AS saved_book_id,
               MAX(u.created_at)  AS last_update_at
        FROM updates u
        JOIN users usr      ON usr.id = u.user_id
        JOIN saved_books sb ON sb.id = u.saved_book_id
        JOIN books b        ON b.id = sb.book_id
        WHERE (?1 IS NULL OR u.user_id = ?1)
        GROUP BY u.user_id, u.saved_book_id
        ORDER BY last_update_at DESC, u.user_id, u.saved_book_id
        LIMIT ?2
    )
    SELECT g.last_update_at,
           usr.id, usr.name, usr.image,
           sb.id,
           b.id, b.name, b.authors, b.page_count, b.thumbnail_url, b.created_at,
           u.id, u.created_at, u.progress, u.content
    FROM recent_groups g
    JOIN updates u      ON u.user_id = g.user_id AND u.saved_book_id = g.saved_book_id
    JOIN users usr      ON usr.id = u.user_id
    JOIN saved_books sb ON sb.id = u.saved_book_id
    JOIN books b        ON b.id = sb.book_id
    ORDER BY g.last_update_at DESC, g.user_id, g.saved_book_id,
             u.created_at DESC, u.id DESC
";

impl Database {
    /// Rows of the newest `query.limit` groups, group by group, newest
    /// update first within a group. Empty when there is no activity.
    pub fn feed_rows(&self, query: &FeedQuery) -> Result<Vec<FeedRow>> {
        let rows = self.with_conn(|conn| query_feed_rows(conn, query))?;
        debug!(scope = ?query.scope, limit = query.limit, rows = rows.len(), "Feed rows loaded");
        Ok(rows)
    }
}

fn query_feed_rows(conn: &Connection, query: &FeedQuery) -> Result<Vec<FeedRow>> {
    let mut stmt = conn.prepare_cached(FEED_SQL)?;

    let rows = stmt
        .query_map(rusqlite::params![query.user_filter(), query.limit], |row| {
            Ok(FeedRow {
                last_update_at: row.get(0)?,
                user_id: row.get(1)?,
                user_name: row.get(2)?,
                user_image: row.get(3)?,
                saved_book_id: row.get(4)?,
                book_id: row.get(5)?,
                book_name: row.get(6)?,
                book_authors: row.get(7)?,
                book_page_count: row.get(8)?,
                book_thumbnail_url: row.get(9)?,
                book_created_at: row.get(10)?,
                update_id: row.get(11)?,
                update_created_at: row.get(12)?,
                progress: row.get(13)?,
                content: row.get(14)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookRow, UserRow};
    use shelf_types::models::Shelf;

    fn user(db: &Database, id: &str) {
        db.create_user(&UserRow {
            id: id.into(),
            name: Some(id.to_uppercase()),
            image: None,
            created_at: 0,
        })
        .unwrap();
    }

    fn book(db: &Database, id: &str) {
        db.upsert_book(&BookRow {
            id: id.into(),
            name: Some(format!("Book {}", id)),
            authors: None,
            page_count: Some(300),
            thumbnail_url: None,
            created_at: 7,
        })
        .unwrap();
    }

    #[test]
    fn scope_binds_user_filter() {
        assert_eq!(FeedQuery::global().user_filter(), None);
        assert_eq!(FeedQuery::for_user("a").user_filter(), Some("a"));
        assert_eq!(FeedQuery::global().limit, FEED_LIMIT);
        assert_eq!(FeedQuery::global().with_limit(3).limit, 3);
    }

    #[test]
    fn empty_database_yields_no_rows() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.feed_rows(&FeedQuery::global()).unwrap().is_empty());
    }

    #[test]
    fn saved_book_without_updates_is_absent() {
        let db = Database::open_in_memory().unwrap();
        user(&db, "a");
        book(&db, "x");
        db.save_book("a", "x", Shelf::Shelf, 1).unwrap();
        assert!(db.feed_rows(&FeedQuery::global()).unwrap().is_empty());
    }

    #[test]
    fn rows_are_grouped_newest_group_first() {
        let db = Database::open_in_memory().unwrap();
        user(&db, "a");
        user(&db, "b");
        book(&db, "x");
        let sa = db.save_book("a", "x", Shelf::Reading, 1).unwrap();
        let sb = db.save_book("b", "x", Shelf::Reading, 1).unwrap();
        db.insert_update(&sa, "a", 10, "t1", 100).unwrap();
        db.insert_update(&sb, "b", 5, "t2", 150).unwrap();
        db.insert_update(&sa, "a", 20, "t3", 200).unwrap();

        let rows = db.feed_rows(&FeedQuery::global()).unwrap();
        let seen: Vec<(&str, &str, i64)> = rows
            .iter()
            .map(|r| (r.user_id.as_str(), r.content.as_str(), r.last_update_at))
            .collect();
        assert_eq!(
            seen,
            vec![("a", "t3", 200), ("a", "t1", 200), ("b", "t2", 150)]
        );
        assert_eq!(rows[0].book_page_count, Some(300));
        assert_eq!(rows[0].user_name.as_deref(), Some("A"));
    }

    #[test]
    fn limit_counts_groups_not_rows() {
        let db = Database::open_in_memory().unwrap();
        user(&db, "a");
        for (i, id) in ["x", "y", "z"].iter().enumerate() {
            book(&db, id);
            let saved = db.save_book("a", id, Shelf::Reading, 1).unwrap();
            let base = (i as i64 + 1) * 1000;
            db.insert_update(&saved, "a", 1, "first", base).unwrap();
            db.insert_update(&saved, "a", 2, "second", base + 1).unwrap();
        }

        let rows = db.feed_rows(&FeedQuery::global().with_limit(2)).unwrap();
        assert_eq!(rows.len(), 4);
        let books: Vec<&str> = rows.iter().map(|r| r.book_id.as_str()).collect();
        assert_eq!(books, vec!["z", "z", "y", "y"]);
    }

    #[test]
    fn user_scope_filters_authors() {
        let db = Database::open_in_memory().unwrap();
        user(&db, "a");
        user(&db, "b");
        book(&db, "x");
        let sa = db.save_book("a", "x", Shelf::Reading, 1).unwrap();
        let sb = db.save_book("b", "x", Shelf::Reading, 1).unwrap();
        db.insert_update(&sa, "a", 10, "mine", 100).unwrap();
        db.insert_update(&sb, "b", 5, "theirs", 150).unwrap();

        let rows = db.feed_rows(&FeedQuery::for_user("a")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "mine");
        assert!(db.feed_rows(&FeedQuery::for_user("nobody")).unwrap().is_empty());
    }

    #[test]
    fn updates_of_a_deleted_book_are_dropped() {
        let db = Database::open_in_memory().unwrap();
        user(&db, "a");
        book(&db, "x");
        book(&db, "y");
        let sx = db.save_book("a", "x", Shelf::Reading, 1).unwrap();
        let sy = db.save_book("a", "y", Shelf::Reading, 1).unwrap();
        db.insert_update(&sx, "a", 10, "kept", 100).unwrap();
        db.insert_update(&sy, "a", 10, "orphaned", 200).unwrap();

        // Simulate a book removed behind the schema's back
        db.with_conn(|conn| {
            conn.pragma_update(None, "foreign_keys", "OFF")?;
            conn.execute("DELETE FROM books WHERE id = 'y'", [])?;
            Ok(())
        })
        .unwrap();

        let rows = db.feed_rows(&FeedQuery::global()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "kept");
    }
}
