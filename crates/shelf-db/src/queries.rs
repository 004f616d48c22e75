use crate::models::{BookRow, ReadingBookRow, SavedBookRow, UpdateRow, UserRow};
use crate::Database;
use anyhow::{Result, bail};
use rusqlite::{Connection, Row};
use shelf_types::models::Shelf;
use uuid::Uuid;

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &UserRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, image, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![user.id, user.name, user.image, user.created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Books --

    /// Insert a book fetched from the catalog, or refresh its metadata.
    /// `created_at` of an existing book is kept.
    pub fn upsert_book(&self, book: &BookRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO books (id, name, authors, page_count, thumbnail_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    authors = excluded.authors,
                    page_count = excluded.page_count,
                    thumbnail_url = excluded.thumbnail_url",
                rusqlite::params![
                    book.id,
                    book.name,
                    book.authors,
                    book.page_count,
                    book.thumbnail_url,
                    book.created_at
                ],
            )?;
            Ok(())
        })
    }

    // -- Saved books --

    /// Put a book on one of the user's shelves. There is at most one saved
    /// book per (user, book); saving again only moves it between shelves.
    /// Returns the saved book id.
    pub fn save_book(&self, user_id: &str, book_id: &str, shelf: Shelf, now: i64) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.with_conn_mut(|conn| {
            let saved_id: String = conn.query_row(
                "INSERT INTO saved_books (id, user_id, book_id, shelf, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(user_id, book_id) DO UPDATE SET
                    shelf = excluded.shelf,
                    updated_at = excluded.updated_at
                 RETURNING id",
                rusqlite::params![id, user_id, book_id, shelf.as_str(), now],
                |row| row.get(0),
            )?;
            Ok(saved_id)
        })
    }

    /// Saved books on the `reading` shelf, most recently touched first,
    /// each with its newest update.
    pub fn get_reading_books(&self, user_id: &str) -> Result<Vec<ReadingBookRow>> {
        self.with_conn(|conn| query_reading_books(conn, user_id))
    }

    // -- Updates --

    /// Record a progress update. Returns the new update id.
    pub fn insert_update(
        &self,
        saved_book_id: &str,
        user_id: &str,
        progress: i64,
        content: &str,
        created_at: i64,
    ) -> Result<String> {
        if progress < 0 {
            bail!("Progress must not be negative: {}", progress);
        }

        let id = Uuid::new_v4().to_string();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO updates (id, saved_book_id, user_id, progress, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, saved_book_id, user_id, progress, content, created_at],
            )?;
            Ok(())
        })?;
        Ok(id)
    }

    pub fn get_last_update(&self, user_id: &str, saved_book_id: &str) -> Result<Option<UpdateRow>> {
        self.with_conn(|conn| query_last_update(conn, user_id, saved_book_id))
    }
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT id, name, image, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name: row.get(1)?,
                image: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_last_update(conn: &Connection, user_id: &str, saved_book_id: &str) -> Result<Option<UpdateRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, saved_book_id, user_id, progress, content, created_at
         FROM updates
         WHERE user_id = ?1 AND saved_book_id = ?2
         ORDER BY created_at DESC, id DESC
         LIMIT 1",
    )?;

    let row = stmt
        .query_row([user_id, saved_book_id], |row| update_row(row, 0))
        .optional()?;

    Ok(row)
}

fn query_reading_books(conn: &Connection, user_id: &str) -> Result<Vec<ReadingBookRow>> {
    // Correlated subquery picks the single newest update per saved book
    let mut stmt = conn.prepare(
        "SELECT sb.id, sb.user_id, sb.book_id, sb.shelf, sb.created_at, sb.updated_at,
                b.id, b.name, b.authors, b.page_count, b.thumbnail_url, b.created_at,
                u.id, u.saved_book_id, u.user_id, u.progress, u.content, u.created_at
         FROM saved_books sb
         JOIN books b ON b.id = sb.book_id
         LEFT JOIN updates u ON u.id = (
             SELECT id FROM updates
             WHERE saved_book_id = sb.id
             ORDER BY created_at DESC, id DESC
             LIMIT 1
         )
         WHERE sb.user_id = ?1 AND sb.shelf = ?2
         ORDER BY sb.updated_at DESC, sb.id",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![user_id, Shelf::Reading.as_str()], |row| {
            let last_update = match row.get::<_, Option<String>>(12)? {
                Some(_) => Some(update_row(row, 12)?),
                None => None,
            };
            Ok(ReadingBookRow {
                saved_book: SavedBookRow {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    book_id: row.get(2)?,
                    shelf: row.get(3)?,
                    created_at: row.get(4)?,
                    updated_at: row.get(5)?,
                },
                book: BookRow {
                    id: row.get(6)?,
                    name: row.get(7)?,
                    authors: row.get(8)?,
                    page_count: row.get(9)?,
                    thumbnail_url: row.get(10)?,
                    created_at: row.get(11)?,
                },
                last_update,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Read an update laid out as (id, saved_book_id, user_id, progress,
/// content, created_at) starting at column `at`.
fn update_row(row: &Row<'_>, at: usize) -> rusqlite::Result<UpdateRow> {
    Ok(UpdateRow {
        id: row.get(at)?,
        saved_book_id: row.get(at + 1)?,
        user_id: row.get(at + 2)?,
        progress: row.get(at + 3)?,
        content: row.get(at + 4)?,
        created_at: row.get(at + 5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        db.create_user(&UserRow {
            id: "alice".into(),
            name: Some("Alice".into()),
            image: None,
            created_at: 1,
        })
        .unwrap();
        db.upsert_book(&BookRow {
            id: "dune".into(),
            name: Some("Dune".into()),
            authors: Some("Frank Herbert".into()),
            page_count: Some(412),
            thumbnail_url: None,
            created_at: 5,
        })
        .unwrap();
        let saved = db.save_book("alice", "dune", Shelf::Reading, 10).unwrap();
        (db, saved)
    }

    #[test]
    fn user_lookup() {
        let (db, _) = seed();
        let user = db.get_user_by_id("alice").unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("Alice"));
        assert!(db.get_user_by_id("nobody").unwrap().is_none());
    }

    #[test]
    fn saving_twice_keeps_one_saved_book() {
        let (db, first) = seed();
        let second = db.save_book("alice", "dune", Shelf::Read, 20).unwrap();
        assert_eq!(first, second);

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM saved_books WHERE user_id = 'alice'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 1);
        assert!(db.get_reading_books("alice").unwrap().is_empty());
    }

    #[test]
    fn upsert_book_keeps_created_at() {
        let (db, _) = seed();
        db.upsert_book(&BookRow {
            id: "dune".into(),
            name: Some("Dune (50th anniversary)".into()),
            authors: None,
            page_count: Some(617),
            thumbnail_url: None,
            created_at: 999,
        })
        .unwrap();

        let reading = db.get_reading_books("alice").unwrap();
        assert_eq!(reading[0].book.created_at, 5);
        assert_eq!(reading[0].book.page_count, Some(617));
    }

    #[test]
    fn negative_progress_is_rejected() {
        let (db, saved) = seed();
        assert!(db.insert_update(&saved, "alice", -1, "", 11).is_err());
        assert!(db.get_last_update("alice", &saved).unwrap().is_none());
    }

    #[test]
    fn last_update_is_the_newest() {
        let (db, saved) = seed();
        db.insert_update(&saved, "alice", 10, "started", 100).unwrap();
        let newest = db.insert_update(&saved, "alice", 55, "sandworms", 300).unwrap();
        db.insert_update(&saved, "alice", 30, "backdated", 200).unwrap();

        let last = db.get_last_update("alice", &saved).unwrap().unwrap();
        assert_eq!(last.id, newest);
        assert_eq!(last.progress, 55);
        assert!(db.get_last_update("bob", &saved).unwrap().is_none());
    }

    #[test]
    fn reading_books_carry_their_newest_update() {
        let (db, saved) = seed();

        let reading = db.get_reading_books("alice").unwrap();
        assert_eq!(reading.len(), 1);
        assert!(reading[0].last_update.is_none());

        db.insert_update(&saved, "alice", 10, "started", 100).unwrap();
        db.insert_update(&saved, "alice", 80, "spice", 400).unwrap();

        let reading = db.get_reading_books("alice").unwrap();
        assert_eq!(reading[0].saved_book.shelf, "reading");
        let last = reading[0].last_update.as_ref().unwrap();
        assert_eq!(last.progress, 80);
        assert_eq!(last.created_at, 400);
    }
}
