use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Timestamps are INTEGER epoch milliseconds throughout.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            name        TEXT,
            image       TEXT,
            created_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS books (
            id              TEXT PRIMARY KEY,
            name            TEXT,
            authors         TEXT,
            page_count      INTEGER,
            thumbnail_url   TEXT,
            created_at      INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS saved_books (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            book_id     TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            shelf       TEXT NOT NULL DEFAULT 'none'
                        CHECK (shelf IN ('none', 'shelf', 'reading', 'read')),
            created_at  INTEGER NOT NULL,
            updated_at  INTEGER NOT NULL,
            UNIQUE(user_id, book_id)
        );

        CREATE TABLE IF NOT EXISTS updates (
            id              TEXT PRIMARY KEY,
            saved_book_id   TEXT NOT NULL REFERENCES saved_books(id) ON DELETE CASCADE,
            user_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            progress        INTEGER NOT NULL CHECK (progress >= 0),
            content         TEXT NOT NULL,
            created_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_updates_group
            ON updates(user_id, saved_book_id, created_at);

        CREATE INDEX IF NOT EXISTS idx_updates_created
            ON updates(created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
