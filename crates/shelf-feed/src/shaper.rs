//! Turns flat feed rows into update block documents.

use std::collections::HashMap;

use shelf_db::models::FeedRow;

use crate::document::{BlockDocument, BookDocument, UpdateDocument, UserDocument};
use crate::error::FeedError;

/// Group rows by (user, saved book).
///
/// Blocks appear in the order their first row was emitted and updates keep
/// the row order within their block; nothing is re-sorted here.
pub fn shape(rows: &[FeedRow]) -> Vec<BlockDocument> {
    let mut blocks: Vec<BlockDocument> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for row in rows {
        let at = *index.entry(row.group_key()).or_insert_with(|| {
            blocks.push(BlockDocument {
                user: UserDocument {
                    id: row.user_id.clone(),
                    name: row.user_name.clone(),
                    image: row.user_image.clone(),
                },
                book: BookDocument {
                    id: row.book_id.clone(),
                    name: row.book_name.clone(),
                    authors: row.book_authors.clone(),
                    page_count: row.book_page_count,
                    thumbnail_url: row.book_thumbnail_url.clone(),
                    created_at: row.book_created_at,
                },
                updates: Vec::new(),
            });
            blocks.len() - 1
        });

        blocks[at].updates.push(UpdateDocument {
            id: row.update_id.clone(),
            content: row.content.clone(),
            progress: row.progress,
            created_at: row.update_created_at,
        });
    }

    blocks
}

/// Shape rows and serialize all blocks into one JSON array.
/// `None` when there is nothing to show.
pub fn encode(rows: &[FeedRow]) -> Result<Option<String>, FeedError> {
    let blocks = shape(rows);
    if blocks.is_empty() {
        return Ok(None);
    }

    serde_json::to_string(&blocks)
        .map(Some)
        .map_err(FeedError::Encode)
}
