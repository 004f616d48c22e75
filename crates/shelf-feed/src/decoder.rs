//! Parses a feed document into typed update blocks.

use chrono::{DateTime, Utc};
use shelf_types::feed::{FeedBook, FeedUpdate, FeedUser, UpdateBlock};

use crate::document::{BlockDocument, BookDocument, UpdateDocument, UserDocument};
use crate::error::FeedError;

/// Decode the JSON array produced by the shaper.
///
/// A missing document or an empty array is the empty feed and yields
/// `Ok(None)`. Anything that does not parse or does not match the block
/// schema is a [`FeedError::SchemaViolation`]; nothing is defaulted.
/// `book.createdAt` and every `updates[].createdAt` arrive as epoch
/// milliseconds and are converted to dates.
pub fn decode(raw: Option<&str>) -> Result<Option<Vec<UpdateBlock>>, FeedError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let documents: Vec<BlockDocument> =
        serde_json::from_str(raw).map_err(FeedError::SchemaViolation)?;
    if documents.is_empty() {
        return Ok(None);
    }

    documents
        .into_iter()
        .map(into_block)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn into_block(doc: BlockDocument) -> Result<UpdateBlock, FeedError> {
    let BlockDocument { user, book, updates } = doc;
    let UserDocument { id, name, image } = user;

    Ok(UpdateBlock {
        user: FeedUser { id, name, image },
        book: into_book(book)?,
        updates: updates
            .into_iter()
            .map(into_update)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn into_book(doc: BookDocument) -> Result<FeedBook, FeedError> {
    Ok(FeedBook {
        created_at: timestamp("book.createdAt", doc.created_at)?,
        id: doc.id,
        name: doc.name,
        authors: doc.authors,
        thumbnail_url: doc.thumbnail_url,
        page_count: doc.page_count,
    })
}

fn into_update(doc: UpdateDocument) -> Result<FeedUpdate, FeedError> {
    Ok(FeedUpdate {
        created_at: timestamp("updates.createdAt", doc.created_at)?,
        id: doc.id,
        progress: doc.progress,
        content: doc.content,
    })
}

fn timestamp(field: &'static str, millis: i64) -> Result<DateTime<Utc>, FeedError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or(FeedError::InvalidTimestamp { field, value: millis })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_BLOCK: &str = r#"[{
        "user": {"id": "a", "name": "Alice", "image": null},
        "book": {"id": "x", "name": "Dune", "pageCount": 412, "createdAt": 5},
        "updates": [
            {"id": "u2", "content": "spice", "progress": 42, "createdAt": 1700000000000},
            {"id": "u1", "content": "start", "progress": 1, "createdAt": 1600000000000}
        ]
    }]"#;

    #[test]
    fn absent_document_is_the_empty_feed() {
        assert_eq!(decode(None).unwrap(), None);
    }

    #[test]
    fn empty_array_is_the_empty_feed() {
        assert_eq!(decode(Some("[]")).unwrap(), None);
    }

    #[test]
    fn decodes_numbers_and_timestamps() {
        let blocks = decode(Some(ONE_BLOCK)).unwrap().unwrap();
        assert_eq!(blocks.len(), 1);

        let block = &blocks[0];
        assert_eq!(block.user.name.as_deref(), Some("Alice"));
        assert_eq!(block.user.image, None);
        assert_eq!(block.book.page_count, Some(412));
        assert_eq!(block.book.authors, None);
        assert_eq!(block.book.created_at.timestamp_millis(), 5);
        assert_eq!(block.updates[0].progress, 42);
        assert_eq!(
            block.updates[0].created_at,
            DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap()
        );
        let ids: Vec<&str> = block.updates.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1"]);
    }

    #[test]
    fn updates_as_string_is_a_schema_violation() {
        let raw = r#"[{"user": {"id": "a"}, "book": {"id": "x", "createdAt": 1}, "updates": "oops"}]"#;
        let err = decode(Some(raw)).unwrap_err();
        assert!(matches!(err, FeedError::SchemaViolation(_)));
    }

    #[test]
    fn progress_as_string_is_a_schema_violation() {
        let raw = r#"[{"user": {"id": "a"}, "book": {"id": "x", "createdAt": 1},
            "updates": [{"id": "u", "content": "", "progress": "42", "createdAt": 1}]}]"#;
        assert!(decode(Some(raw)).unwrap_err().is_schema_violation());
    }

    #[test]
    fn missing_required_field_is_a_schema_violation() {
        let raw = r#"[{"user": {"id": "a"}, "book": {"id": "x"}, "updates": []}]"#;
        assert!(decode(Some(raw)).unwrap_err().is_schema_violation());
    }

    #[test]
    fn malformed_json_is_a_schema_violation() {
        assert!(decode(Some("[{")).unwrap_err().is_schema_violation());
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let raw = format!(
            r#"[{{"user": {{"id": "a"}}, "book": {{"id": "x", "createdAt": {}}}, "updates": []}}]"#,
            i64::MAX
        );
        let err = decode(Some(&raw)).unwrap_err();
        assert!(matches!(
            err,
            FeedError::InvalidTimestamp { field: "book.createdAt", .. }
        ));
        assert!(err.is_schema_violation());
    }
}
