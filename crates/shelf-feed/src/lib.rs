//! Activity feed: query, shape into update blocks, decode.

pub mod decoder;
pub mod document;
pub mod error;
pub mod memory;
pub mod shaper;

use shelf_db::models::FeedRow;
use shelf_db::{Database, FeedQuery};
use shelf_types::feed::UpdateBlock;
use tracing::debug;

pub use error::FeedError;
pub use memory::MemoryStore;

/// Read side of the feed: flat rows of the newest groups, grouped and
/// ordered as [`Database::feed_rows`] documents.
pub trait FeedStore {
    fn feed_rows(&self, query: &FeedQuery) -> anyhow::Result<Vec<FeedRow>>;
}

impl FeedStore for Database {
    fn feed_rows(&self, query: &FeedQuery) -> anyhow::Result<Vec<FeedRow>> {
        Database::feed_rows(self, query)
    }
}

/// Everyone's latest activity. `None` when nobody has posted anything.
pub fn global_feed<S>(store: &S) -> Result<Option<Vec<UpdateBlock>>, FeedError>
where
    S: FeedStore + ?Sized,
{
    load(store, &FeedQuery::global())
}

/// Activity authored by one user. `None` when the user has no updates.
pub fn user_feed<S>(store: &S, user_id: &str) -> Result<Option<Vec<UpdateBlock>>, FeedError>
where
    S: FeedStore + ?Sized,
{
    load(store, &FeedQuery::for_user(user_id))
}

pub fn load<S>(store: &S, query: &FeedQuery) -> Result<Option<Vec<UpdateBlock>>, FeedError>
where
    S: FeedStore + ?Sized,
{
    let rows = store.feed_rows(query).map_err(FeedError::Query)?;
    let document = shaper::encode(&rows)?;
    let blocks = decoder::decode(document.as_deref())?;

    debug!(
        scope = ?query.scope,
        blocks = blocks.as_ref().map_or(0, Vec::len),
        "Feed loaded"
    );
    Ok(blocks)
}
