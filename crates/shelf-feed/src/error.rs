use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed document is not JSON or does not match the update block
    /// schema. Points at a mismatch between the query and the decoder.
    #[error("Feed document violates the update block schema: {0}")]
    SchemaViolation(#[source] serde_json::Error),

    #[error("Feed document violates the update block schema: {field} = {value} is not a valid timestamp")]
    InvalidTimestamp { field: &'static str, value: i64 },

    #[error("Failed to encode feed document: {0}")]
    Encode(#[source] serde_json::Error),

    /// Propagated unchanged from the store.
    #[error("Feed query failed: {0}")]
    Query(#[source] anyhow::Error),
}

impl FeedError {
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation(_) | Self::InvalidTimestamp { .. })
    }
}
