//! Wire form of an update block: plain JSON with epoch-millisecond
//! timestamps, as produced by the shaper and consumed by the decoder.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDocument {
    pub user: UserDocument,
    pub book: BookDocument,
    pub updates: Vec<UpdateDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDocument {
    pub id: String,
    pub name: Option<String>,
    pub authors: Option<String>,
    pub page_count: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocument {
    pub id: String,
    pub content: String,
    pub progress: i64,
    pub created_at: i64,
}
