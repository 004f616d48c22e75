use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse reading state of a saved book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shelf {
    #[default]
    None,
    /// Owned, not started.
    Shelf,
    Reading,
    Read,
}

impl Shelf {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Shelf => "shelf",
            Self::Reading => "reading",
            Self::Read => "read",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShelf(pub String);

impl fmt::Display for UnknownShelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shelf '{}'", self.0)
    }
}

impl std::error::Error for UnknownShelf {}

impl FromStr for Shelf {
    type Err = UnknownShelf;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "shelf" => Ok(Self::Shelf),
            "reading" => Ok(Self::Reading),
            "read" => Ok(Self::Read),
            other => Err(UnknownShelf(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Canonical book record, loaded lazily from the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: Option<String>,
    pub authors: Option<String>,
    pub page_count: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One user's relationship to one book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBook {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub shelf: Shelf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single progress entry recorded against a saved book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub id: String,
    pub saved_book_id: String,
    pub user_id: String,
    pub progress: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
