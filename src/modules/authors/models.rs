use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use uuid::Uuid;

use crate::modules::books::models::BookSummary;
use crate::modules::query::decode_id;

/// An author together with every book linked to them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub book: Vec<BookSummary>,
}

/// The author columns alone, as nested under a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub country: String,
}

impl AuthorSummary {
    pub fn with_books(self, book: Vec<BookSummary>) -> Author {
        Author {
            id: self.id,
            name: self.name,
            country: self.country,
            book,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for AuthorSummary {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode_id(row.try_get("id")?)?,
            name: row.try_get("name")?,
            country: row.try_get("country")?,
        })
    }
}

/// Request body for `POST /api/author`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

/// Request body for `PUT /api/author`. Absent or blank fields stay unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAuthor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Query string of `GET /api/author`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorFilter {
    pub book_id: Option<String>,
    pub title: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}
