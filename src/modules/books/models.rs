use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use uuid::Uuid;

use crate::modules::authors::models::AuthorSummary;
use crate::modules::query::decode_id;

/// A book together with every author linked to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub published_year: DateTime<Utc>,
    pub isbn: String,
    pub author: Vec<AuthorSummary>,
}

/// The book columns alone, as nested under an author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub published_year: DateTime<Utc>,
    pub isbn: String,
}

impl BookSummary {
    pub fn with_authors(self, author: Vec<AuthorSummary>) -> Book {
        Book {
            id: self.id,
            title: self.title,
            published_year: self.published_year,
            isbn: self.isbn,
            author,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for BookSummary {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode_id(row.try_get("id")?)?,
            title: row.try_get("title")?,
            published_year: row.try_get("published_year")?,
            isbn: row.try_get("isbn")?,
        })
    }
}

/// Request body for `POST /api/book`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_id: Vec<String>,
}

/// Request body for `PUT /api/book`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBook {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Query string of `GET /api/book`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilter {
    pub author_id: Option<String>,
    pub name: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}
