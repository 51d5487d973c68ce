//! Book persistence and the book-side list query.

use bookstore_kernel::PageRequest;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{Book, BookSummary};
use crate::modules::associations;
use crate::modules::authors::models::AuthorSummary;
use crate::modules::query::{load_related, push_conditions, push_window, Condition};

const BOOKS_WITH_AUTHORS: &str = " FROM books \
     INNER JOIN author_books ON author_books.book_id = books.id \
     INNER JOIN authors ON authors.id = author_books.author_id";

const AUTHORS_OF_BOOKS: &str = "SELECT author_books.book_id AS owner_id, \
     authors.id AS id, authors.name AS name, authors.country AS country \
     FROM author_books INNER JOIN authors ON authors.id = author_books.author_id";

/// Columns of a new `books` row.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub id: Uuid,
    pub title: String,
    pub published_year: DateTime<Utc>,
    pub isbn: String,
}

#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the book and one link per author id in a single transaction.
    pub async fn create(&self, book: &NewBook, author_ids: &[Uuid]) -> Result<Book, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO books (id, title, published_year, isbn) VALUES (?, ?, ?, ?)")
            .bind(book.id.to_string())
            .bind(&book.title)
            .bind(book.published_year)
            .bind(&book.isbn)
            .execute(&mut *tx)
            .await?;

        for author_id in author_ids {
            associations::add(&mut tx, *author_id, book.id).await?;
        }

        tx.commit().await?;
        self.find_by_id(book.id).await
    }

    pub async fn find_summary(&self, id: Uuid) -> Result<BookSummary, sqlx::Error> {
        sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, published_year, isbn FROM books WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await
    }

    /// The book with its full author list.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Book, sqlx::Error> {
        let summary = self.find_summary(id).await?;
        let mut authors = self.authors_of(&[id]).await?;
        let author = authors.remove(&id).unwrap_or_default();
        Ok(summary.with_authors(author))
    }

    /// One page of books matching `conditions`, plus the total match count.
    ///
    /// Books are always inner-joined to their authors, so a book without
    /// authors is never listed.
    pub async fn find(
        &self,
        conditions: &[Condition],
        page: &PageRequest,
    ) -> Result<(Vec<Book>, i64), sqlx::Error> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(DISTINCT books.id)");
        count.push(BOOKS_WITH_AUTHORS);
        push_conditions(&mut count, conditions);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let mut select = QueryBuilder::<Sqlite>::new(
            "SELECT DISTINCT books.id AS id, books.title AS title, \
             books.published_year AS published_year, books.isbn AS isbn",
        );
        select.push(BOOKS_WITH_AUTHORS);
        push_conditions(&mut select, conditions);
        push_window(&mut select, "books.id", page);
        let summaries = select.build_query_as::<BookSummary>().fetch_all(&self.pool).await?;

        let ids: Vec<Uuid> = summaries.iter().map(|b| b.id).collect();
        let mut authors = self.authors_of(&ids).await?;

        let books = summaries
            .into_iter()
            .map(|summary| {
                let author = authors.remove(&summary.id).unwrap_or_default();
                summary.with_authors(author)
            })
            .collect();

        Ok((books, total))
    }

    pub async fn update_title(&self, id: Uuid, title: &str) -> Result<Book, sqlx::Error> {
        let result = sqlx::query("UPDATE books SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        self.find_by_id(id).await
    }

    /// Clear the book's author links, then delete it. Returns the number of
    /// links removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let unlinked = associations::clear_for_book(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;
        Ok(unlinked)
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
    }

    async fn authors_of(
        &self,
        book_ids: &[Uuid],
    ) -> Result<std::collections::HashMap<Uuid, Vec<AuthorSummary>>, sqlx::Error> {
        load_related(
            &self.pool,
            AUTHORS_OF_BOOKS,
            "author_books.book_id",
            "authors.id",
            book_ids,
            |author: &AuthorSummary| author.id,
        )
        .await
    }
}
