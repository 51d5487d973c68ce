//! Author persistence and the author-side list query.

use std::collections::HashMap;

use bookstore_kernel::PageRequest;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{Author, AuthorSummary};
use crate::modules::associations;
use crate::modules::books::models::BookSummary;
use crate::modules::query::{load_related, push_conditions, push_window, Condition};

const AUTHORS_WITH_BOOKS: &str = " FROM authors \
     INNER JOIN author_books ON author_books.author_id = authors.id \
     INNER JOIN books ON books.id = author_books.book_id";

const BOOKS_OF_AUTHORS: &str = "SELECT author_books.author_id AS owner_id, \
     books.id AS id, books.title AS title, books.published_year AS published_year, \
     books.isbn AS isbn \
     FROM author_books INNER JOIN books ON books.id = author_books.book_id";

/// Sparse author update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct AuthorChanges<'a> {
    pub name: Option<&'a str>,
    pub country: Option<&'a str>,
}

impl AuthorChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.country.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author: &AuthorSummary) -> Result<Author, sqlx::Error> {
        sqlx::query("INSERT INTO authors (id, name, country) VALUES (?, ?, ?)")
            .bind(author.id.to_string())
            .bind(&author.name)
            .bind(&author.country)
            .execute(&self.pool)
            .await?;

        Ok(author.clone().with_books(Vec::new()))
    }

    pub async fn find_summary(&self, id: Uuid) -> Result<AuthorSummary, sqlx::Error> {
        sqlx::query_as::<_, AuthorSummary>("SELECT id, name, country FROM authors WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
    }

    /// The author with every linked book.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Author, sqlx::Error> {
        let summary = self.find_summary(id).await?;
        let mut books = self.books_of(&[id]).await?;
        Ok(summary.with_books(books.remove(&id).unwrap_or_default()))
    }

    /// One page of authors matching `conditions`, plus the total match count.
    /// Authors without books are never listed.
    pub async fn find(
        &self,
        conditions: &[Condition],
        page: &PageRequest,
    ) -> Result<(Vec<Author>, i64), sqlx::Error> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(DISTINCT authors.id)");
        count.push(AUTHORS_WITH_BOOKS);
        push_conditions(&mut count, conditions);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let mut select = QueryBuilder::<Sqlite>::new(
            "SELECT DISTINCT authors.id AS id, authors.name AS name, authors.country AS country",
        );
        select.push(AUTHORS_WITH_BOOKS);
        push_conditions(&mut select, conditions);
        push_window(&mut select, "authors.id", page);
        let summaries = select
            .build_query_as::<AuthorSummary>()
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = summaries.iter().map(|a| a.id).collect();
        let mut books = self.books_of(&ids).await?;

        let authors = summaries
            .into_iter()
            .map(|summary| {
                let book = books.remove(&summary.id).unwrap_or_default();
                summary.with_books(book)
            })
            .collect();

        Ok((authors, total))
    }

    pub async fn update(&self, id: Uuid, changes: &AuthorChanges<'_>) -> Result<Author, sqlx::Error> {
        if !changes.is_empty() {
            let mut update = QueryBuilder::<Sqlite>::new("UPDATE authors SET ");
            {
                let mut columns = update.separated(", ");
                if let Some(name) = changes.name {
                    columns.push("name = ").push_bind_unseparated(name.to_string());
                }
                if let Some(country) = changes.country {
                    columns.push("country = ").push_bind_unseparated(country.to_string());
                }
            }
            update.push(" WHERE id = ").push_bind(id.to_string());

            let result = update.build().execute(&self.pool).await?;
            if result.rows_affected() == 0 {
                return Err(sqlx::Error::RowNotFound);
            }
        }

        self.find_by_id(id).await
    }

    /// Clear the author's book links, then delete them. Returns the number of
    /// links removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let unlinked = associations::clear_for_author(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
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
        sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await
    }

    async fn books_of(&self, author_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<BookSummary>>, sqlx::Error> {
        load_related(
            &self.pool,
            BOOKS_OF_AUTHORS,
            "author_books.author_id",
            "books.id",
            author_ids,
            |book: &BookSummary| book.id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{insert_author, insert_book, link, migrated_pool};

    fn summary(name: &str, country: &str) -> AuthorSummary {
        AuthorSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            country: country.to_string(),
        }
    }

    #[tokio::test]
    async fn created_author_has_no_books() {
        let pool = migrated_pool().await;
        let repo = AuthorRepository::new(pool);

        let author = repo.create(&summary("Ted Chiang", "USA")).await.unwrap();
        assert!(author.book.is_empty());
        assert_eq!(repo.find_by_id(author.id).await.unwrap(), author);
    }

    #[tokio::test]
    async fn filters_by_book_id_and_title() {
        let pool = migrated_pool().await;
        let repo = AuthorRepository::new(pool.clone());
        let pratchett = insert_author(&pool, "Terry Pratchett").await;
        let gaiman = insert_author(&pool, "Neil Gaiman").await;
        let omens = insert_book(&pool, "Good Omens").await;
        let sandman = insert_book(&pool, "The Sandman").await;
        link(&pool, pratchett, omens).await;
        link(&pool, gaiman, omens).await;
        link(&pool, gaiman, sandman).await;

        let by_book = [Condition::Equals("books.id", sandman.to_string())];
        let (authors, total) = repo.find(&by_book, &PageRequest::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(authors[0].id, gaiman);
        assert_eq!(authors[0].book.len(), 2);

        let by_title = [Condition::Contains("books.title", "Omens".to_string())];
        let (_, total) = repo.find(&by_title, &PageRequest::default()).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn sparse_update_keeps_absent_fields() {
        let pool = migrated_pool().await;
        let repo = AuthorRepository::new(pool);
        let author = repo.create(&summary("Liu Cixin", "China")).await.unwrap();

        let updated = repo
            .update(
                author.id,
                &AuthorChanges {
                    country: Some("PRC"),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Liu Cixin");
        assert_eq!(updated.country, "PRC");
    }

    #[tokio::test]
    async fn update_of_missing_author_is_not_found() {
        let pool = migrated_pool().await;
        let repo = AuthorRepository::new(pool);

        let result = repo
            .update(
                Uuid::new_v4(),
                &AuthorChanges {
                    name: Some("Nobody"),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
    }

    #[tokio::test]
    async fn delete_removes_author_from_books() {
        let pool = migrated_pool().await;
        let repo = AuthorRepository::new(pool.clone());
        let author = insert_author(&pool, "Departed").await;
        let book = insert_book(&pool, "Left behind").await;
        link(&pool, author, book).await;

        assert_eq!(repo.delete(author).await.unwrap(), 1);

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM author_books")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
