use std::time::Duration;

use bookstore_kernel::{PageRequest, Pagination};
use chrono::Utc;
use uuid::Uuid;

use super::isbn;
use super::models::{Book, BookFilter, CreateBook, UpdateBook};
use super::repository::{BookRepository, NewBook};
use crate::error::ServiceError;
use crate::modules::query::Condition;
use crate::utils::{bounded, parse_id};

#[derive(Debug, Clone)]
pub struct BookService {
    repo: BookRepository,
    timeout: Duration,
}

impl BookService {
    pub fn new(repo: BookRepository, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    pub async fn create(&self, input: CreateBook) -> Result<Book, ServiceError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ServiceError::validation("title is required"));
        }
        if input.author_id.is_empty() {
            return Err(ServiceError::validation("at least one author_id is required"));
        }
        let author_ids = input
            .author_id
            .iter()
            .map(|raw| parse_id(raw, "author"))
            .collect::<Result<Vec<_>, _>>()?;

        let new = NewBook {
            id: Uuid::new_v4(),
            title: title.to_string(),
            published_year: Utc::now(),
            isbn: isbn::generate(&mut rand::thread_rng()),
        };

        let book = bounded(self.timeout, self.repo.create(&new, &author_ids)).await?;

        tracing::info!(book_id = %book.id, authors = author_ids.len(), "book created");
        Ok(book)
    }

    /// Only the title can change.
    pub async fn update(&self, input: UpdateBook) -> Result<Book, ServiceError> {
        let id = parse_id(&input.id, "book")?;
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ServiceError::validation("title is required"));
        }

        bounded(self.timeout, self.repo.update_title(id, title)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id, "book")?;
        let unlinked = bounded(self.timeout, self.repo.delete(id)).await?;

        tracing::info!(book_id = %id, unlinked, "book deleted");
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Book, ServiceError> {
        let id = parse_id(id, "book")?;
        bounded(self.timeout, self.repo.find_by_id(id)).await
    }

    /// Books linked to an author matching the filter, one page at a time.
    pub async fn find(&self, filter: &BookFilter) -> Result<(Vec<Book>, Pagination), ServiceError> {
        let page = PageRequest::parse(filter.page.as_deref(), filter.page_size.as_deref());
        let conditions: Vec<Condition> = [
            Condition::equals("authors.id", filter.author_id.as_deref()),
            Condition::contains("authors.name", filter.name.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let (books, total) = bounded(self.timeout, self.repo.find(&conditions, &page)).await?;

        Ok((books, Pagination::calculate(total, &page)))
    }

    /// Existence check only: any authenticated caller may edit any book that
    /// exists.
    pub async fn is_allowed_to_edit(&self, id: &str) -> bool {
        let Ok(book_id) = parse_id(id, "book") else {
            return false;
        };
        let found = bounded(self.timeout, self.repo.find_summary(book_id)).await;

        match found {
            Ok(book) => book.id.to_string() == book_id.to_string(),
            Err(ServiceError::NotFound) => false,
            Err(e) => {
                tracing::warn!(book_id = %book_id, error = %e, "ownership lookup failed");
                false
            }
        }
    }

    pub async fn count(&self) -> Result<i64, ServiceError> {
        bounded(self.timeout, self.repo.count()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{insert_author, migrated_pool};

    async fn service() -> (BookService, sqlx::SqlitePool) {
        let pool = migrated_pool().await;
        let service = BookService::new(BookRepository::new(pool.clone()), Duration::from_secs(5));
        (service, pool)
    }

    fn create(title: &str, authors: &[Uuid]) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            author_id: authors.iter().map(Uuid::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn create_assigns_isbn_and_authors() {
        let (service, pool) = service().await;
        let author = insert_author(&pool, "Octavia E. Butler").await;

        let book = service.create(create("Kindred", &[author])).await.unwrap();

        assert!(book.isbn.starts_with("978-"));
        assert_eq!(book.author.len(), 1);
        assert_eq!(book.author[0].id, author);

        let fetched = service.find_by_id(&book.id.to_string()).await.unwrap();
        assert_eq!(fetched, book);
    }

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let (service, pool) = service().await;
        let author = insert_author(&pool, "Someone").await;

        let blank = service.create(create("  ", &[author])).await;
        assert!(matches!(blank, Err(ServiceError::Validation(_))));

        let no_authors = service.create(create("Lonely", &[])).await;
        assert!(matches!(no_authors, Err(ServiceError::Validation(_))));

        let bad_id = service
            .create(CreateBook {
                title: "Typo".to_string(),
                author_id: vec!["nope".to_string()],
            })
            .await;
        assert!(matches!(bad_id, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn create_with_unknown_author_is_a_persistence_error() {
        let (service, _) = service().await;

        let result = service.create(create("Ghost", &[Uuid::new_v4()])).await;
        assert!(matches!(result, Err(ServiceError::Persistence(_))));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_changes_only_the_title() {
        let (service, pool) = service().await;
        let author = insert_author(&pool, "Stanislaw Lem").await;
        let book = service.create(create("Solaris", &[author])).await.unwrap();

        let updated = service
            .update(UpdateBook {
                id: book.id.to_string(),
                title: "Solaris (revised)".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "Solaris (revised)");
        assert_eq!(updated.isbn, book.isbn);
        assert_eq!(updated.author, book.author);
    }

    #[tokio::test]
    async fn update_of_missing_book_is_not_found() {
        let (service, _) = service().await;

        let result = service
            .update(UpdateBook {
                id: Uuid::new_v4().to_string(),
                title: "Nothing".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn list_pagination_metadata() {
        let (service, pool) = service().await;
        let author = insert_author(&pool, "Prolific").await;
        for n in 0..25 {
            service.create(create(&format!("Book {n}"), &[author])).await.unwrap();
        }

        let filter = BookFilter {
            page: Some("3".to_string()),
            ..Default::default()
        };
        let (books, total) = service.find(&filter).await.unwrap();

        assert_eq!(books.len(), 5);
        assert_eq!(total.total_records, 25);
        assert_eq!(total.total_pages, 3);
        assert_eq!(total.current_page, 3);
        assert_eq!(total.page_size, 10);
    }

    #[tokio::test]
    async fn ownership_check_is_existence_only() {
        let (service, pool) = service().await;
        let author = insert_author(&pool, "Anyone").await;
        let book = service.create(create("Shared", &[author])).await.unwrap();

        assert!(service.is_allowed_to_edit(&book.id.to_string()).await);
        assert!(!service.is_allowed_to_edit(&Uuid::new_v4().to_string()).await);
        assert!(!service.is_allowed_to_edit("garbage").await);
    }

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let (service, pool) = service().await;
        let author = insert_author(&pool, "Gone").await;
        let book = service.create(create("Vanishing", &[author])).await.unwrap();
        let id = book.id.to_string();

        service.delete(&id).await.unwrap();

        assert!(matches!(service.find_by_id(&id).await, Err(ServiceError::NotFound)));
    }
}
