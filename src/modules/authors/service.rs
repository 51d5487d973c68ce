use std::time::Duration;

use bookstore_kernel::{PageRequest, Pagination};
use uuid::Uuid;

use super::models::{Author, AuthorFilter, AuthorSummary, CreateAuthor, UpdateAuthor};
use super::repository::{AuthorChanges, AuthorRepository};
use crate::error::ServiceError;
use crate::modules::query::Condition;
use crate::utils::{bounded, non_empty, parse_id};

#[derive(Debug, Clone)]
pub struct AuthorService {
    repo: AuthorRepository,
    timeout: Duration,
}

impl AuthorService {
    pub fn new(repo: AuthorRepository, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    pub async fn create(&self, input: CreateAuthor) -> Result<Author, ServiceError> {
        let name = input.name.trim();
        let country = input.country.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("name is required"));
        }
        if country.is_empty() {
            return Err(ServiceError::validation("country is required"));
        }

        let summary = AuthorSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            country: country.to_string(),
        };
        let author = bounded(self.timeout, self.repo.create(&summary)).await?;

        tracing::info!(author_id = %author.id, "author created");
        Ok(author)
    }

    /// Blank fields count as absent; at least one must be present.
    pub async fn update(&self, input: UpdateAuthor) -> Result<Author, ServiceError> {
        let id = parse_id(&input.id, "author")?;
        let changes = AuthorChanges {
            name: non_empty(input.name.as_deref()).map(str::trim),
            country: non_empty(input.country.as_deref()).map(str::trim),
        };
        if changes.is_empty() {
            return Err(ServiceError::validation("name or country is required"));
        }

        bounded(self.timeout, self.repo.update(id, &changes)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id, "author")?;
        let unlinked = bounded(self.timeout, self.repo.delete(id)).await?;

        tracing::info!(author_id = %id, unlinked, "author deleted");
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Author, ServiceError> {
        let id = parse_id(id, "author")?;
        bounded(self.timeout, self.repo.find_by_id(id)).await
    }

    /// Authors linked to a book matching the filter, one page at a time.
    pub async fn find(&self, filter: &AuthorFilter) -> Result<(Vec<Author>, Pagination), ServiceError> {
        let page = PageRequest::parse(filter.page.as_deref(), filter.page_size.as_deref());
        let conditions: Vec<Condition> = [
            Condition::equals("books.id", filter.book_id.as_deref()),
            Condition::contains("books.title", filter.title.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let (authors, total) = bounded(self.timeout, self.repo.find(&conditions, &page)).await?;
        Ok((authors, Pagination::calculate(total, &page)))
    }

    /// Existence check only, like books.
    pub async fn is_allowed_to_edit(&self, id: &str) -> bool {
        let Ok(author_id) = parse_id(id, "author") else {
            return false;
        };

        match bounded(self.timeout, self.repo.find_summary(author_id)).await {
            Ok(author) => author.id.to_string() == author_id.to_string(),
            Err(ServiceError::NotFound) => false,
            Err(e) => {
                tracing::warn!(author_id = %author_id, error = %e, "ownership lookup failed");
                false
            }
        }
    }

    pub async fn count(&self) -> Result<i64, ServiceError> {
        bounded(self.timeout, self.repo.count()).await
    }
}
