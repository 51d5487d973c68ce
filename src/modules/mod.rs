pub mod associations;
pub mod authors;
pub mod books;
pub mod query;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use bookstore_authz::{PasswordHasher, TokenService};
use bookstore_kernel::ModuleRegistry;
use sqlx::SqlitePool;

use authors::{repository::AuthorRepository, service::AuthorService, AuthorsModule};
use books::{repository::BookRepository, service::BookService, BooksModule};
use users::{repository::UserRepository, service::UserService, UsersModule};

/// Shared collaborators handed to every module.
#[derive(Debug, Clone)]
pub struct ModuleDeps {
    pub pool: SqlitePool,
    pub tokens: Arc<TokenService>,
    pub hasher: Arc<PasswordHasher>,
    pub operation_timeout: Duration,
}

/// Register the author, book and user modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, deps: &ModuleDeps) {
    let authors = AuthorService::new(AuthorRepository::new(deps.pool.clone()), deps.operation_timeout);
    registry.register(Arc::new(AuthorsModule::new(
        Arc::new(authors),
        Arc::clone(&deps.tokens),
    )));

    let books = BookService::new(BookRepository::new(deps.pool.clone()), deps.operation_timeout);
    registry.register(Arc::new(BooksModule::new(
        Arc::new(books),
        Arc::clone(&deps.tokens),
    )));

    let users = UserService::new(
        UserRepository::new(deps.pool.clone()),
        Arc::clone(&deps.hasher),
        Arc::clone(&deps.tokens),
        deps.operation_timeout,
    );
    registry.register(Arc::new(UsersModule::new(Arc::new(users))));
}
