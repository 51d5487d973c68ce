//! Bookstore service: books, authors, the links between them, and the users
//! allowed to edit them.

pub mod app;
pub mod error;
pub mod modules;
pub mod utils;

pub use app::Application;
pub use error::ServiceError;
