//! Password hashing and identity tokens.

pub mod password;
pub mod tokens;

pub use password::PasswordHasher;
pub use tokens::{Claims, TokenError, TokenService};
