use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bookstore_authz::{PasswordHasher, TokenService};
use chrono::Utc;
use uuid::Uuid;

use super::models::{AuthRequest, Credential, User};
use super::repository::UserRepository;
use crate::error::ServiceError;
use crate::utils::bounded;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
    timeout: Duration,
}

impl UserService {
    pub fn new(
        repo: UserRepository,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
        timeout: Duration,
    ) -> Self {
        Self {
            repo,
            hasher,
            tokens,
            timeout,
        }
    }

    /// Create an account and return it with a fresh token.
    ///
    /// A taken email is rejected before the password is hashed.
    pub async fn register(&self, input: AuthRequest) -> Result<User, ServiceError> {
        if input.email.is_empty() || !input.email.contains('@') {
            return Err(ServiceError::validation("a valid email is required"));
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if bounded(self.timeout, self.repo.find_by_email(&input.email))
            .await?
            .is_some()
        {
            return Err(ServiceError::Duplicate("Duplicate email".to_string()));
        }

        let hasher = Arc::clone(&self.hasher);
        let plain = input.password;
        let password = tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .context("password hashing task failed")?
            .context("Failed to hash a password")?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email,
            password,
            created_at: now,
            updated_at: now,
            token: None,
        };

        match bounded(self.timeout, self.repo.insert(&user)).await {
            Ok(()) => {}
            Err(ServiceError::Persistence(e))
                if e.as_database_error().is_some_and(|d| d.is_unique_violation()) =>
            {
                return Err(ServiceError::Duplicate("Duplicate email".to_string()));
            }
            Err(e) => return Err(e),
        }

        tracing::info!(user_id = %user.id, "user registered");
        self.with_token(user)
    }

    /// Check an email and password pair.
    ///
    /// An unknown email still pays for one hash verification.
    pub async fn verify_credential(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Credential, ServiceError> {
        let found = bounded(self.timeout, self.repo.find_by_email(email)).await?;

        let hasher = Arc::clone(&self.hasher);
        let plain = password.to_string();
        let verified = tokio::task::spawn_blocking(move || match found {
            Some(user) => hasher.verify(&plain, &user.password).then_some(user),
            None => {
                hasher.verify_against_dummy(&plain);
                None
            }
        })
        .await
        .context("password verification task failed")?;

        Ok(match verified {
            Some(user) => Credential::Authenticated(user),
            None => Credential::InvalidCredential,
        })
    }

    pub async fn login(&self, input: AuthRequest) -> Result<User, ServiceError> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(ServiceError::validation("email and password are required"));
        }

        match self.verify_credential(&input.email, &input.password).await? {
            Credential::Authenticated(user) => {
                tracing::info!(user_id = %user.id, "user logged in");
                self.with_token(user)
            }
            Credential::InvalidCredential => Err(ServiceError::InvalidCredential),
        }
    }

    pub async fn count(&self) -> Result<i64, ServiceError> {
        bounded(self.timeout, self.repo.count()).await
    }

    fn with_token(&self, user: User) -> Result<User, ServiceError> {
        let token = self
            .tokens
            .issue(user.id)
            .context("failed to issue token")?;
        Ok(User {
            token: Some(token),
            ..user
        })
    }
}
