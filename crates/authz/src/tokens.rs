//! Signed identity tokens.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims embedded in every issued token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.user_id).map_err(|_| TokenError::MalformedSubject)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("token is invalid: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("token subject is not a user id")]
    MalformedSubject,
}

/// Issues and verifies HS256 tokens for a single issuer.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            ttl_secs,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Checks signature, issuer and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(TokenError::Invalid)?;
        data.claims.user_id()?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", "bookstore", 3600)
    }

    #[test]
    fn issued_token_round_trips_user_id() {
        let tokens = service();
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.iss, "bookstore");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            service().verify("invalid.token.here"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = TokenService::new("another-secret", "bookstore", 3600)
            .issue(Uuid::new_v4())
            .unwrap();
        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn other_issuer_is_rejected() {
        let token = TokenService::new("test-secret", "someone-else", 3600)
            .issue(Uuid::new_v4())
            .unwrap();
        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: Uuid::new_v4().to_string(),
            iss: "bookstore".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = tokens.sign(&claims).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: "not-a-uuid".to_string(),
            iss: "bookstore".to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = tokens.sign(&claims).unwrap();
        assert!(matches!(
            tokens.verify(&token),
            Err(TokenError::MalformedSubject)
        ));
    }
}
