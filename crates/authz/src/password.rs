//! Salted one-way password hashing.

use once_cell::sync::OnceCell;

/// bcrypt with a fixed cost.
#[derive(Debug)]
pub struct PasswordHasher {
    cost: u32,
    dummy: OnceCell<String>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy: OnceCell::new(),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        Ok(bcrypt::hash(plain, self.cost)?)
    }

    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, plain: &str, hashed: &str) -> bool {
        match bcrypt::verify(plain, hashed) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash could not be verified");
                false
            }
        }
    }

    /// Burn one verification's worth of work so a missing account costs the
    /// same as a wrong password.
    pub fn verify_against_dummy(&self, plain: &str) {
        let dummy = self.dummy.get_or_try_init(|| bcrypt::hash("dummy-password", self.cost));
        match dummy {
            Ok(hashed) => {
                let _ = bcrypt::verify(plain, hashed);
            }
            Err(e) => tracing::warn!(error = %e, "failed to prepare dummy hash"),
        }
    }
}
