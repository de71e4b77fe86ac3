//! The configured administrator account.
//!
//! The catalog has exactly one administrator, defined by environment
//! variables; there is no user table.

use folio_core::auth::{AdminIdentity, Credentials};
use folio_core::error::CoreError;

use crate::auth::password::verify_password;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AdminAccount {
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl AdminAccount {
    /// Load the account from environment variables.
    ///
    /// | Env Var               | Required |
    /// |-----------------------|----------|
    /// | `ADMIN_EMAIL`         | **yes**  |
    /// | `ADMIN_PASSWORD_HASH` | **yes**  |
    ///
    /// # Panics
    ///
    /// Panics if either variable is missing or empty.
    pub fn from_env() -> Self {
        let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set");
        let password_hash =
            std::env::var("ADMIN_PASSWORD_HASH").expect("ADMIN_PASSWORD_HASH must be set");
        assert!(!email.trim().is_empty(), "ADMIN_EMAIL must not be empty");
        assert!(!password_hash.is_empty(), "ADMIN_PASSWORD_HASH must not be empty");
        Self {
            email: email.trim().to_string(),
            password_hash,
        }
    }

    /// Check credentials against this account.
    ///
    /// Email comparison ignores ASCII case. A wrong email and a wrong
    /// password produce the same error.
    pub fn verify(&self, credentials: &Credentials) -> Result<AdminIdentity, CoreError> {
        credentials.check()?;

        if !credentials.email.trim().eq_ignore_ascii_case(&self.email) {
            return Err(CoreError::AuthFailed(INVALID_CREDENTIALS.into()));
        }

        let valid = verify_password(&credentials.password, &self.password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
        if !valid {
            return Err(CoreError::AuthFailed(INVALID_CREDENTIALS.into()));
        }

        Ok(AdminIdentity {
            email: self.email.clone(),
        })
    }
}
