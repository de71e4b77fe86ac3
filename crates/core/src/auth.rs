//! Auth collaborator contract.
//!
//! The core only needs a boolean gate ("is someone signed in?") plus
//! login/logout calls; how credentials are checked is the adapter's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// The signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub email: String,
}

/// Login form payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl Credentials {
    /// Field checks that need no round trip to the auth collaborator.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(crate::contact::describe_errors(&e)))
    }
}

#[async_trait]
pub trait AuthGate: Send + Sync {
    /// `None` when no session is active.
    async fn current_user(&self) -> Option<AdminIdentity>;

    /// Fails with `AuthFailed` on invalid credentials.
    async fn login(&self, credentials: &Credentials) -> Result<AdminIdentity, CoreError>;

    async fn logout(&self) -> Result<(), CoreError>;
}
