//! Revocation list for access tokens that were logged out.
//!
//! Tokens are stateless, so logout records the token's `jti` until its own
//! expiry. Entries past their expiry are purged on every revocation.

use std::collections::HashMap;

use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// `jti` -> token expiry (Unix seconds).
    revoked: RwLock<HashMap<String, i64>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, jti: &str, exp: i64) {
        let now = chrono::Utc::now().timestamp();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, expiry| *expiry > now);
        revoked.insert(jti.to_string(), exp);
    }

    pub async fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.read().await.contains_key(jti)
    }

    /// Number of tokens currently on the list.
    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }
}
