use super::models::UserId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identity resolved from a valid session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    // ---
    pub user_id: UserId,
    pub username: String,
}

/// Storage for opaque session tokens.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    // ---
    /// Create a session for the user and return its token.
    async fn create_session(&self, user_id: UserId, username: &str) -> Result<String>;

    /// Resolve a token. Unknown and expired tokens yield `None`.
    async fn get_session(&self, token: &str) -> Result<Option<SessionInfo>>;

    /// Remove a session. Removing an unknown token is not an error.
    async fn destroy_session(&self, token: &str) -> Result<()>;

    /// Cheap round trip used by the full health check.
    async fn ping(&self) -> Result<()>;
}

/// Type alias for any backend that implements SessionStore.
pub type SessionStorePtr = Arc<dyn SessionStore>;
