use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::{SessionInfo, SessionStore, UserId};

/// In-process session store with the same expiry semantics as Redis.
///
/// Expired entries are dropped when looked up and swept whenever a new
/// session is created.
pub struct MemorySessionStore {
    // ---
    sessions: Mutex<HashMap<String, (SessionInfo, i64)>>,
    ttl: Duration,
}

impl MemorySessionStore {
    // ---
    pub fn new(ttl: Duration) -> Self {
        // ---
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    // ---
    async fn create_session(&self, user_id: UserId, username: &str) -> Result<String> {
        // ---
        let token = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        let expires_at = now.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX));
        let info = SessionInfo {
            user_id,
            username: username.to_string(),
        };

        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("session mutex poisoned"))?;
        sessions.retain(|_, (_, expires)| *expires > now);
        sessions.insert(token.clone(), (info, expires_at));

        tracing::info!("Created session for user: {}", username);
        Ok(token)
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionInfo>> {
        // ---
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("session mutex poisoned"))?;

        let now = chrono::Utc::now().timestamp();
        let expired = match sessions.get(token) {
            Some((info, expires_at)) if *expires_at > now => return Ok(Some(info.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            sessions.remove(token);
        }
        Ok(None)
    }

    async fn destroy_session(&self, token: &str) -> Result<()> {
        // ---
        self.sessions
            .lock()
            .map_err(|_| anyhow!("session mutex poisoned"))?
            .remove(token);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[tokio::test]
    async fn create_get_destroy() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let token = store.create_session(3, "alice").await.unwrap();

        let info = store.get_session(&token).await.unwrap().expect("live session");
        assert_eq!(info.user_id, 3);
        assert_eq!(info.username, "alice");

        store.destroy_session(&token).await.unwrap();
        assert!(store.get_session(&token).await.unwrap().is_none());

        // Destroying twice is fine.
        store.destroy_session(&token).await.unwrap();
    }

    #[tokio::test]
    async fn zero_ttl_sessions_are_expired() {
        // ---
        let store = MemorySessionStore::new(Duration::ZERO);
        let token = store.create_session(1, "bob").await.unwrap();

        assert!(store.get_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_sweeps_abandoned_sessions() {
        // ---
        let store = MemorySessionStore::new(Duration::ZERO);
        for name in ["a", "b", "c"] {
            store.create_session(1, name).await.unwrap();
        }

        // Each create sweeps what came before, leaving only the newest.
        assert_eq!(store.sessions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn huge_ttl_does_not_wrap_into_the_past() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(u64::MAX));
        let token = store.create_session(2, "carol").await.unwrap();

        let info = store.get_session(&token).await.unwrap().expect("live session");
        assert_eq!(info.username, "carol");
    }

    #[tokio::test]
    async fn unknown_token_is_none() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(60));
        assert!(store.get_session("nope").await.unwrap().is_none());
    }
}
