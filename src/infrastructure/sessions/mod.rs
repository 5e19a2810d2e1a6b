mod memory_sessions;
mod redis_sessions;

pub use memory_sessions::MemorySessionStore;
pub use redis_sessions::RedisSessionStore;

use crate::config::{SessionBackend, SessionConfig};
use crate::domain::SessionStorePtr;
use anyhow::Result;
use std::sync::Arc;

/// Builds the session store selected by configuration.
///
/// The Redis client connects lazily, so an unreachable server surfaces on
/// the first request rather than here.
pub fn create_session_store(config: &SessionConfig) -> Result<SessionStorePtr> {
    // ---
    match &config.backend {
        SessionBackend::Redis { url } => {
            let client = redis::Client::open(url.as_str())?;
            Ok(Arc::new(RedisSessionStore::new(client, config.ttl)))
        }
        SessionBackend::Memory => {
            tracing::warn!("Using in-memory sessions; logins are lost on restart");
            Ok(Arc::new(MemorySessionStore::new(config.ttl)))
        }
    }
}
