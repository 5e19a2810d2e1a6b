//! Redis-backed session tokens.
//!
//! Each session is a JSON document under `session:{token}` with a Redis
//! expiry matching the configured TTL.

use anyhow::{Context, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::{SessionInfo, SessionStore, UserId};

/// Session data stored in Redis.
#[derive(Debug, Serialize, Deserialize)]
struct SessionData {
    //
    user_id: UserId,
    username: String,
    expires_at: i64,
}

// ---

fn redis_key(token: &str) -> String {
    format!("session:{token}")
}

pub struct RedisSessionStore {
    // ---
    client: Client,
    ttl: Duration,
}

impl RedisSessionStore {
    // ---
    pub fn new(client: Client, ttl: Duration) -> Self {
        // ---
        Self { client, ttl }
    }

    /// Creates a new multiplexed Redis connection.
    async fn get_conn(&self) -> Result<MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    // ---
    async fn create_session(&self, user_id: UserId, username: &str) -> Result<String> {
        //
        let token = Uuid::new_v4().to_string();
        let ttl_secs = self.ttl.as_secs();
        let expires_at = chrono::Utc::now()
            .timestamp()
            .saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX));

        let session_data = SessionData {
            //
            user_id,
            username: username.to_string(),
            expires_at,
        };

        let session_json =
            serde_json::to_string(&session_data).context("Failed to serialize session data")?;

        let mut conn = self.get_conn().await?;
        conn.set_ex::<_, _, ()>(redis_key(&token), session_json, ttl_secs)
            .await
            .context("Failed to store session in Redis")?;

        tracing::info!("Created session for user: {}", username);

        Ok(token)
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionInfo>> {
        //
        let mut conn = self.get_conn().await?;
        let raw: Option<String> = conn
            .get(redis_key(token))
            .await
            .context("Failed to read session from Redis")?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let data: SessionData =
            serde_json::from_str(&raw).context("Failed to deserialize session data")?;

        // Redis expiry normally removes the key first; this covers clock skew.
        if data.expires_at <= chrono::Utc::now().timestamp() {
            tracing::debug!("Session for user {} has expired", data.username);
            return Ok(None);
        }

        Ok(Some(SessionInfo {
            user_id: data.user_id,
            username: data.username,
        }))
    }

    async fn destroy_session(&self, token: &str) -> Result<()> {
        //
        let mut conn = self.get_conn().await?;
        conn.del::<_, ()>(redis_key(token))
            .await
            .context("Failed to delete session from Redis")?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        //
        let mut conn = self.get_conn().await?;
        let _: String = conn.ping().await.context("Redis ping failed")?;

        Ok(())
    }
}
