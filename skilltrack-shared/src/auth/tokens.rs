/// Refresh-token revocation store
///
/// Refresh tokens rotate: exchanging one revokes it and issues a new
/// pair, and logout revokes whatever token the client still holds.
/// Revocation state lives behind the [`TokenStore`] trait so it is
/// injected where it is needed instead of living in process-global
/// state. Production uses Redis; tests use the in-memory store.
///
/// Entries only need to outlive the token itself, so every revocation
/// carries a TTL equal to the token's remaining life. After that the
/// token rejects on `exp` alone.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Error type for revocation store operations
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token store connection failed: {0}")]
    Connection(String),

    #[error("Token store operation failed: {0}")]
    Operation(String),
}

impl From<redis::RedisError> for TokenStoreError {
    fn from(err: redis::RedisError) -> Self {
        TokenStoreError::Operation(err.to_string())
    }
}

/// Revocation state for refresh tokens, keyed by `jti`
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Marks a token id revoked for the given remaining lifetime
    async fn revoke(&self, jti: Uuid, ttl: Duration) -> Result<(), TokenStoreError>;

    /// True if the token id has been revoked and has not yet expired
    async fn is_revoked(&self, jti: Uuid) -> Result<bool, TokenStoreError>;
}

/// Redis-backed revocation store
///
/// One key per revoked token id with a TTL; Redis expires the entries on
/// its own. The connection manager reconnects transparently.
#[derive(Clone)]
pub struct RedisTokenStore {
    conn: ConnectionManager,
}

impl RedisTokenStore {
    /// Connects to Redis at the given URL
    pub async fn connect(url: &str) -> Result<Self, TokenStoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| TokenStoreError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| TokenStoreError::Connection(e.to_string()))?;

        Ok(Self { conn })
    }

    fn key(jti: Uuid) -> String {
        format!("skilltrack:revoked:{}", jti)
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn revoke(&self, jti: Uuid, ttl: Duration) -> Result<(), TokenStoreError> {
        // A zero TTL means the token already expired; nothing to store.
        let secs = ttl.as_secs();
        if secs == 0 {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(jti), 1u8, secs).await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, TokenStoreError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(Self::key(jti)).await?;
        Ok(exists)
    }
}

/// In-memory revocation store for tests and single-process setups
///
/// Expired entries are dropped lazily on lookup.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    entries: RwLock<HashMap<Uuid, Instant>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn revoke(&self, jti: Uuid, ttl: Duration) -> Result<(), TokenStoreError> {
        if ttl.is_zero() {
            return Ok(());
        }
        let mut entries = self.entries.write().await;
        entries.insert(jti, Instant::now() + ttl);
        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, TokenStoreError> {
        {
            let entries = self.entries.read().await;
            match entries.get(&jti) {
                Some(expiry) if *expiry > Instant::now() => return Ok(true),
                Some(_) => {}
                None => return Ok(false),
            }
        }

        // Entry expired; drop it.
        let mut entries = self.entries.write().await;
        entries.remove(&jti);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unrevoked_token_is_clean() {
        let store = InMemoryTokenStore::new();
        assert!(!store.is_revoked(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn revoked_token_is_flagged() {
        let store = InMemoryTokenStore::new();
        let jti = Uuid::new_v4();

        store.revoke(jti, Duration::from_secs(60)).await.unwrap();

        assert!(store.is_revoked(jti).await.unwrap());
        assert!(!store.is_revoked(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn expired_revocation_clears() {
        let store = InMemoryTokenStore::new();
        let jti = Uuid::new_v4();

        store.revoke(jti, Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(!store.is_revoked(jti).await.unwrap());
    }

    #[tokio::test]
    async fn zero_ttl_is_a_no_op() {
        let store = InMemoryTokenStore::new();
        let jti = Uuid::new_v4();

        store.revoke(jti, Duration::ZERO).await.unwrap();

        assert!(!store.is_revoked(jti).await.unwrap());
    }
}
