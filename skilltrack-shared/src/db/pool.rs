/// PostgreSQL connection pool
///
/// One pool per process, created at startup and passed through
/// constructors; nothing here holds global state. Every write path that
/// touches assignment rows opens a transaction on this pool.
///
/// # Example
///
/// ```no_run
/// use skilltrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let config = DatabaseConfig {
///     url: std::env::var("DATABASE_URL").unwrap(),
///     ..Default::default()
/// };
///
/// let pool = create_pool(config).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Default maximum pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default number of warm idle connections
pub const DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// Default acquire timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 30;

/// Default idle timeout in seconds (10 minutes)
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: u64 = 600;

/// Default connection lifetime in seconds (30 minutes)
pub const DEFAULT_MAX_LIFETIME_SECONDS: u64 = 1800;

/// Configuration for the connection pool
///
/// Timeouts are in seconds so they map directly onto environment
/// variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections to keep warm
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,

    /// Idle time before a connection is closed; `None` keeps them open
    pub idle_timeout_seconds: Option<u64>,

    /// Lifetime before a connection is recycled; `None` never recycles
    pub max_lifetime_seconds: Option<u64>,

    /// Test connections before handing them out
    pub test_before_acquire: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
            idle_timeout_seconds: Some(DEFAULT_IDLE_TIMEOUT_SECONDS),
            max_lifetime_seconds: Some(DEFAULT_MAX_LIFETIME_SECONDS),
            test_before_acquire: true,
        }
    }
}

/// Creates the connection pool and verifies the database answers
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database is unreachable,
/// or the health probe fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "creating database connection pool"
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .test_before_acquire(config.test_before_acquire);

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
    }

    if let Some(max_lifetime) = config.max_lifetime_seconds {
        pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
    }

    let pool = pool_options.connect(&config.url).await?;

    health_check(&pool).await?;

    info!("database connection pool ready");
    Ok(pool)
}

/// Probes the database with `SELECT 1`
///
/// The `/health` endpoint and pool creation both go through here.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("running database health check");

    let (probe,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if probe == 1 {
        Ok(())
    } else {
        Err(sqlx::Error::Protocol(
            "health check returned unexpected value".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_named_constants() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(config.connect_timeout_seconds, DEFAULT_CONNECT_TIMEOUT_SECONDS);
        assert_eq!(config.idle_timeout_seconds, Some(DEFAULT_IDLE_TIMEOUT_SECONDS));
        assert_eq!(config.max_lifetime_seconds, Some(DEFAULT_MAX_LIFETIME_SECONDS));
        assert!(config.test_before_acquire);
    }

    // Integration tests require a running database; they live in tests/.
}
