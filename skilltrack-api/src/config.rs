/// Configuration for the API server
///
/// Everything comes from environment variables, with a `.env` file
/// loaded first in development.
///
/// # Environment Variables
///
/// - `SERVER_HOST`: bind host (default: 0.0.0.0)
/// - `SERVER_PORT`: bind port (default: 8080)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `REDIS_URL`: Redis connection string for the token store (required)
/// - `JWT_SECRET`: HS256 signing secret, at least 32 bytes (required)
/// - `CORS_ORIGINS`: comma-separated allowed origins (default: local dev)
/// - `UPLOAD_DIR`: directory for file attachments (default: ./uploads)
/// - `ENVIRONMENT`: "production" enables the HSTS header
/// - `SMTP_URL` / `MAIL_FROM`: mail transport; absent means
///   notifications are logged only
///
/// # Example
///
/// ```no_run
/// use skilltrack_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Listening on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use skilltrack_shared::db::pool::DatabaseConfig;
use std::env;

/// Default CORS origins for local development
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database connection URL; pool settings come from
    /// [`DatabaseConfig`] defaults unless overridden
    pub database_url: String,

    /// Redis connection URL for the refresh-token revocation store
    pub redis_url: String,

    /// JWT signing configuration
    pub jwt: JwtConfig,

    /// Mail transport; `None` logs notifications instead of sending
    pub mail: Option<MailConfig>,

    /// Directory file attachments are stored under
    pub upload_dir: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins
    pub cors_origins: Vec<String>,

    /// Production mode enables the HSTS header
    pub production: bool,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret, at least 32 bytes
    pub secret: String,
}

/// SMTP mail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP URL carrying host, credentials, and TLS mode
    pub smtp_url: String,

    /// Sender address for notification mail
    pub from: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a numeric
    /// variable does not parse, or the JWT secret is too short.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(list) => list
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            Err(_) => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let production = env::var("ENVIRONMENT")
            .map(|e| e.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let redis_url = env::var("REDIS_URL")
            .map_err(|_| anyhow::anyhow!("REDIS_URL environment variable is required"))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 bytes long");
        }

        let mail = match env::var("SMTP_URL") {
            Ok(smtp_url) => {
                let from = env::var("MAIL_FROM")
                    .map_err(|_| anyhow::anyhow!("MAIL_FROM is required when SMTP_URL is set"))?;
                Some(MailConfig { smtp_url, from })
            }
            Err(_) => None,
        };

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

        Ok(Self {
            server: ServerConfig {
                host,
                port,
                cors_origins,
                production,
            },
            database_url,
            redis_url,
            jwt: JwtConfig { secret: jwt_secret },
            mail,
            upload_dir,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Pool configuration for the configured database
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["http://localhost:3000".to_string()],
                production: false,
            },
            database_url: "postgresql://localhost/test".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            mail: None,
            upload_dir: "./uploads".to_string(),
        }
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        assert_eq!(config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn database_config_carries_the_url() {
        let db = config().database_config();
        assert_eq!(db.url, "postgresql://localhost/test");
        assert!(db.max_connections > 0);
    }
}
