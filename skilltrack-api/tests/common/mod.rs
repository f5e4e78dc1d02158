/// Common test utilities for integration tests
///
/// Builds the full router against a lazy database pool, an in-memory
/// token store, and a capturing mailer. The pool never connects unless
/// a handler actually queries it, so everything up to the database
/// boundary (routing, auth, role gates, input validation) tests without
/// infrastructure.

use skilltrack_api::app::{build_router, AppState};
use skilltrack_api::config::{Config, JwtConfig, ServerConfig};
use skilltrack_shared::auth::jwt::issue_token_pair;
use skilltrack_shared::auth::tokens::InMemoryTokenStore;
use skilltrack_shared::models::employee::Role;
use skilltrack_shared::notify::MemoryMailer;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context wrapping the router and token helpers
pub struct TestContext {
    pub app: axum::Router,
    pub company_id: Uuid,
    pub mailer: Arc<MemoryMailer>,
}

impl TestContext {
    /// Builds the app without touching any external service
    pub fn new() -> Self {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["http://localhost:3000".to_string()],
                production: false,
            },
            database_url: "postgresql://localhost:1/offline".to_string(),
            redis_url: "redis://localhost:1".to_string(),
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
            mail: None,
            upload_dir: std::env::temp_dir()
                .join("skilltrack-test-uploads")
                .to_string_lossy()
                .into_owned(),
        };

        let db = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .expect("lazy pool should build without connecting");

        let mailer = Arc::new(MemoryMailer::default());
        let state = AppState::new(
            db,
            config,
            Arc::new(InMemoryTokenStore::new()),
            mailer.clone(),
        );

        TestContext {
            app: build_router(state),
            company_id: Uuid::new_v4(),
            mailer,
        }
    }

    /// Issues a valid access token for the given role
    pub fn access_token(&self, employee_id: &str, role: Role) -> String {
        issue_token_pair(employee_id, self.company_id, role, TEST_JWT_SECRET)
            .expect("token pair")
            .access_token
    }

    /// Issues a refresh token, useful for wrong-token-type tests
    pub fn refresh_token(&self, employee_id: &str, role: Role) -> String {
        issue_token_pair(employee_id, self.company_id, role, TEST_JWT_SECRET)
            .expect("token pair")
            .refresh_token
    }

    pub fn bearer(&self, token: &str) -> String {
        format!("Bearer {}", token)
    }
}
