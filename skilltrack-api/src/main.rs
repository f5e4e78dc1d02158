//! # SkillTrack API Server
//!
//! HTTP server for competence tracking: companies, employees, teams,
//! competences, and the per-member task rows that tie them together.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment
//! 2. Connect the PostgreSQL pool and run migrations
//! 3. Connect the Redis token store
//! 4. Pick the mail transport (SMTP if configured, logging otherwise)
//! 5. Serve
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p skilltrack-api
//! ```

use skilltrack_api::{
    app::{build_router, AppState},
    config::Config,
};
use skilltrack_shared::auth::tokens::RedisTokenStore;
use skilltrack_shared::db::{migrations::run_migrations, pool::create_pool};
use skilltrack_shared::notify::{LogMailer, Mailer, SmtpMailer};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skilltrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "SkillTrack API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(config.database_config()).await?;
    run_migrations(&pool).await?;

    let token_store = Arc::new(RedisTokenStore::connect(&config.redis_url).await?);

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => {
            tracing::info!(from = %mail.from, "using SMTP mail transport");
            Arc::new(SmtpMailer::from_url(&mail.smtp_url, &mail.from)?)
        }
        None => {
            tracing::info!("SMTP not configured, notifications will be logged only");
            Arc::new(LogMailer)
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config, token_store, mailer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
