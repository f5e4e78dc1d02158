/// Database layer
///
/// Connection pooling and migrations for the SkillTrack schema.
///
/// # Example
///
/// ```no_run
/// use skilltrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use skilltrack_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// };
///
/// let pool = create_pool(config).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod migrations;
pub mod pool;
