/// Company model, the tenancy root
///
/// Every employee, team, and competence belongs to exactly one company.
/// All queries in the API layer are scoped by the caller's company id,
/// so rows from another company are indistinguishable from rows that do
/// not exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Creates a new company
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(company)
    }

    /// Finds a company by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, created_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }
}
