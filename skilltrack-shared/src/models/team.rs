/// Team model and database operations
///
/// Teams group employees so a competence can target them as a unit.
/// Ids are short handles (`t1`, `t2`, ...) minted by the `team_ids`
/// sequence. Membership lives in [`super::team_membership`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Short directory id (`t1`, `t2`, ...)
    pub id: String,

    pub company_id: Uuid,

    pub team_name: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeam {
    pub company_id: Uuid,
    pub team_name: String,
    pub description: Option<String>,
}

impl Team {
    /// Creates a new team, minting the next `t{n}` id
    pub async fn create(pool: &PgPool, data: CreateTeam) -> Result<Self, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (company_id, team_name, description)
            VALUES ($1, $2, $3)
            RETURNING id, company_id, team_name, description, created_at
            "#,
        )
        .bind(data.company_id)
        .bind(data.team_name)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    /// Finds a team by id within a company
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: Uuid,
        id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, company_id, team_name, description, created_at
            FROM teams
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Lists teams of a company, oldest first
    pub async fn list(
        pool: &PgPool,
        company_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, company_id, team_name, description, created_at
            FROM teams
            WHERE company_id = $1
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Deletes a team
    ///
    /// Memberships and team assignments cascade away with it.
    pub async fn delete(pool: &PgPool, company_id: Uuid, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
