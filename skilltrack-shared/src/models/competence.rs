/// Competence model and database operations
///
/// A competence is a skill or training objective assigned to employees
/// and teams. Assignment state lives in two child tables that cascade
/// with their competence: `user_tasks` (one row per covered employee)
/// and `team_assignments` (one row per team targeted as a unit).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE competences (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     label VARCHAR(100),
///     start_date DATE,
///     end_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Write paths that touch assignment rows run on a transaction; the
/// operations here take any executor so they compose with one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Competence {
    pub id: Uuid,

    pub company_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// Free-form category label ("Onboarding", "HR", ...)
    pub label: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new competence
#[derive(Debug, Clone)]
pub struct CreateCompetence {
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub label: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Scalar fields of a competence update; only set fields change
#[derive(Debug, Clone, Default)]
pub struct UpdateCompetenceFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl UpdateCompetenceFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.label.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

impl Competence {
    /// Creates a new competence
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        data: CreateCompetence,
    ) -> Result<Self, sqlx::Error> {
        let competence = sqlx::query_as::<_, Competence>(
            r#"
            INSERT INTO competences (company_id, title, description, label, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, company_id, title, description, label, start_date, end_date,
                      created_at, updated_at
            "#,
        )
        .bind(data.company_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.label)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(executor)
        .await?;

        Ok(competence)
    }

    /// Finds a competence by id within a company
    pub async fn find_by_id(
        executor: impl sqlx::PgExecutor<'_>,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let competence = sqlx::query_as::<_, Competence>(
            r#"
            SELECT id, company_id, title, description, label, start_date, end_date,
                   created_at, updated_at
            FROM competences
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(competence)
    }

    /// Lists all competences of a company, newest first
    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let competences = sqlx::query_as::<_, Competence>(
            r#"
            SELECT id, company_id, title, description, label, start_date, end_date,
                   created_at, updated_at
            FROM competences
            WHERE company_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(competences)
    }

    /// Lists the competences assigned to a team
    pub async fn list_for_team(
        pool: &PgPool,
        company_id: Uuid,
        team_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let competences = sqlx::query_as::<_, Competence>(
            r#"
            SELECT c.id, c.company_id, c.title, c.description, c.label, c.start_date,
                   c.end_date, c.created_at, c.updated_at
            FROM competences c
            JOIN team_assignments ta ON ta.competence_id = c.id
            WHERE c.company_id = $1 AND ta.team_id = $2
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(company_id)
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(competences)
    }

    /// Updates scalar fields; only set fields change
    pub async fn update_fields(
        executor: impl sqlx::PgExecutor<'_>,
        company_id: Uuid,
        id: Uuid,
        data: UpdateCompetenceFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE competences SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.label.is_some() {
            bind_count += 1;
            query.push_str(&format!(", label = ${}", bind_count));
        }
        if data.start_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", start_date = ${}", bind_count));
        }
        if data.end_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", end_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE company_id = $1 AND id = $2 \
             RETURNING id, company_id, title, description, label, start_date, end_date, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Competence>(&query)
            .bind(company_id)
            .bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(label) = data.label {
            q = q.bind(label);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = data.end_date {
            q = q.bind(end_date);
        }

        let competence = q.fetch_optional(executor).await?;

        Ok(competence)
    }

    /// Deletes a competence
    ///
    /// User tasks, team assignments, and file metadata cascade away with
    /// it. Returns true if the row existed.
    pub async fn delete(
        executor: impl sqlx::PgExecutor<'_>,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM competences WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_detects_no_fields() {
        assert!(UpdateCompetenceFields::default().is_empty());
        let update = UpdateCompetenceFields {
            title: Some("Onboarding".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    // Integration tests for database operations require a running database
}
