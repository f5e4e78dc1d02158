/// Team assignment model (competence-team relationship)
///
/// One row per team a competence targets as a unit. The row records the
/// targeting itself; the per-member task rows are created separately
/// from the team's roster at assignment time and live their own life
/// afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamAssignment {
    pub competence_id: Uuid,

    pub team_id: String,

    pub created_at: DateTime<Utc>,
}

/// Team assignment joined with the team's display fields
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TeamAssignmentDetail {
    pub competence_id: Uuid,
    pub team_id: String,
    pub team_name: String,
    pub description: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

impl TeamAssignment {
    /// Records that a team is targeted by a competence
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
        team_id: &str,
    ) -> Result<Self, sqlx::Error> {
        let assignment = sqlx::query_as::<_, TeamAssignment>(
            r#"
            INSERT INTO team_assignments (competence_id, team_id)
            VALUES ($1, $2)
            RETURNING competence_id, team_id, created_at
            "#,
        )
        .bind(competence_id)
        .bind(team_id)
        .fetch_one(executor)
        .await?;

        Ok(assignment)
    }

    /// Removes a team assignment row
    pub async fn delete(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
        team_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM team_assignments WHERE competence_id = $1 AND team_id = $2")
                .bind(competence_id)
                .bind(team_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Ids of the teams currently assigned to a competence
    pub async fn team_ids_for_competence(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT team_id FROM team_assignments
            WHERE competence_id = $1
            ORDER BY team_id
            "#,
        )
        .bind(competence_id)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Assigned teams with display fields, for one competence
    pub async fn details_for_competence(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
    ) -> Result<Vec<TeamAssignmentDetail>, sqlx::Error> {
        let details = sqlx::query_as::<_, TeamAssignmentDetail>(
            r#"
            SELECT ta.competence_id, ta.team_id, t.team_name, t.description,
                   ta.created_at AS assigned_at
            FROM team_assignments ta
            JOIN teams t ON t.id = ta.team_id
            WHERE ta.competence_id = $1
            ORDER BY ta.team_id
            "#,
        )
        .bind(competence_id)
        .fetch_all(executor)
        .await?;

        Ok(details)
    }

    /// Assigned teams with display fields, batched over many competences
    pub async fn details_for_competences(
        executor: impl sqlx::PgExecutor<'_>,
        competence_ids: &[Uuid],
    ) -> Result<Vec<TeamAssignmentDetail>, sqlx::Error> {
        let details = sqlx::query_as::<_, TeamAssignmentDetail>(
            r#"
            SELECT ta.competence_id, ta.team_id, t.team_name, t.description,
                   ta.created_at AS assigned_at
            FROM team_assignments ta
            JOIN teams t ON t.id = ta.team_id
            WHERE ta.competence_id = ANY($1)
            ORDER BY ta.competence_id, ta.team_id
            "#,
        )
        .bind(competence_ids)
        .fetch_all(executor)
        .await?;

        Ok(details)
    }
}
