/// Team membership model (employee-team relationship)
///
/// Membership changes and assignment rows are deliberately decoupled:
/// adding a member backfills task rows for the team's existing
/// competences, but removing a member deletes only the membership row.
/// Tasks the employee already holds survive, along with their reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMembership {
    pub team_id: String,

    pub employee_id: String,

    /// Free-form role within the team ("lead", "member", ...)
    pub role: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Roster entry with the member's display name
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RosterEntry {
    pub employee_id: String,
    pub firstname: String,
    pub lastname: String,
}

impl TeamMembership {
    /// Adds an employee to a team
    ///
    /// # Errors
    ///
    /// Returns an error if the membership already exists or either side
    /// is missing (constraint violations), or the database call fails.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        team_id: &str,
        employee_id: &str,
        role: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, TeamMembership>(
            r#"
            INSERT INTO team_members (team_id, employee_id, role)
            VALUES ($1, $2, $3)
            RETURNING team_id, employee_id, role, created_at
            "#,
        )
        .bind(team_id)
        .bind(employee_id)
        .bind(role)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    /// Removes an employee from a team
    ///
    /// Deletes the membership row only. Task rows created while the
    /// employee was a member stay untouched.
    pub async fn delete(
        pool: &PgPool,
        team_id: &str,
        employee_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND employee_id = $2")
                .bind(team_id)
                .bind(employee_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finds a specific membership
    pub async fn find(
        pool: &PgPool,
        team_id: &str,
        employee_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, TeamMembership>(
            r#"
            SELECT team_id, employee_id, role, created_at
            FROM team_members
            WHERE team_id = $1 AND employee_id = $2
            "#,
        )
        .bind(team_id)
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Lists every membership in a company
    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, TeamMembership>(
            r#"
            SELECT tm.team_id, tm.employee_id, tm.role, tm.created_at
            FROM team_members tm
            JOIN teams t ON t.id = tm.team_id
            WHERE t.company_id = $1
            ORDER BY tm.team_id, tm.employee_id
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Lists the teams an employee belongs to
    pub async fn list_for_employee(
        pool: &PgPool,
        employee_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, TeamMembership>(
            r#"
            SELECT team_id, employee_id, role, created_at
            FROM team_members
            WHERE employee_id = $1
            ORDER BY team_id
            "#,
        )
        .bind(employee_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Current roster of a team, with display names
    pub async fn roster(
        executor: impl sqlx::PgExecutor<'_>,
        team_id: &str,
    ) -> Result<Vec<RosterEntry>, sqlx::Error> {
        let roster = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT tm.employee_id, e.firstname, e.lastname
            FROM team_members tm
            JOIN employees e ON e.id = tm.employee_id
            WHERE tm.team_id = $1
            ORDER BY tm.employee_id
            "#,
        )
        .bind(team_id)
        .fetch_all(executor)
        .await?;

        Ok(roster)
    }

    /// Rosters of several teams at once, company-scoped
    ///
    /// Returns (team_id, member) rows; a team with no members yields one
    /// row with `None` so it still counts as existing. Teams from
    /// another company do not appear, so an unknown team and a foreign
    /// team look alike to the resolver.
    pub async fn rosters_for_teams(
        executor: impl sqlx::PgExecutor<'_>,
        company_id: Uuid,
        team_ids: &[String],
    ) -> Result<Vec<(String, Option<String>)>, sqlx::Error> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT t.id, tm.employee_id
            FROM teams t
            LEFT JOIN team_members tm ON tm.team_id = t.id
            WHERE t.company_id = $1 AND t.id = ANY($2)
            "#,
        )
        .bind(company_id)
        .bind(team_ids)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
