/// User task model (competence-employee assignment row)
///
/// One row per employee a competence covers, keyed by the pair. The row
/// carries the working status plus the two review texts. Status strings
/// are canonicalized before they get here; the column still types as
/// text so that historical rows with a stray vocabulary score as
/// `To Do` instead of failing to decode.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_tasks (
///     competence_id UUID NOT NULL REFERENCES competences(id) ON DELETE CASCADE,
///     employee_id VARCHAR(10) NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
///     status VARCHAR(50) NOT NULL DEFAULT 'To Do',
///     employee_review TEXT,
///     hr_review TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (competence_id, employee_id)
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserTask {
    pub competence_id: Uuid,

    pub employee_id: String,

    /// Canonical status label ("To Do", "In Progress", ...)
    pub status: String,

    /// The employee's own notes on the task
    pub employee_review: Option<String>,

    /// HR's notes, writable only through the HR path
    pub hr_review: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Review fields of a task update; only set fields change
#[derive(Debug, Clone, Default)]
pub struct UpdateUserTask {
    pub status: Option<String>,
    pub employee_review: Option<String>,
    pub hr_review: Option<String>,
}

/// Task row joined with the employee's display fields
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberStatusRow {
    pub competence_id: Uuid,
    pub employee_id: String,
    pub firstname: String,
    pub lastname: String,
    pub status: String,
    pub employee_review: Option<String>,
    pub hr_review: Option<String>,
}

/// Task row joined with its competence, for the per-employee listing
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EmployeeTaskRow {
    pub competence_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub label: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub employee_review: Option<String>,
    pub hr_review: Option<String>,
}

/// Roster entry with the member's task status, if any
///
/// Produced by a LEFT JOIN from the team roster: a member the
/// competence does not cover yet comes back with `status: None` and is
/// scored as `To Do`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RosterStatusRow {
    pub employee_id: String,
    pub firstname: String,
    pub lastname: String,
    pub status: Option<String>,
}

impl UserTask {
    /// Creates a task row for one employee
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
        employee_id: &str,
        status: &str,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, UserTask>(
            r#"
            INSERT INTO user_tasks (competence_id, employee_id, status)
            VALUES ($1, $2, $3)
            RETURNING competence_id, employee_id, status, employee_review, hr_review,
                      created_at, updated_at
            "#,
        )
        .bind(competence_id)
        .bind(employee_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    /// Deletes a task row, dropping its reviews with it
    pub async fn delete(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
        employee_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_tasks WHERE competence_id = $1 AND employee_id = $2")
                .bind(competence_id)
                .bind(employee_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finds a specific task row
    pub async fn find(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
        employee_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, UserTask>(
            r#"
            SELECT competence_id, employee_id, status, employee_review, hr_review,
                   created_at, updated_at
            FROM user_tasks
            WHERE competence_id = $1 AND employee_id = $2
            "#,
        )
        .bind(competence_id)
        .bind(employee_id)
        .fetch_optional(executor)
        .await?;

        Ok(task)
    }

    /// Ids of the employees a competence currently covers
    pub async fn employee_ids_for_competence(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT employee_id FROM user_tasks
            WHERE competence_id = $1
            ORDER BY employee_id
            "#,
        )
        .bind(competence_id)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Member rows with names for one competence
    pub async fn members_for_competence(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
    ) -> Result<Vec<MemberStatusRow>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberStatusRow>(
            r#"
            SELECT ut.competence_id, ut.employee_id, e.firstname, e.lastname,
                   ut.status, ut.employee_review, ut.hr_review
            FROM user_tasks ut
            JOIN employees e ON e.id = ut.employee_id
            WHERE ut.competence_id = $1
            ORDER BY ut.employee_id
            "#,
        )
        .bind(competence_id)
        .fetch_all(executor)
        .await?;

        Ok(members)
    }

    /// Member rows with names, batched over many competences
    pub async fn members_for_competences(
        executor: impl sqlx::PgExecutor<'_>,
        competence_ids: &[Uuid],
    ) -> Result<Vec<MemberStatusRow>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberStatusRow>(
            r#"
            SELECT ut.competence_id, ut.employee_id, e.firstname, e.lastname,
                   ut.status, ut.employee_review, ut.hr_review
            FROM user_tasks ut
            JOIN employees e ON e.id = ut.employee_id
            WHERE ut.competence_id = ANY($1)
            ORDER BY ut.competence_id, ut.employee_id
            "#,
        )
        .bind(competence_ids)
        .fetch_all(executor)
        .await?;

        Ok(members)
    }

    /// An employee's tasks joined with their competences
    pub async fn list_for_employee(
        pool: &PgPool,
        employee_id: &str,
    ) -> Result<Vec<EmployeeTaskRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EmployeeTaskRow>(
            r#"
            SELECT c.id AS competence_id, c.title, c.description, c.label,
                   c.start_date, c.end_date, ut.status, ut.employee_review, ut.hr_review
            FROM user_tasks ut
            JOIN competences c ON c.id = ut.competence_id
            WHERE ut.employee_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// A team's current roster with per-member status for one competence
    ///
    /// Members without a task row come back with `None`; they count as
    /// `To Do` in the progress roll-up.
    pub async fn roster_statuses(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
        team_id: &str,
    ) -> Result<Vec<RosterStatusRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RosterStatusRow>(
            r#"
            SELECT tm.employee_id, e.firstname, e.lastname, ut.status
            FROM team_members tm
            JOIN employees e ON e.id = tm.employee_id
            LEFT JOIN user_tasks ut
                   ON ut.competence_id = $1 AND ut.employee_id = tm.employee_id
            WHERE tm.team_id = $2
            ORDER BY tm.employee_id
            "#,
        )
        .bind(competence_id)
        .bind(team_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    /// Every task row in a company
    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, UserTask>(
            r#"
            SELECT ut.competence_id, ut.employee_id, ut.status, ut.employee_review,
                   ut.hr_review, ut.created_at, ut.updated_at
            FROM user_tasks ut
            JOIN competences c ON c.id = ut.competence_id
            WHERE c.company_id = $1
            ORDER BY ut.competence_id, ut.employee_id
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates review fields; only set fields change
    pub async fn update_review(
        executor: impl sqlx::PgExecutor<'_>,
        competence_id: Uuid,
        employee_id: &str,
        data: UpdateUserTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE user_tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.employee_review.is_some() {
            bind_count += 1;
            query.push_str(&format!(", employee_review = ${}", bind_count));
        }
        if data.hr_review.is_some() {
            bind_count += 1;
            query.push_str(&format!(", hr_review = ${}", bind_count));
        }

        query.push_str(
            " WHERE competence_id = $1 AND employee_id = $2 \
             RETURNING competence_id, employee_id, status, employee_review, hr_review, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, UserTask>(&query)
            .bind(competence_id)
            .bind(employee_id);

        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(employee_review) = data.employee_review {
            q = q.bind(employee_review);
        }
        if let Some(hr_review) = data.hr_review {
            q = q.bind(hr_review);
        }

        let task = q.fetch_optional(executor).await?;

        Ok(task)
    }

    /// Backfills `To Do` rows for a new team member
    ///
    /// One row per competence already assigned to the team, skipping
    /// pairs that exist. Returns how many rows were inserted.
    pub async fn backfill_for_member(
        executor: impl sqlx::PgExecutor<'_>,
        team_id: &str,
        employee_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_tasks (competence_id, employee_id, status)
            SELECT ta.competence_id, $2, 'To Do'
            FROM team_assignments ta
            WHERE ta.team_id = $1
            ON CONFLICT (competence_id, employee_id) DO NOTHING
            "#,
        )
        .bind(team_id)
        .bind(employee_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
