/// Database models for SkillTrack
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `company`: tenancy root
/// - `employee`: people competences get assigned to
/// - `team`: groups of employees
/// - `team_membership`: employee-team relationship
/// - `competence`: skills and training objectives
/// - `team_assignment`: competence-team relationship
/// - `user_task`: per-employee assignment row with status and reviews
/// - `file`: competence attachment metadata
///
/// # Example
///
/// ```no_run
/// use skilltrack_shared::models::employee::{Employee, CreateEmployee, Role};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, company_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let employee = Employee::create(&pool, CreateEmployee {
///     company_id,
///     firstname: "Ada".to_string(),
///     lastname: "Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Employee,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod company;
pub mod competence;
pub mod employee;
pub mod file;
pub mod team;
pub mod team_assignment;
pub mod team_membership;
pub mod user_task;
