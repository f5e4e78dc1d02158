/// Employee model and database operations
///
/// Employees are the people competences get assigned to. Each belongs to
/// exactly one company and carries a short human-readable id (`e1`,
/// `e2`, ...) minted by the `employee_ids` sequence.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE employees (
///     id VARCHAR(10) PRIMARY KEY DEFAULT ('e' || nextval('employee_ids')),
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     firstname VARCHAR(255) NOT NULL,
///     lastname VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(20) NOT NULL DEFAULT 'employee',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use skilltrack_shared::models::employee::{Employee, CreateEmployee, Role};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, company_id: Uuid) -> Result<(), sqlx::Error> {
/// let employee = Employee::create(&pool, CreateEmployee {
///     company_id,
///     firstname: "Ada".to_string(),
///     lastname: "Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Employee,
/// }).await?;
///
/// println!("Created employee {}", employee.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Access role of an employee account
///
/// HR gates accept both `Hr` and `Admin`. The legacy French spelling
/// `rh` normalizes to `Hr` on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular employee, can work own tasks
    Employee,

    /// HR staff, can manage competences and review anyone
    Hr,

    /// Full administrative access
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Hr => "hr",
            Role::Admin => "admin",
        }
    }

    /// Parses a raw role string, defaulting unknown values to `Employee`
    pub fn from_raw(raw: &str) -> Role {
        match raw.trim().to_lowercase().as_str() {
            "hr" | "rh" => Role::Hr,
            "admin" => Role::Admin,
            _ => Role::Employee,
        }
    }

    /// True for roles allowed through the HR gates
    pub fn is_hr(&self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Employee account within a company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    /// Short directory id (`e1`, `e2`, ...)
    pub id: String,

    /// Owning company
    pub company_id: Uuid,

    pub firstname: String,

    pub lastname: String,

    /// Stored lowercased; unique across the system
    pub email: String,

    /// Argon2id hash, never serialized into responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: Role,

    /// Accounts created by HR start inactive until the first login
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new employee
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub company_id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Input for updating an employee; only set fields change
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl Employee {
    /// Creates a new employee, minting the next `e{n}` id
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken or the database
    /// call fails.
    pub async fn create(pool: &PgPool, data: CreateEmployee) -> Result<Self, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (company_id, firstname, lastname, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, company_id, firstname, lastname, email, password_hash,
                      role, is_active, created_at, updated_at
            "#,
        )
        .bind(data.company_id)
        .bind(data.firstname)
        .bind(data.lastname)
        .bind(data.email.to_lowercase())
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(employee)
    }

    /// Creates an inactive employee account on behalf of HR
    ///
    /// The account flips active on its first successful login.
    pub async fn create_inactive(pool: &PgPool, data: CreateEmployee) -> Result<Self, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (company_id, firstname, lastname, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING id, company_id, firstname, lastname, email, password_hash,
                      role, is_active, created_at, updated_at
            "#,
        )
        .bind(data.company_id)
        .bind(data.firstname)
        .bind(data.lastname)
        .bind(data.email.to_lowercase())
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(employee)
    }

    /// Finds an employee by id within a company
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: Uuid,
        id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, company_id, firstname, lastname, email, password_hash,
                   role, is_active, created_at, updated_at
            FROM employees
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(employee)
    }

    /// Finds an employee by email address
    ///
    /// Email is unique across companies, so login does not need to know
    /// the company up front. Lookup is case-insensitive.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, company_id, firstname, lastname, email, password_hash,
                   role, is_active, created_at, updated_at
            FROM employees
            WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(pool)
        .await?;

        Ok(employee)
    }

    /// Lists employees of a company, oldest first
    pub async fn list(
        pool: &PgPool,
        company_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, company_id, firstname, lastname, email, password_hash,
                   role, is_active, created_at, updated_at
            FROM employees
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

        Ok(employees)
    }

    /// Updates an employee; only set fields change
    pub async fn update(
        pool: &PgPool,
        company_id: Uuid,
        id: &str,
        data: UpdateEmployee,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE employees SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.firstname.is_some() {
            bind_count += 1;
            query.push_str(&format!(", firstname = ${}", bind_count));
        }
        if data.lastname.is_some() {
            bind_count += 1;
            query.push_str(&format!(", lastname = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(
            " WHERE company_id = $1 AND id = $2 \
             RETURNING id, company_id, firstname, lastname, email, password_hash, \
             role, is_active, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Employee>(&query)
            .bind(company_id)
            .bind(id);

        if let Some(firstname) = data.firstname {
            q = q.bind(firstname);
        }
        if let Some(lastname) = data.lastname {
            q = q.bind(lastname);
        }
        if let Some(email) = data.email {
            q = q.bind(email.to_lowercase());
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        let employee = q.fetch_optional(pool).await?;

        Ok(employee)
    }

    /// Flips the is_active flag
    ///
    /// Returns true if the employee existed.
    pub async fn set_active(pool: &PgPool, id: &str, active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Keeps only the ids that exist within the company
    ///
    /// Used to snapshot the directory before resolving assignment
    /// targets.
    pub async fn filter_existing(
        executor: impl sqlx::PgExecutor<'_>,
        company_id: Uuid,
        ids: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT id FROM employees
            WHERE company_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(company_id)
        .bind(ids)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Fetches several employees by id within a company
    pub async fn find_many(
        executor: impl sqlx::PgExecutor<'_>,
        company_id: Uuid,
        ids: &[String],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, company_id, firstname, lastname, email, password_hash,
                   role, is_active, created_at, updated_at
            FROM employees
            WHERE company_id = $1 AND id = ANY($2)
            ORDER BY id
            "#,
        )
        .bind(company_id)
        .bind(ids)
        .fetch_all(executor)
        .await?;

        Ok(employees)
    }

    /// Counts employees of a company
    pub async fn count(pool: &PgPool, company_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM employees WHERE company_id = $1")
                .bind(company_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_raw_accepts_legacy_spellings() {
        assert_eq!(Role::from_raw("hr"), Role::Hr);
        assert_eq!(Role::from_raw("RH"), Role::Hr);
        assert_eq!(Role::from_raw("admin"), Role::Admin);
        assert_eq!(Role::from_raw("employee"), Role::Employee);
        assert_eq!(Role::from_raw("manager"), Role::Employee);
        assert_eq!(Role::from_raw(""), Role::Employee);
    }

    #[test]
    fn hr_gate_covers_admin() {
        assert!(Role::Hr.is_hr());
        assert!(Role::Admin.is_hr());
        assert!(!Role::Employee.is_hr());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let employee = Employee {
            id: "e1".to_string(),
            company_id: Uuid::new_v4(),
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: Role::Employee,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&employee).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("ada@example.com"));
    }

    // Integration tests for database operations require a running database
}
