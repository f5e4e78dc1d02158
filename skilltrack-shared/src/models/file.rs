/// File metadata model for competence attachments
///
/// The blob itself lives on disk under the configured upload directory;
/// this table records where it came from and where it went.
/// `stored_name` is the on-disk handle, minted from a UUID so original
/// names never touch the filesystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredFile {
    pub id: Uuid,

    pub competence_id: Uuid,

    /// Display name
    pub name: String,

    /// Name the client uploaded the file under
    pub original_name: String,

    /// On-disk file name under the upload directory
    pub stored_name: String,

    pub extension: Option<String>,

    pub mime_type: Option<String>,

    /// Size in bytes
    pub size: i64,

    /// Uploader, kept when the employee account goes away
    pub uploaded_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for recording an uploaded file
#[derive(Debug, Clone)]
pub struct CreateFile {
    pub competence_id: Uuid,
    pub name: String,
    pub original_name: String,
    pub stored_name: String,
    pub extension: Option<String>,
    pub mime_type: Option<String>,
    pub size: i64,
    pub uploaded_by: Option<String>,
}

impl StoredFile {
    /// Records an uploaded file
    pub async fn create(pool: &PgPool, data: CreateFile) -> Result<Self, sqlx::Error> {
        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO files (competence_id, name, original_name, stored_name,
                               extension, mime_type, size, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, competence_id, name, original_name, stored_name,
                      extension, mime_type, size, uploaded_by, created_at
            "#,
        )
        .bind(data.competence_id)
        .bind(data.name)
        .bind(data.original_name)
        .bind(data.stored_name)
        .bind(data.extension)
        .bind(data.mime_type)
        .bind(data.size)
        .bind(data.uploaded_by)
        .fetch_one(pool)
        .await?;

        Ok(file)
    }

    /// Finds a file by id within a company
    ///
    /// Scoped through the owning competence.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            SELECT f.id, f.competence_id, f.name, f.original_name, f.stored_name,
                   f.extension, f.mime_type, f.size, f.uploaded_by, f.created_at
            FROM files f
            JOIN competences c ON c.id = f.competence_id
            WHERE c.company_id = $1 AND f.id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(file)
    }

    /// Lists every file in a company, newest first
    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let files = sqlx::query_as::<_, StoredFile>(
            r#"
            SELECT f.id, f.competence_id, f.name, f.original_name, f.stored_name,
                   f.extension, f.mime_type, f.size, f.uploaded_by, f.created_at
            FROM files f
            JOIN competences c ON c.id = f.competence_id
            WHERE c.company_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(files)
    }

    /// Lists the files attached to one competence
    pub async fn list_for_competence(
        pool: &PgPool,
        competence_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let files = sqlx::query_as::<_, StoredFile>(
            r#"
            SELECT id, competence_id, name, original_name, stored_name,
                   extension, mime_type, size, uploaded_by, created_at
            FROM files
            WHERE competence_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(competence_id)
        .fetch_all(pool)
        .await?;

        Ok(files)
    }

    /// Deletes a file row
    ///
    /// Callers establish company scope via [`StoredFile::find_by_id`]
    /// first and clean the blob up from disk afterwards.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
