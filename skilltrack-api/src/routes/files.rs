/// File attachment endpoints
///
/// Attachments belong to a competence. Blobs are stored on disk under
/// the configured upload directory with a UUID-minted name; the client's
/// original name only ever appears in metadata and the download header.
///
/// # Endpoints
///
/// - `POST /api/file` - Upload (multipart: `competence_id` + `file`)
/// - `GET /api/file` - List company files
/// - `GET /api/file/:id/download` - Download a blob
/// - `DELETE /api/file/:id` - Delete metadata and blob

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use skilltrack_shared::{
    auth::middleware::AuthContext,
    models::{
        competence::Competence,
        file::{CreateFile, StoredFile},
    },
};
use uuid::Uuid;

/// Upload a file attachment
///
/// Expects a multipart form with a `competence_id` text field and a
/// `file` part. The blob is written first; if the metadata insert then
/// fails the orphaned blob is removed.
///
/// # Errors
///
/// - `400 Bad Request`: Missing form fields or unreadable part
/// - `404 Not Found`: Competence not found in the company
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthContext,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<StoredFile>)> {
    let mut competence_id: Option<Uuid> = None;
    let mut file_part: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("competence_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable field: {}", e)))?;
                let id = text
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|_| ApiError::BadRequest("Invalid competence_id".to_string()))?;
                competence_id = Some(id);
            }
            Some("file") => {
                let original_name = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let mime_type = field.content_type().map(|m| m.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable file: {}", e)))?;
                file_part = Some((original_name, mime_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let competence_id = competence_id
        .ok_or_else(|| ApiError::BadRequest("competence_id field is required".to_string()))?;
    let (original_name, mime_type, bytes) =
        file_part.ok_or_else(|| ApiError::BadRequest("file field is required".to_string()))?;

    Competence::find_by_id(&state.db, auth.company_id, competence_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Competence not found".to_string()))?;

    let extension = std::path::Path::new(&original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let stored_name = match &extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    };

    let path = std::path::Path::new(&state.config.upload_dir).join(&stored_name);
    let size = bytes.len() as i64;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to store file: {}", e)))?;

    let file = StoredFile::create(
        &state.db,
        CreateFile {
            competence_id,
            name: original_name.clone(),
            original_name,
            stored_name,
            extension,
            mime_type,
            size,
            uploaded_by: Some(auth.employee_id.clone()),
        },
    )
    .await;

    let file = match file {
        Ok(file) => file,
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %cleanup, "failed to clean up orphaned blob");
            }
            return Err(e.into());
        }
    };

    tracing::info!(file_id = %file.id, competence_id = %competence_id, size, "file uploaded");

    Ok((StatusCode::CREATED, Json(file)))
}

/// List every file in the caller's company
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<StoredFile>>> {
    let files = StoredFile::list(&state.db, auth.company_id).await?;

    Ok(Json(files))
}

/// Download a file blob
///
/// # Errors
///
/// - `404 Not Found`: File not found in the company, or blob missing
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let file = StoredFile::find_by_id(&state.db, auth.company_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    let path = std::path::Path::new(&state.config.upload_dir).join(&file.stored_name);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound("File content not found".to_string()))?;

    let mut headers = HeaderMap::new();
    let content_type = file
        .mime_type
        .as_deref()
        .unwrap_or("application/octet-stream");
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.original_name.replace('"', "")
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    let mut response = Response::new(Body::from(bytes));
    *response.headers_mut() = headers;

    Ok(response)
}

/// Delete a file
///
/// Removes the metadata row, then the blob best-effort.
///
/// # Errors
///
/// - `404 Not Found`: File not found in the company
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let file = StoredFile::find_by_id(&state.db, auth.company_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    StoredFile::delete(&state.db, id).await?;

    let path = std::path::Path::new(&state.config.upload_dir).join(&file.stored_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove attachment blob");
    }

    Ok(StatusCode::NO_CONTENT)
}
