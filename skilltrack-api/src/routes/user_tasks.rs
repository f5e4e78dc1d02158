/// User task endpoints
///
/// A task row is the per-employee leg of a competence assignment. Two
/// update paths exist: employees edit their own status and review, HR
/// edits anyone's row including the HR review. Status input is
/// canonicalized before it is stored.
///
/// # Endpoints
///
/// - `GET /api/user_task` - Every task row in the company (HR)
/// - `PUT /api/user_task/me/:competence_id` - Update own row
/// - `PUT /api/user_task/:competence_id/:employee_id` - Update any row (HR)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use skilltrack_shared::{
    assignment::TaskStatus,
    auth::middleware::AuthContext,
    models::{
        competence::Competence,
        user_task::{UpdateUserTask, UserTask},
    },
};
use uuid::Uuid;

/// Task update request; absent fields stay untouched
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub status: Option<String>,
    pub employee_review: Option<String>,
    pub hr_review: Option<String>,
}

/// Task update response
#[derive(Debug, Serialize)]
pub struct UpdateTaskResponse {
    #[serde(flatten)]
    pub task: UserTask,

    /// Fields the caller sent but was not allowed to change
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub denied: Vec<&'static str>,
}

/// List every task row in the caller's company
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<UserTask>>> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to list all tasks".to_string(),
        ));
    }

    let tasks = UserTask::list(&state.db, auth.company_id).await?;

    Ok(Json(tasks))
}

/// Update the caller's own task row
///
/// Employees may change their status and their own review. The HR
/// review is off limits: a request carrying only `hr_review` is
/// rejected outright, one where it rides along with allowed fields
/// applies those and reports `hr_review` as denied.
///
/// # Errors
///
/// - `403 Forbidden`: Only `hr_review` was sent
/// - `404 Not Found`: No task row for the caller on this competence
pub async fn update_own_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(competence_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<UpdateTaskResponse>> {
    let hr_review_sent = req.hr_review.is_some();
    if hr_review_sent && req.status.is_none() && req.employee_review.is_none() {
        return Err(ApiError::Forbidden(
            "Employees cannot edit the HR review".to_string(),
        ));
    }

    Competence::find_by_id(&state.db, auth.company_id, competence_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Competence not found".to_string()))?;

    UserTask::find(&state.db, competence_id, &auth.employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task = UserTask::update_review(
        &state.db,
        competence_id,
        &auth.employee_id,
        UpdateUserTask {
            status: req
                .status
                .map(|s| TaskStatus::canonicalize(&s).as_str().to_string()),
            employee_review: req.employee_review,
            hr_review: None,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let denied = if hr_review_sent { vec!["hr_review"] } else { Vec::new() };

    Ok(Json(UpdateTaskResponse { task, denied }))
}

/// Update any member's task row (HR)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
/// - `404 Not Found`: Competence or task row not found
pub async fn update_member_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((competence_id, employee_id)): Path<(Uuid, String)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<UpdateTaskResponse>> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to edit other members' tasks".to_string(),
        ));
    }

    Competence::find_by_id(&state.db, auth.company_id, competence_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Competence not found".to_string()))?;

    let task = UserTask::update_review(
        &state.db,
        competence_id,
        &employee_id,
        UpdateUserTask {
            status: req
                .status
                .map(|s| TaskStatus::canonicalize(&s).as_str().to_string()),
            employee_review: req.employee_review,
            hr_review: req.hr_review,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(UpdateTaskResponse {
        task,
        denied: Vec::new(),
    }))
}
