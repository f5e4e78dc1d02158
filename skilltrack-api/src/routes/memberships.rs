/// Team membership endpoints
///
/// Membership and assignment rows are decoupled on purpose: adding a
/// member backfills fresh task rows for the team's current competences,
/// removing one deletes only the membership and leaves the tasks and
/// their reviews alone.
///
/// # Endpoints
///
/// - `POST /api/team_member` - Add an employee to a team (HR)
/// - `GET /api/team_member` - List company memberships (HR)
/// - `GET /api/team_member/employee/:employee_id` - Teams of an employee
/// - `GET /api/team_member/team/:team_id` - Roster of a team
/// - `DELETE /api/team_member/:team_id/:employee_id` - Remove a member (HR)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use skilltrack_shared::{
    auth::middleware::AuthContext,
    models::{
        employee::Employee,
        team::Team,
        team_membership::{RosterEntry, TeamMembership},
        user_task::UserTask,
    },
};

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub team_id: String,
    pub employee_id: String,

    /// Free-form role within the team ("lead", "member", ...)
    pub role: Option<String>,
}

/// Add member response
#[derive(Debug, Serialize)]
pub struct AddMemberResponse {
    pub membership: TeamMembership,

    /// Task rows created for the team's existing competences
    pub backfilled_tasks: u64,
}

/// Add an employee to a team
///
/// Backfills a `To Do` task row for each competence already assigned to
/// the team, in the same transaction as the membership itself. Rows the
/// employee already holds are left untouched.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
/// - `404 Not Found`: Team or employee not found in the company
/// - `409 Conflict`: Membership already exists
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<AddMemberResponse>)> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to manage memberships".to_string(),
        ));
    }

    Team::find_by_id(&state.db, auth.company_id, &req.team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    Employee::find_by_id(&state.db, auth.company_id, &req.employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let mut tx = state.db.begin().await?;

    let membership = TeamMembership::create(
        &mut *tx,
        &req.team_id,
        &req.employee_id,
        req.role.as_deref(),
    )
    .await?;

    let backfilled_tasks =
        UserTask::backfill_for_member(&mut *tx, &req.team_id, &req.employee_id).await?;

    tx.commit().await?;

    tracing::info!(
        team_id = %req.team_id,
        employee_id = %req.employee_id,
        backfilled_tasks,
        "member added to team"
    );

    Ok((
        StatusCode::CREATED,
        Json(AddMemberResponse {
            membership,
            backfilled_tasks,
        }),
    ))
}

/// List every membership in the caller's company
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
pub async fn list_memberships(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<TeamMembership>>> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to list memberships".to_string(),
        ));
    }

    let memberships = TeamMembership::list(&state.db, auth.company_id).await?;

    Ok(Json(memberships))
}

/// List the teams an employee belongs to
///
/// Employees can see their own memberships; HR can see anyone's.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the employee nor HR
/// - `404 Not Found`: Employee not found in the company
pub async fn list_for_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(employee_id): Path<String>,
) -> ApiResult<Json<Vec<TeamMembership>>> {
    if !auth.can_access_employee(&employee_id) {
        return Err(ApiError::Forbidden(
            "Cannot view another employee's memberships".to_string(),
        ));
    }

    Employee::find_by_id(&state.db, auth.company_id, &employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let memberships = TeamMembership::list_for_employee(&state.db, &employee_id).await?;

    Ok(Json(memberships))
}

/// Current roster of a team, with display names
///
/// # Errors
///
/// - `404 Not Found`: Team not found in the company
pub async fn list_for_team(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<RosterEntry>>> {
    Team::find_by_id(&state.db, auth.company_id, &team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let roster = TeamMembership::roster(&state.db, &team_id).await?;

    Ok(Json(roster))
}

/// Remove an employee from a team
///
/// Deletes the membership row only; task rows the employee acquired
/// while a member keep their status and reviews.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
/// - `404 Not Found`: Team or membership not found
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((team_id, employee_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to manage memberships".to_string(),
        ));
    }

    Team::find_by_id(&state.db, auth.company_id, &team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let removed = TeamMembership::delete(&state.db, &team_id, &employee_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Membership not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
