/// Competence endpoints
///
/// Create and update run the assignment pipeline: parse the target
/// batch, resolve it against a directory snapshot, diff against what is
/// persisted, and apply the resulting plan. Snapshot, diff, and apply
/// all happen inside one transaction so a concurrent membership change
/// cannot split the write. Unresolvable targets never fail the request;
/// they come back in the `unresolved` array.
///
/// # Endpoints
///
/// - `POST /api/competence` - Create and assign (HR)
/// - `PUT /api/competence/:id` - Update fields and/or reassign (HR)
/// - `GET /api/competence` - List with members and teams
/// - `GET /api/competence/employee/:employee_id` - An employee's tasks
/// - `GET /api/competence/team/:team_id` - Team overview with progress
/// - `GET /api/competence/:id/progress` - Progress roll-up
/// - `DELETE /api/competence/:id` - Delete with attachments (HR)

use std::collections::{BTreeSet, HashMap};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skilltrack_shared::{
    assignment::{
        progress::{competence_progress, competence_progress_tenths, status_value},
        reconcile, resolve, AssignTarget, ReconcilePlan, ResolveContext, TargetIssue, TaskStatus,
    },
    auth::middleware::AuthContext,
    models::{
        competence::{Competence, CreateCompetence, UpdateCompetenceFields},
        employee::Employee,
        file::StoredFile,
        team::Team,
        team_assignment::{TeamAssignment, TeamAssignmentDetail},
        user_task::{EmployeeTaskRow, MemberStatusRow, RosterStatusRow, UserTask},
    },
    notify::{assignment_notifications, dispatch},
};
use uuid::Uuid;

/// Create competence request
#[derive(Debug, Deserialize)]
pub struct CreateCompetenceRequest {
    pub title: String,
    pub description: Option<String>,
    pub label: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    /// Assignment targets, `{"kind": "employee"|"team", "id": ...}`
    #[serde(default)]
    pub members: Vec<serde_json::Value>,
}

/// Update competence request; absent fields stay untouched
#[derive(Debug, Deserialize)]
pub struct UpdateCompetenceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    /// When present, the full desired target set; rows not covered by it
    /// are removed
    pub members: Option<Vec<serde_json::Value>>,
}

/// Competence with its assignment state
#[derive(Debug, Serialize)]
pub struct CompetenceDetail {
    #[serde(flatten)]
    pub competence: Competence,

    pub members: Vec<MemberStatusRow>,

    pub teams: Vec<TeamAssignmentDetail>,

    /// Targets that could not be applied, in input order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<TargetIssue>,
}

/// One competence in the team overview
#[derive(Debug, Serialize)]
pub struct TeamCompetenceOverview {
    #[serde(flatten)]
    pub competence: Competence,

    /// Whole-percent completion over the team's current roster
    pub progress: u8,

    pub members: Vec<RosterStatusRow>,
}

/// Per-member line in the progress breakdown
#[derive(Debug, Serialize)]
pub struct MemberProgress {
    pub employee_id: String,
    pub firstname: String,
    pub lastname: String,
    pub status: String,
    pub value: f64,
}

/// Progress roll-up response
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub competence_id: Uuid,

    /// Whole-percent completion
    pub progress: u8,

    /// Tenth-of-a-percent completion, for dashboards
    pub progress_tenths: f64,

    pub members: Vec<MemberProgress>,
}

/// Loads the directory snapshot the target batch needs and resolves it
///
/// Runs on the write transaction so the snapshot and the applied plan
/// see the same directory state.
async fn resolve_targets(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    company_id: Uuid,
    raw_members: &[serde_json::Value],
) -> Result<(skilltrack_shared::assignment::ResolvedMembers, Vec<TargetIssue>), sqlx::Error> {
    let (targets, parse_issues) = AssignTarget::parse_all(raw_members);

    let team_ids: Vec<String> = targets
        .iter()
        .filter_map(|t| match t {
            AssignTarget::Team { id } => Some(id.clone()),
            AssignTarget::Employee { .. } => None,
        })
        .collect();
    let employee_ids: Vec<String> = targets
        .iter()
        .filter_map(|t| match t {
            AssignTarget::Employee { id } => Some(id.clone()),
            AssignTarget::Team { .. } => None,
        })
        .collect();

    let roster_rows =
        skilltrack_shared::models::team_membership::TeamMembership::rosters_for_teams(
            &mut **tx, company_id, &team_ids,
        )
        .await?;
    let known_employees = Employee::filter_existing(&mut **tx, company_id, &employee_ids).await?;

    let context = ResolveContext::from_directory(roster_rows, known_employees);
    let resolved = resolve(&targets, &context);

    Ok((resolved, parse_issues))
}

/// Applies a reconcile plan on the given transaction
///
/// New task rows start at `To Do`; removed rows take their reviews with
/// them.
async fn apply_plan(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    competence_id: Uuid,
    plan: &ReconcilePlan,
) -> Result<(), sqlx::Error> {
    for employee_id in &plan.to_add_user_tasks {
        UserTask::create(&mut **tx, competence_id, employee_id, TaskStatus::ToDo.as_str()).await?;
    }
    for employee_id in &plan.to_remove_user_tasks {
        UserTask::delete(&mut **tx, competence_id, employee_id).await?;
    }
    for team_id in &plan.to_add_team_assignments {
        TeamAssignment::create(&mut **tx, competence_id, team_id).await?;
    }
    for team_id in &plan.to_remove_team_assignments {
        TeamAssignment::delete(&mut **tx, competence_id, team_id).await?;
    }
    Ok(())
}

/// Notifies the employees a plan just added, without blocking the response
async fn notify_added(state: &AppState, company_id: Uuid, title: &str, plan: &ReconcilePlan) {
    if plan.to_add_user_tasks.is_empty() {
        return;
    }

    match Employee::find_many(&state.db, company_id, &plan.to_add_user_tasks).await {
        Ok(added) => {
            let notifications = assignment_notifications(&added, title);
            dispatch(state.mailer.clone(), notifications);
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load recipients for assignment notifications");
        }
    }
}

/// Create a competence and assign it
///
/// # Errors
///
/// - `400 Bad Request`: Empty title
/// - `403 Forbidden`: Caller is not HR
pub async fn create_competence(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateCompetenceRequest>,
) -> ApiResult<(StatusCode, Json<CompetenceDetail>)> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to manage competences".to_string(),
        ));
    }

    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    let mut tx = state.db.begin().await?;

    let competence = Competence::create(
        &mut *tx,
        CreateCompetence {
            company_id: auth.company_id,
            title,
            description: req.description,
            label: req.label,
            start_date: req.start_date,
            end_date: req.end_date,
        },
    )
    .await?;

    let (resolved, parse_issues) = resolve_targets(&mut tx, auth.company_id, &req.members).await?;

    // A fresh competence has no persisted rows to diff against.
    let plan = reconcile(&resolved, &BTreeSet::new(), &BTreeSet::new());
    apply_plan(&mut tx, competence.id, &plan).await?;

    tx.commit().await?;

    tracing::info!(
        competence_id = %competence.id,
        added_tasks = plan.to_add_user_tasks.len(),
        added_teams = plan.to_add_team_assignments.len(),
        unresolved = resolved.issues.len() + parse_issues.len(),
        "competence created"
    );

    notify_added(&state, auth.company_id, &competence.title, &plan).await;

    let members = UserTask::members_for_competence(&state.db, competence.id).await?;
    let teams = TeamAssignment::details_for_competence(&state.db, competence.id).await?;

    let mut unresolved = parse_issues;
    unresolved.extend(resolved.issues);

    Ok((
        StatusCode::CREATED,
        Json(CompetenceDetail {
            competence,
            members,
            teams,
            unresolved,
        }),
    ))
}

/// Update a competence's fields and/or reassign it
///
/// Scalar fields update independently of assignment. When `members` is
/// present it is the complete desired target set: task rows outside it
/// are removed, existing rows inside it keep their status and reviews.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
/// - `404 Not Found`: Competence not found in the company
pub async fn update_competence(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCompetenceRequest>,
) -> ApiResult<Json<CompetenceDetail>> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to manage competences".to_string(),
        ));
    }

    let mut tx = state.db.begin().await?;

    let mut competence = Competence::find_by_id(&mut *tx, auth.company_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Competence not found".to_string()))?;

    let fields = UpdateCompetenceFields {
        title: req.title,
        description: req.description,
        label: req.label,
        start_date: req.start_date,
        end_date: req.end_date,
    };
    if !fields.is_empty() {
        competence = Competence::update_fields(&mut *tx, auth.company_id, id, fields)
            .await?
            .ok_or_else(|| ApiError::NotFound("Competence not found".to_string()))?;
    }

    let mut unresolved = Vec::new();
    let mut plan = ReconcilePlan::default();

    if let Some(raw_members) = &req.members {
        let (resolved, parse_issues) = resolve_targets(&mut tx, auth.company_id, raw_members).await?;

        let current_tasks: BTreeSet<String> = UserTask::employee_ids_for_competence(&mut *tx, id)
            .await?
            .into_iter()
            .collect();
        let current_teams: BTreeSet<String> = TeamAssignment::team_ids_for_competence(&mut *tx, id)
            .await?
            .into_iter()
            .collect();

        plan = reconcile(&resolved, &current_tasks, &current_teams);
        apply_plan(&mut tx, id, &plan).await?;

        unresolved = parse_issues;
        unresolved.extend(resolved.issues);
    }

    tx.commit().await?;

    if !plan.is_empty() {
        tracing::info!(
            competence_id = %id,
            added_tasks = plan.to_add_user_tasks.len(),
            removed_tasks = plan.to_remove_user_tasks.len(),
            added_teams = plan.to_add_team_assignments.len(),
            removed_teams = plan.to_remove_team_assignments.len(),
            "competence reassigned"
        );
    }

    notify_added(&state, auth.company_id, &competence.title, &plan).await;

    let members = UserTask::members_for_competence(&state.db, id).await?;
    let teams = TeamAssignment::details_for_competence(&state.db, id).await?;

    Ok(Json(CompetenceDetail {
        competence,
        members,
        teams,
        unresolved,
    }))
}

/// List the company's competences with members and teams
pub async fn list_competences(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<CompetenceDetail>>> {
    let competences = Competence::list(&state.db, auth.company_id).await?;
    let ids: Vec<Uuid> = competences.iter().map(|c| c.id).collect();

    let mut members_by_competence: HashMap<Uuid, Vec<MemberStatusRow>> = HashMap::new();
    for row in UserTask::members_for_competences(&state.db, &ids).await? {
        members_by_competence
            .entry(row.competence_id)
            .or_default()
            .push(row);
    }

    let mut teams_by_competence: HashMap<Uuid, Vec<TeamAssignmentDetail>> = HashMap::new();
    for detail in TeamAssignment::details_for_competences(&state.db, &ids).await? {
        teams_by_competence
            .entry(detail.competence_id)
            .or_default()
            .push(detail);
    }

    let details = competences
        .into_iter()
        .map(|competence| CompetenceDetail {
            members: members_by_competence.remove(&competence.id).unwrap_or_default(),
            teams: teams_by_competence.remove(&competence.id).unwrap_or_default(),
            unresolved: Vec::new(),
            competence,
        })
        .collect();

    Ok(Json(details))
}

/// List an employee's tasks joined with their competences
///
/// Employees can see their own; HR can see anyone's.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the employee nor HR
/// - `404 Not Found`: Employee not found in the company
pub async fn list_for_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(employee_id): Path<String>,
) -> ApiResult<Json<Vec<EmployeeTaskRow>>> {
    if !auth.can_access_employee(&employee_id) {
        return Err(ApiError::Forbidden(
            "Cannot view another employee's tasks".to_string(),
        ));
    }

    Employee::find_by_id(&state.db, auth.company_id, &employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let tasks = UserTask::list_for_employee(&state.db, &employee_id).await?;

    Ok(Json(tasks))
}

/// Team overview: the team's competences with per-member status
///
/// Progress is computed over the team's current roster. A member the
/// competence does not cover yet counts as `To Do`, so churn after
/// assignment shows up as unfinished work instead of hiding.
///
/// # Errors
///
/// - `404 Not Found`: Team not found in the company
pub async fn team_overview(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<TeamCompetenceOverview>>> {
    Team::find_by_id(&state.db, auth.company_id, &team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let competences = Competence::list_for_team(&state.db, auth.company_id, &team_id).await?;

    let mut overview = Vec::with_capacity(competences.len());
    for competence in competences {
        let members = UserTask::roster_statuses(&state.db, competence.id, &team_id).await?;
        let progress = competence_progress(
            members
                .iter()
                .map(|m| m.status.as_deref().unwrap_or(TaskStatus::ToDo.as_str())),
        );

        overview.push(TeamCompetenceOverview {
            competence,
            progress,
            members,
        });
    }

    Ok(Json(overview))
}

/// Progress roll-up for one competence
///
/// # Errors
///
/// - `404 Not Found`: Competence not found in the company
pub async fn competence_progress_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProgressResponse>> {
    Competence::find_by_id(&state.db, auth.company_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Competence not found".to_string()))?;

    let members = UserTask::members_for_competence(&state.db, id).await?;

    let progress_tenths = competence_progress_tenths(members.iter().map(|m| m.status.as_str()));
    let progress = progress_tenths.round() as u8;

    let members = members
        .into_iter()
        .map(|m| MemberProgress {
            value: status_value(&m.status),
            employee_id: m.employee_id,
            firstname: m.firstname,
            lastname: m.lastname,
            status: m.status,
        })
        .collect();

    Ok(Json(ProgressResponse {
        competence_id: id,
        progress,
        progress_tenths,
        members,
    }))
}

/// Delete a competence
///
/// Assignment rows and file metadata cascade away in the database; the
/// stored blobs are removed best-effort afterwards, with failures
/// logged.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
/// - `404 Not Found`: Competence not found in the company
pub async fn delete_competence(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to manage competences".to_string(),
        ));
    }

    Competence::find_by_id(&state.db, auth.company_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Competence not found".to_string()))?;

    // Collect blob names before the cascade takes the metadata with it.
    let files = StoredFile::list_for_competence(&state.db, id).await?;

    let deleted = Competence::delete(&state.db, auth.company_id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Competence not found".to_string()));
    }

    for file in files {
        let path = std::path::Path::new(&state.config.upload_dir).join(&file.stored_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove attachment blob");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
