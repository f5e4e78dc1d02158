/// Team endpoints
///
/// # Endpoints
///
/// - `GET /api/team` - List company teams
/// - `POST /api/team` - Create a team

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use skilltrack_shared::{
    auth::middleware::AuthContext,
    models::team::{CreateTeam, Team},
};

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Create team request
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub team_name: String,
    pub description: Option<String>,
}

/// List teams of the caller's company
pub async fn list_teams(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Team>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let teams = Team::list(&state.db, auth.company_id, limit, offset).await?;

    Ok(Json(teams))
}

/// Create a team
///
/// # Errors
///
/// - `400 Bad Request`: Empty team name
pub async fn create_team(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let team_name = req.team_name.trim().to_string();
    if team_name.is_empty() {
        return Err(ApiError::BadRequest("Team name is required".to_string()));
    }

    let team = Team::create(
        &state.db,
        CreateTeam {
            company_id: auth.company_id,
            team_name,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(team)))
}
