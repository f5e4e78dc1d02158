/// Company endpoints
///
/// Companies are usually founded during registration; this endpoint
/// exists for administrators who provision them separately.
///
/// # Endpoints
///
/// - `POST /api/company` - Create a company (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use skilltrack_shared::{auth::middleware::AuthContext, models::company::Company};

/// Create company request
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
}

/// Create a company
///
/// # Errors
///
/// - `400 Bad Request`: Empty name
/// - `403 Forbidden`: Caller is not an administrator
pub async fn create_company(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<Company>)> {
    if !auth.is_admin() {
        return Err(ApiError::Forbidden(
            "Administrator role required to create companies".to_string(),
        ));
    }

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Company name is required".to_string()));
    }

    let company = Company::create(&state.db, name).await?;

    Ok((StatusCode::CREATED, Json(company)))
}
