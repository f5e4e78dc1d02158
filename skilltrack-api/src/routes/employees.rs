/// Employee directory endpoints
///
/// Listing and account creation for HR. Self-service registration lives
/// in the auth module.
///
/// # Endpoints
///
/// - `GET /api/employee` - List company employees (HR)
/// - `POST /api/employee` - Create an employee account (HR)

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
    auth::{middleware::AuthContext, password},
    models::employee::{CreateEmployee, Employee, Role},
};
use validator::Validate;

/// Password assigned to HR-created accounts until the first login
const INITIAL_PASSWORD: &str = "changeme";

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Create employee request (HR)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub firstname: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub lastname: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Initial password; a well-known default applies when omitted
    pub password: Option<String>,

    /// Role; unknown values fall back to `employee`
    pub role: Option<String>,
}

/// List employees of the caller's company
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
pub async fn list_employees(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Employee>>> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to list employees".to_string(),
        ));
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let employees = Employee::list(&state.db, auth.company_id, limit, offset).await?;

    Ok(Json(employees))
}

/// Create an employee account on behalf of HR
///
/// The account starts inactive and flips active on its first login.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not HR
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    if !auth.is_hr() {
        return Err(ApiError::Forbidden(
            "HR role required to create employees".to_string(),
        ));
    }

    req.validate().map_err(|e| {
        let errors = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors
                    .iter()
                    .map(move |error| crate::error::ValidationErrorDetail {
                        field: field.to_string(),
                        message: error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Validation failed".to_string()),
                    })
            })
            .collect();
        ApiError::ValidationError(errors)
    })?;

    let initial_password = req.password.as_deref().unwrap_or(INITIAL_PASSWORD);
    password::validate_password_strength(initial_password).map_err(ApiError::BadRequest)?;
    let password_hash = password::hash_password(initial_password)?;

    let role = req
        .role
        .as_deref()
        .map(Role::from_raw)
        .unwrap_or(Role::Employee);

    let employee = Employee::create_inactive(
        &state.db,
        CreateEmployee {
            company_id: auth.company_id,
            firstname: req.firstname,
            lastname: req.lastname,
            email: req.email,
            password_hash,
            role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}
