/// Account endpoints
///
/// This module provides employee account endpoints:
/// - Registration
/// - Login (with reactivation of dormant accounts)
/// - Token refresh with rotation
/// - Logout
/// - Password change
///
/// # Endpoints
///
/// - `POST /api/employee/register` - Register new employee
/// - `POST /api/employee/login` - Login and get a token pair
/// - `POST /api/employee/refresh` - Rotate a refresh token
/// - `POST /api/employee/logout` - Revoke the current refresh token
/// - `POST /api/employee/changepsw` - Change own password (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use skilltrack_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::{
        company::Company,
        employee::{CreateEmployee, Employee, Role, UpdateEmployee},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub firstname: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub lastname: String,

    /// Email address, stored lowercased
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Join an existing company by id
    pub company_id: Option<Uuid>,

    /// Or found a new company with this name
    #[validate(length(max = 255, message = "Company name must be at most 255 characters"))]
    pub company_name: Option<String>,

    /// Role; unknown values fall back to `employee`
    pub role: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The created employee account
    pub user: Employee,

    /// Access/refresh token pair
    pub tokens: jwt::TokenPair,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: Employee,

    pub tokens: jwt::TokenPair,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token to rotate
    pub refresh_token: String,
}

/// Logout request; the token is optional so a client that already lost
/// it can still log out
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Converts validator errors into the 422 response shape
fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
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
}

/// Remaining life of a token as a std Duration, for revocation TTLs
fn revocation_ttl(claims: &jwt::Claims) -> std::time::Duration {
    claims
        .time_until_expiration()
        .and_then(|d| d.to_std().ok())
        .unwrap_or(std::time::Duration::ZERO)
}

/// Register a new employee
///
/// Joins an existing company when `company_id` is given, otherwise
/// founds a new one named `company_name` (or a default derived from the
/// employee's name).
///
/// # Endpoint
///
/// ```text
/// POST /api/employee/register
/// Content-Type: application/json
///
/// {
///   "firstname": "Ada",
///   "lastname": "Lovelace",
///   "email": "ada@example.com",
///   "password": "secret123",
///   "company_name": "Analytical Engines Ltd"
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: `company_id` does not exist
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate().map_err(validation_errors)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let company_id = match req.company_id {
        Some(id) => {
            let company = Company::find_by_id(&state.db, id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;
            company.id
        }
        None => {
            let name = req
                .company_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("{} {}'s Company", req.firstname, req.lastname));
            Company::create(&state.db, &name).await?.id
        }
    };

    let role = req
        .role
        .as_deref()
        .map(Role::from_raw)
        .unwrap_or(Role::Employee);

    let user = Employee::create(
        &state.db,
        CreateEmployee {
            company_id,
            firstname: req.firstname,
            lastname: req.lastname,
            email: req.email,
            password_hash,
            role,
        },
    )
    .await?;

    let tokens = jwt::issue_token_pair(&user.id, user.company_id, user.role, state.jwt_secret())?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user, tokens })))
}

/// Login endpoint
///
/// Authenticates an employee and returns a token pair. Accounts created
/// by HR start inactive; the first successful login reactivates them.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials (never says which part)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(validation_errors)?;

    let mut user = Employee::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active {
        Employee::set_active(&state.db, &user.id, true).await?;
        user.is_active = true;
        tracing::info!(employee_id = %user.id, "dormant account reactivated on login");
    }

    let tokens = jwt::issue_token_pair(&user.id, user.company_id, user.role, state.jwt_secret())?;

    Ok(Json(LoginResponse { user, tokens }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a fresh pair. Rotation is one-shot:
/// the presented token is revoked for its remaining lifetime, so a
/// replayed token rejects.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, revoked, or wrong-type token
/// - `503 Service Unavailable`: Revocation store unreachable
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<jwt::TokenPair>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    if state.token_store.is_revoked(claims.jti).await? {
        return Err(ApiError::Unauthorized("Token has been revoked".to_string()));
    }

    // The account must still exist and be active.
    let user = Employee::find_by_id(&state.db, claims.company_id, &claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("Account is not active".to_string()))?;

    state
        .token_store
        .revoke(claims.jti, revocation_ttl(&claims))
        .await?;

    // Role comes from the directory, not the old token, so demotions
    // take effect at the next rotation.
    let tokens = jwt::issue_token_pair(&user.id, user.company_id, user.role, state.jwt_secret())?;

    Ok(Json(tokens))
}

/// Logout endpoint
///
/// Revokes the presented refresh token. Always answers 204, even
/// without a token; logout must not fail on the client side.
pub async fn logout(
    State(state): State<AppState>,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<StatusCode> {
    let token = body.and_then(|Json(req)| req.refresh_token);

    if let Some(token) = token {
        if let Ok(claims) = jwt::validate_refresh_token(&token, state.jwt_secret()) {
            state
                .token_store
                .revoke(claims.jti, revocation_ttl(&claims))
                .await?;
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Password change endpoint (authenticated)
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, new password too short, or the
///   new password equals the current one
/// - `401 Unauthorized`: Current password is wrong
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::BadRequest(
            "Both current and new password are required".to_string(),
        ));
    }

    password::validate_password_strength(&req.new_password).map_err(ApiError::BadRequest)?;

    if req.new_password == req.current_password {
        return Err(ApiError::BadRequest(
            "New password must differ from the current one".to_string(),
        ));
    }

    let user = Employee::find_by_id(&state.db, auth.company_id, &auth.employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let valid = password::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.new_password)?;
    Employee::update(
        &state.db,
        auth.company_id,
        &auth.employee_id,
        UpdateEmployee {
            password_hash: Some(password_hash),
            ..Default::default()
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
