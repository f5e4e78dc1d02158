/// Request authentication context and role gates
///
/// The API layer validates the `Authorization: Bearer` header once per
/// request and inserts an [`AuthContext`] into the request extensions.
/// Handlers extract it as a plain argument; the extractor fails with 401
/// if the layer never ran.
///
/// Role checks happen at the handler level through the gate methods:
/// HR gates accept both `hr` and `admin`, and the self-or-HR gate covers
/// listings an employee may see about themselves.
///
/// # Example
///
/// ```no_run
/// use skilltrack_shared::auth::middleware::AuthContext;
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("Hello, {}!", auth.employee_id)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::employee::Role;

/// Error type for authentication failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials provided
    #[error("Missing authentication credentials")]
    MissingCredentials,

    /// Malformed Authorization header
    #[error("Invalid authorization format: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Authentication context added to request extensions
///
/// Carries the caller's identity as it was at token issue time. The
/// `company_id` scopes every query; `role` gates which mutations the
/// caller may perform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated employee id (`e1` style)
    pub employee_id: String,

    /// The caller's company, used as a scoping filter everywhere
    pub company_id: Uuid,

    /// Role at token issue time
    pub role: Role,
}

impl AuthContext {
    /// Builds the context from validated access-token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            employee_id: claims.sub.clone(),
            company_id: claims.company_id,
            role: claims.role,
        }
    }

    /// True for HR and admin callers
    pub fn is_hr(&self) -> bool {
        self.role.is_hr()
    }

    /// True for admin callers
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Self-or-HR gate: the caller may see an employee's data if it is
    /// their own or they hold an HR role
    pub fn can_access_employee(&self, employee_id: &str) -> bool {
        self.employee_id == employee_id || self.is_hr()
    }
}

/// Extracts the bearer token from an Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Header is not valid UTF-8".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": "unauthorized",
                        "message": "Missing authentication credentials",
                    })),
                )
                    .into_response()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;
    use axum::http::HeaderValue;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            employee_id: "e1".to_string(),
            company_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_missing_credentials() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn non_bearer_scheme_is_invalid_format() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn context_mirrors_claims() {
        let company_id = Uuid::new_v4();
        let claims = Claims::new("e4".to_string(), company_id, Role::Hr, TokenType::Access);
        let auth = AuthContext::from_claims(&claims);

        assert_eq!(auth.employee_id, "e4");
        assert_eq!(auth.company_id, company_id);
        assert_eq!(auth.role, Role::Hr);
    }

    #[test]
    fn hr_gate_covers_admin_only_above_employee() {
        assert!(context(Role::Hr).is_hr());
        assert!(context(Role::Admin).is_hr());
        assert!(!context(Role::Employee).is_hr());
        assert!(!context(Role::Hr).is_admin());
    }

    #[test]
    fn self_or_hr_gate() {
        let employee = context(Role::Employee);
        assert!(employee.can_access_employee("e1"));
        assert!(!employee.can_access_employee("e2"));

        let hr = context(Role::Hr);
        assert!(hr.can_access_employee("e2"));
    }
}
