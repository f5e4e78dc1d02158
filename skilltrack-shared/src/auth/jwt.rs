/// JWT token generation and validation module
///
/// This module provides JWT (JSON Web Token) functionality for employee
/// authentication. Tokens are signed using HS256 (HMAC-SHA256) and carry
/// the employee's identity, company, and role.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 24 hours for access, 30 days for refresh
/// - **Validation**: Signature, expiration, and issuer checks
/// - **Revocation**: Refresh tokens carry a `jti`; a used or logged-out
///   token is blacklisted through the token store until it would have
///   expired anyway
///
/// # Token Types
///
/// - **Access Token**: Short-lived (24h), used for API authentication
/// - **Refresh Token**: Long-lived (30d), exchanged for a fresh pair
///
/// # Example
///
/// ```
/// use skilltrack_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use skilltrack_shared::models::employee::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let company_id = Uuid::new_v4();
///
/// let claims = Claims::new("e1".to_string(), company_id, Role::Employee, TokenType::Access);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, "e1");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::employee::Role;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 24 hours)
    Access,

    /// Refresh token (long-lived, 30 days)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (employee id, `e1` style)
/// - `iss`: Issuer (always "skilltrack")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
/// - `jti`: Token id, used for refresh revocation
///
/// # Custom Claims
///
/// - `company_id`: Tenancy context
/// - `role`: Employee role at issue time
/// - `token_type`: Access or refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - employee id
    pub sub: String,

    /// Issuer - always "skilltrack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token id (custom claim, revocation handle)
    pub jti: Uuid,

    /// Company ID (custom claim)
    pub company_id: Uuid,

    /// Role at issue time (custom claim)
    pub role: Role,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with default expiration
    pub fn new(employee_id: String, company_id: Uuid, role: Role, token_type: TokenType) -> Self {
        let now = Utc::now();
        let expiration = now + token_type.default_expiration();

        Self {
            sub: employee_id,
            iss: "skilltrack".to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4(),
            company_id,
            role,
            token_type,
        }
    }

    /// Creates claims with custom expiration
    pub fn with_expiration(
        employee_id: String,
        company_id: Uuid,
        role: Role,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: employee_id,
            iss: "skilltrack".to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4(),
            company_id,
            role,
            token_type,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration
    ///
    /// This is the TTL a revocation entry needs: after it, the token
    /// rejects on `exp` alone.
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Access/refresh token pair as returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret. The secret
/// should be at least 32 bytes; startup enforces this on the configured
/// value.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a fresh access/refresh pair for an employee
///
/// # Example
///
/// ```
/// use skilltrack_shared::auth::jwt::{issue_token_pair, validate_access_token};
/// use skilltrack_shared::models::employee::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pair = issue_token_pair("e1", Uuid::new_v4(), Role::Hr, "secret")?;
/// let claims = validate_access_token(&pair.access_token, "secret")?;
/// assert_eq!(claims.sub, "e1");
/// # Ok(())
/// # }
/// ```
pub fn issue_token_pair(
    employee_id: &str,
    company_id: Uuid,
    role: Role,
    secret: &str,
) -> Result<TokenPair, JwtError> {
    let access_claims = Claims::new(employee_id.to_string(), company_id, role, TokenType::Access);
    let refresh_claims = Claims::new(employee_id.to_string(), company_id, role, TokenType::Refresh);

    Ok(TokenPair {
        access_token: create_token(&access_claims, secret)?,
        refresh_token: create_token(&refresh_claims, secret)?,
    })
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Issuer is "skilltrack"
/// - Token is not used before nbf time
///
/// # Errors
///
/// Returns error if the signature is invalid, the token has expired,
/// the issuer doesn't match, or the token format is invalid
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&["skilltrack"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: "skilltrack".to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates token and checks it's an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::ValidationError(
            "Expected access token, got refresh token".to_string(),
        ));
    }

    Ok(claims)
}

/// Validates token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::ValidationError(
            "Expected refresh token, got access token".to_string(),
        ));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(30));
    }

    #[test]
    fn test_claims_creation() {
        let company_id = Uuid::new_v4();

        let claims = Claims::new("e7".to_string(), company_id, Role::Hr, TokenType::Access);

        assert_eq!(claims.sub, "e7");
        assert_eq!(claims.company_id, company_id);
        assert_eq!(claims.role, Role::Hr);
        assert_eq!(claims.iss, "skilltrack");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration(
            "e1".to_string(),
            Uuid::new_v4(),
            Role::Employee,
            TokenType::Access,
            Duration::hours(1),
        );

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500);
        assert!(time_left.num_seconds() <= 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let company_id = Uuid::new_v4();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::new("e3".to_string(), company_id, Role::Employee, TokenType::Access);
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, "e3");
        assert_eq!(validated.company_id, company_id);
        assert_eq!(validated.token_type, TokenType::Access);
        assert_eq!(validated.iss, "skilltrack");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new("e1".to_string(), Uuid::new_v4(), Role::Employee, TokenType::Access);
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret";

        let claims = Claims::with_expiration(
            "e1".to_string(),
            Uuid::new_v4(),
            Role::Employee,
            TokenType::Access,
            Duration::seconds(-3600),
        );

        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_access_token() {
        let secret = "secret";

        let access_claims =
            Claims::new("e1".to_string(), Uuid::new_v4(), Role::Employee, TokenType::Access);
        let access_token = create_token(&access_claims, secret).unwrap();
        assert!(validate_access_token(&access_token, secret).is_ok());

        let refresh_claims =
            Claims::new("e1".to_string(), Uuid::new_v4(), Role::Employee, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, secret).unwrap();
        assert!(validate_access_token(&refresh_token, secret).is_err());
    }

    #[test]
    fn test_validate_refresh_token() {
        let secret = "secret";

        let refresh_claims =
            Claims::new("e1".to_string(), Uuid::new_v4(), Role::Employee, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, secret).unwrap();
        assert!(validate_refresh_token(&refresh_token, secret).is_ok());

        let access_claims =
            Claims::new("e1".to_string(), Uuid::new_v4(), Role::Employee, TokenType::Access);
        let access_token = create_token(&access_claims, secret).unwrap();
        assert!(validate_refresh_token(&access_token, secret).is_err());
    }

    #[test]
    fn test_issue_token_pair() {
        let company_id = Uuid::new_v4();
        let secret = "my-secret-key-for-testing-purposes";

        let pair = issue_token_pair("e5", company_id, Role::Admin, secret).unwrap();

        let access = validate_access_token(&pair.access_token, secret).unwrap();
        assert_eq!(access.sub, "e5");
        assert_eq!(access.role, Role::Admin);

        let refresh = validate_refresh_token(&pair.refresh_token, secret).unwrap();
        assert_eq!(refresh.sub, "e5");
        assert_eq!(refresh.company_id, company_id);

        // Each token gets its own id
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn test_token_pair_serializes_camel_case() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };

        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.contains("accessToken"));
        assert!(json.contains("refreshToken"));
    }
}
