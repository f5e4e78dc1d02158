/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: JWT token generation and validation
/// - [`tokens`]: refresh-token revocation store
/// - [`middleware`]: request authentication context and role gates
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing, access/refresh pair with rotation
/// - **Revocation**: used refresh tokens are blacklisted by `jti` until
///   they would have expired anyway
///
/// # Example
///
/// ```no_run
/// use skilltrack_shared::auth::password::{hash_password, verify_password};
/// use skilltrack_shared::auth::jwt::issue_token_pair;
/// use skilltrack_shared::models::employee::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let pair = issue_token_pair("e1", Uuid::new_v4(), Role::Employee, "secret")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod tokens;
