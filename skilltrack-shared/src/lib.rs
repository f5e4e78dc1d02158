//! # SkillTrack Shared Library
//!
//! Shared types and business logic used by the SkillTrack API server.
//!
//! ## Module Organization
//!
//! - `assignment`: competence assignment engine (targets, resolution,
//!   reconciliation, status vocabulary, progress scales)
//! - `models`: database models and their CRUD operations
//! - `auth`: password hashing, JWT tokens, revocation store, middleware
//! - `notify`: assignment notification planning and delivery
//! - `db`: connection pool and migrations

pub mod assignment;
pub mod auth;
pub mod db;
pub mod models;
pub mod notify;

/// Current version of the SkillTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
