/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Account endpoints (register, login, refresh, logout, password)
/// - `employees`: Directory listing and creation
/// - `companies`: Company creation
/// - `teams`: Team listing and creation
/// - `memberships`: Team membership management
/// - `competences`: Competences, assignment, and progress
/// - `user_tasks`: Per-member status and review updates
/// - `files`: Competence attachments
/// - `search`: Fuzzy directory search

pub mod auth;
pub mod companies;
pub mod competences;
pub mod employees;
pub mod files;
pub mod health;
pub mod memberships;
pub mod search;
pub mod teams;
pub mod user_tasks;
