/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `tasks`: Task CRUD, bulk operations, and stats

pub mod auth;
pub mod health;
pub mod tasks;
