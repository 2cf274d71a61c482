//! # TaskTrack Shared Library
//!
//! This crate contains the types, store operations, and authentication
//! primitives shared by the TaskTrack API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their store operations
//! - `auth`: Password hashing, JWT tokens, and request authentication
//! - `db`: SQLite pool construction and schema migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
