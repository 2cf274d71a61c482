//! # TaskTrack API Server Library
//!
//! HTTP/JSON task-tracker API: task CRUD over an embedded SQLite store, JWT
//! bearer authentication, and Argon2id password hashing.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
