/// Database models for TaskTrack
///
/// This module contains the database models and their store operations.
/// Every query binds its inputs as parameters; no user-supplied text is ever
/// interpolated into SQL, and sort columns go through a fixed allow-list.
///
/// # Models
///
/// - `user`: User accounts (credential store)
/// - `task`: Tasks with owner scoping, filtering, and sorting

pub mod task;
pub mod user;
