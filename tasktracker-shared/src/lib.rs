//! # TaskTracker Shared Library
//!
//! This crate contains the entity store and shared types used by the
//! TaskTracker API server and dashboard client.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, projects, tasks) and their CRUD operations
//! - `db`: PostgreSQL connection pool and migration runner
//! - `ownership`: Owner resolution policy for project creation

pub mod db;
pub mod models;
pub mod ownership;

/// Current version of the TaskTracker shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
