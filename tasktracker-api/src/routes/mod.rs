/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `projects`: Project CRUD endpoints
/// - `tasks`: Task CRUD endpoints

pub mod health;
pub mod projects;
pub mod tasks;
