/// Database models for TaskTracker
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts referenced by projects and tasks
/// - `project`: Projects with an owner and a member set
/// - `task`: Tasks belonging to a project
///
/// # Example
///
/// ```no_run
/// use tasktracker_shared::models::user::{CreateUser, User};
/// use tasktracker_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     display_name: Some("Alice".to_string()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod task;
pub mod user;
