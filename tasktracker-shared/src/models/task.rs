/// Task model and database operations
///
/// Tasks belong to exactly one project and are the unit of work tracked by
/// the system. A task cannot be persisted without an existing project; an
/// assignee is optional and travels as a username on the wire.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Every query joins `users` so a fetched task carries its assignee
/// username without a second round trip.
///
/// # Example
///
/// ```no_run
/// use tasktracker_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
/// use tasktracker_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write spec".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     priority: TaskPriority::Medium,
///     assigned_to: None,
///     project_id,
///     due_date: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

/// Task workflow status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Todo,

    /// Someone is working on it
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses in workflow order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait
    Low,

    /// Normal priority
    #[default]
    Medium,

    /// Needs attention first
    High,
}

impl TaskPriority {
    /// All priorities in ascending order
    pub const ALL: [TaskPriority; 3] =
        [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    /// Converts priority to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task model
///
/// `assigned_to_username` is populated from the LEFT JOIN on `users` and
/// is what the API serializes for the `assigned_to` wire field.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Assignee user id (null when unassigned or the user was deleted)
    pub assigned_to: Option<Uuid>,

    /// Assignee username, joined from the users table
    pub assigned_to_username: Option<String>,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// The assignee is already resolved to a user id by the caller; the API
/// layer performs username resolution and verifies the project reference
/// before this struct is built.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Workflow status (defaults to todo upstream when omitted)
    pub status: TaskStatus,

    /// Priority (defaults to medium upstream when omitted)
    pub priority: TaskPriority,

    /// Resolved assignee id
    pub assigned_to: Option<Uuid>,

    /// Project the task belongs to
    pub project_id: Uuid,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// Input for updating a task
///
/// Only non-None fields are updated. Nested Options clear the value with
/// `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New assignee (use Some(None) to unassign)
    pub assigned_to: Option<Option<Uuid>>,

    /// Move to another project
    pub project_id: Option<Uuid>,

    /// New due date (use Some(None) to clear)
    pub due_date: Option<Option<NaiveDate>>,
}

const TASK_COLUMNS: &str = r#"t.id, t.title, t.description, t.status, t.priority, t.assigned_to,
       u.username AS assigned_to_username, t.project_id, t.due_date,
       t.created_at, t.updated_at"#;

impl Task {
    /// Creates a new task
    ///
    /// The insert and the assignee-username join run as one statement, so
    /// the returned task is complete.
    ///
    /// # Errors
    ///
    /// Returns an error if a foreign key is violated or the database
    /// operation fails. Callers are expected to have validated the project
    /// reference already and to treat an FK violation here as a race, not
    /// a normal path.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            WITH inserted AS (
                INSERT INTO tasks (title, description, status, priority, assigned_to, project_id, due_date)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, title, description, status, priority, assigned_to, project_id,
                          due_date, created_at, updated_at
            )
            SELECT t.id, t.title, t.description, t.status, t.priority, t.assigned_to,
                   u.username AS assigned_to_username, t.project_id, t.due_date,
                   t.created_at, t.updated_at
            FROM inserted t
            LEFT JOIN users u ON u.id = t.assigned_to
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .bind(data.project_id)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assigned_to
            WHERE t.id = $1
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Lists all tasks in creation order
    ///
    /// No filtering or pagination; list-all is acceptable at this scale.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assigned_to
            ORDER BY t.created_at ASC, t.id ASC
            "#
        );

        let tasks = sqlx::query_as::<_, Task>(&query).fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Updates an existing task
    ///
    /// Only non-None fields are updated; `updated_at` is bumped on every
    /// call. The updated row is re-read through the username join.
    ///
    /// Returns the updated task if found, None if it doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to = ${}", bind_count));
        }
        if data.project_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", project_id = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id");

        let mut q = sqlx::query_as::<_, (Uuid,)>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(project_id) = data.project_id {
            q = q.bind(project_id);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        match q.fetch_optional(pool).await? {
            Some((updated_id,)) => Self::find_by_id(pool, updated_id).await,
            None => Ok(None),
        }
    }

    /// Deletes a task by ID
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_task_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_status_serde_wire_values() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let status: TaskStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(status, TaskStatus::Done);

        // Exactly these values are accepted on the wire
        assert!(serde_json::from_str::<TaskStatus>("\"blocked\"").is_err());
        assert!(serde_json::from_str::<TaskPriority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_update_task_default_is_noop() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.status.is_none());
        assert!(update.priority.is_none());
        assert!(update.assigned_to.is_none());
        assert!(update.project_id.is_none());
        assert!(update.due_date.is_none());
    }
}
