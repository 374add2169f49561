/// Task CRUD endpoints
///
/// # Endpoints
///
/// - `POST   {base}/tasks` - Create task
/// - `GET    {base}/tasks` - List all tasks
/// - `GET    {base}/tasks/:id` - Read one task
/// - `PUT    {base}/tasks/:id` - Update task
/// - `DELETE {base}/tasks/:id` - Delete task
///
/// # Wire shape
///
/// `project` travels as a project id and must reference an existing
/// project at write time; `assigned_to` travels as a username. `status`
/// defaults to `todo` and `priority` to `medium` when omitted. Creation
/// is not idempotent: resubmitting the same payload creates a second
/// task.
///
/// # Example Request
///
/// ```json
/// {
///   "title": "Write spec",
///   "project": "550e8400-e29b-41d4-a716-446655440000",
///   "status": "in_progress",
///   "priority": "high",
///   "assigned_to": "alice",
///   "due_date": "2025-08-01"
/// }
/// ```

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tasktracker_shared::models::{
    project::Project,
    task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Workflow status (defaults to todo)
    pub status: Option<TaskStatus>,

    /// Priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Project the task belongs to (required)
    pub project: Uuid,

    /// Assignee username
    pub assigned_to: Option<String>,

    /// Optional due date (ISO-8601 date)
    pub due_date: Option<NaiveDate>,
}

/// Update task request
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// Move to another project
    pub project: Option<Uuid>,

    /// New assignee username
    pub assigned_to: Option<String>,

    /// New due date
    pub due_date: Option<NaiveDate>,
}

/// Task response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task id
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Description (null when unset)
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Assignee username (null when unassigned)
    pub assigned_to: Option<String>,

    /// Project id
    pub project: Uuid,

    /// Due date (null when unset)
    pub due_date: Option<NaiveDate>,

    /// Creation timestamp (ISO-8601)
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (ISO-8601)
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            assigned_to: task.assigned_to_username,
            project: task.project_id,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Verifies that a project id references an existing row
async fn require_project(state: &AppState, project_id: Uuid) -> ApiResult<()> {
    if Project::exists(&state.db, project_id).await? {
        Ok(())
    } else {
        Err(ApiError::invalid_field(
            "project",
            format!("Referenced project {} does not exist", project_id),
        ))
    }
}

/// Resolves an assignee username to a user id
async fn resolve_assignee(state: &AppState, username: &str) -> ApiResult<Uuid> {
    User::find_by_username(&state.db, username)
        .await?
        .map(|user| user.id)
        .ok_or_else(|| {
            ApiError::invalid_field("assigned_to", format!("Unknown username: {}", username))
        })
}

/// Create task handler
///
/// Validates the payload, verifies the project reference, resolves the
/// assignee username, then persists the task. Nothing is persisted on any
/// validation failure.
///
/// # Errors
///
/// - 422: missing/empty title, nonexistent project, unknown assignee
///   username, or an enum value outside todo/in_progress/done and
///   low/medium/high (rejected during deserialization)
/// - 500: database failure
pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::ValidationError(validation_details(e)))?;

    require_project(&state, request.project).await?;

    let assigned_to = match &request.assigned_to {
        Some(username) => Some(resolve_assignee(&state, username).await?),
        None => None,
    };

    tracing::info!(
        title = %request.title,
        project_id = %request.project,
        status = %request.status.unwrap_or_default(),
        priority = %request.priority.unwrap_or_default(),
        "Creating task"
    );

    let task = Task::create(
        &state.db,
        CreateTask {
            title: request.title,
            description: request.description,
            status: request.status.unwrap_or_default(),
            priority: request.priority.unwrap_or_default(),
            assigned_to,
            project_id: request.project,
            due_date: request.due_date,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// List tasks handler
///
/// Returns every task in creation order; an empty store yields `[]`,
/// never an error.
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = Task::list(&state.db).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Read one task handler
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(TaskResponse::from(task)))
}

/// Update task handler
///
/// Partial update; reference fields follow the same resolution rules as
/// create, so a task can never be moved to a nonexistent project or
/// assigned to an unknown user.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::ValidationError(validation_details(e)))?;

    if let Some(project_id) = request.project {
        require_project(&state, project_id).await?;
    }

    let assigned_to = match &request.assigned_to {
        Some(username) => Some(Some(resolve_assignee(&state, username).await?)),
        None => None,
    };

    let update = UpdateTask {
        title: request.title,
        description: request.description.map(Some),
        status: request.status,
        priority: request.priority,
        assigned_to,
        project_id: request.project,
        due_date: request.due_date.map(Some),
    };

    let task = Task::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    tracing::info!(task_id = %id, "Task updated");

    Ok(Json(TaskResponse::from(task)))
}

/// Delete task handler
///
/// Returns 204 with no body on success, 404 for an unknown id.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound(format!("Task {} not found", id)));
    }

    tracing::info!(task_id = %id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_validation() {
        let valid = CreateTaskRequest {
            title: "Write spec".to_string(),
            description: None,
            status: None,
            priority: None,
            project: Uuid::new_v4(),
            assigned_to: None,
            due_date: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            title: "".to_string(),
            description: None,
            status: None,
            priority: None,
            project: Uuid::new_v4(),
            assigned_to: None,
            due_date: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_create_task_request_deserialization() {
        let project = Uuid::new_v4();
        let json = format!(
            r#"{{"title": "Write spec", "project": "{}", "status": "in_progress", "priority": "high", "due_date": "2025-08-01"}}"#,
            project
        );

        let request: CreateTaskRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.status, Some(TaskStatus::InProgress));
        assert_eq!(request.priority, Some(TaskPriority::High));
        assert_eq!(
            request.due_date,
            Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
        );

        // project is required
        assert!(serde_json::from_str::<CreateTaskRequest>(r#"{"title": "x"}"#).is_err());

        // enum values outside the wire set are rejected
        let bad = format!(r#"{{"title": "x", "project": "{}", "status": "archived"}}"#, project);
        assert!(serde_json::from_str::<CreateTaskRequest>(&bad).is_err());
    }

    #[test]
    fn test_task_response_wire_fields() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Write spec".to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            assigned_to: None,
            assigned_to_username: Some("alice".to_string()),
            project_id: Uuid::new_v4(),
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let project_id = task.project_id;

        let json = serde_json::to_value(TaskResponse::from(task)).unwrap();

        assert_eq!(json["status"], "todo");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["assigned_to"], "alice");
        assert_eq!(json["project"], serde_json::json!(project_id));
        assert!(json["due_date"].is_null());
        // Internal column names never leak to the wire
        assert!(json.get("project_id").is_none());
        assert!(json.get("assigned_to_username").is_none());
    }
}
