/// Project CRUD endpoints
///
/// # Endpoints
///
/// - `POST   {base}/projects` - Create project
/// - `GET    {base}/projects` - List all projects
/// - `GET    {base}/projects/:id` - Read one project
/// - `PUT    {base}/projects/:id` - Update name/description
/// - `DELETE {base}/projects/:id` - Delete project
///
/// # Wire shape
///
/// The owner travels as a user id; members travel as usernames, both on
/// input and output. When the request omits `owner`, the configured
/// resolution policy supplies one; the default policy may create the
/// reserved `system` user as a side effect (see the `ownership` module).
///
/// Creation is not idempotent: resubmitting the same payload creates a
/// second project.
///
/// # Example Request
///
/// ```json
/// {
///   "name": "Launch",
///   "description": "Q1 launch",
///   "members": ["alice", "bob"]
/// }
/// ```
///
/// # Example Response (201)
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Launch",
///   "description": "Q1 launch",
///   "owner": "0e37df36-f698-4171-9f0b-a62c2b0f3f5d",
///   "members": ["alice", "bob"],
///   "created_at": "2025-07-12T12:00:00Z",
///   "updated_at": "2025-07-12T12:00:00Z"
/// }
/// ```

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasktracker_shared::models::{
    project::{CreateProject, Project, UpdateProject},
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owner user id; resolved by the configured policy when absent
    pub owner: Option<Uuid>,

    /// Member usernames (may be empty)
    #[serde(default)]
    pub members: Vec<String>,
}

/// Update project request
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// Project response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    /// Project id
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Description (null when unset)
    pub description: Option<String>,

    /// Owner user id
    pub owner: Uuid,

    /// Member usernames
    pub members: Vec<String>,

    /// Creation timestamp (ISO-8601)
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (ISO-8601)
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    fn from_parts(project: Project, members: Vec<String>) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            owner: project.owner_id,
            members,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Resolves member usernames to user ids
///
/// Every unresolvable username is reported, not just the first one.
async fn resolve_members(state: &AppState, usernames: &[String]) -> ApiResult<Vec<Uuid>> {
    let mut member_ids = Vec::with_capacity(usernames.len());
    let mut unresolved = Vec::new();

    for username in usernames {
        match User::find_by_username(&state.db, username).await? {
            Some(user) => member_ids.push(user.id),
            None => unresolved.push(ValidationErrorDetail {
                field: "members".to_string(),
                message: format!("Unknown username: {}", username),
            }),
        }
    }

    if !unresolved.is_empty() {
        return Err(ApiError::ValidationError(unresolved));
    }

    member_ids.dedup();
    Ok(member_ids)
}

/// Create project handler
///
/// Validates the payload, resolves the owner (via the configured policy
/// when absent) and the member usernames, and persists the project and
/// its memberships in one transaction.
///
/// # Errors
///
/// - 422: missing/empty name, unknown owner id, unresolvable member
///   username, or the active policy requires an explicit owner
/// - 500: database failure
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::ValidationError(validation_details(e)))?;

    let owner = match request.owner {
        Some(owner_id) => User::find_by_id(&state.db, owner_id).await?.ok_or_else(|| {
            ApiError::invalid_field("owner", format!("Unknown user id: {}", owner_id))
        })?,
        None => state.owner_resolver.resolve(&state.db).await?,
    };

    let member_ids = resolve_members(&state, &request.members).await?;

    tracing::info!(
        name = %request.name,
        owner = %owner.username,
        members = request.members.len(),
        "Creating project"
    );

    let project = Project::create(
        &state.db,
        CreateProject {
            name: request.name,
            description: request.description,
            owner_id: owner.id,
            member_ids,
        },
    )
    .await?;

    let members = Project::member_usernames(&state.db, project.id).await?;

    tracing::info!(project_id = %project.id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::from_parts(project, members)),
    ))
}

/// List projects handler
///
/// Returns every project in creation order; an empty store yields `[]`,
/// never an error. Member usernames are loaded with a single grouped
/// query.
pub async fn list_projects(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let projects = Project::list(&state.db).await?;

    let project_ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    let mut members_by_project = Project::member_usernames_for(&state.db, &project_ids).await?;

    let response = projects
        .into_iter()
        .map(|project| {
            let members = members_by_project.remove(&project.id).unwrap_or_default();
            ProjectResponse::from_parts(project, members)
        })
        .collect();

    Ok(Json(response))
}

/// Read one project handler
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", id)))?;

    let members = Project::member_usernames(&state.db, project.id).await?;

    Ok(Json(ProjectResponse::from_parts(project, members)))
}

/// Update project handler
///
/// Partial update of name and description; `updated_at` is bumped.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::ValidationError(validation_details(e)))?;

    let update = UpdateProject {
        name: request.name,
        description: request.description.map(Some),
    };

    let project = Project::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", id)))?;

    let members = Project::member_usernames(&state.db, project.id).await?;

    tracing::info!(project_id = %id, "Project updated");

    Ok(Json(ProjectResponse::from_parts(project, members)))
}

/// Delete project handler
///
/// Returns 204 with no body on success, 404 for an unknown id. Tasks and
/// membership rows belonging to the project are removed with it.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Project::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound(format!("Project {} not found", id)));
    }

    tracing::info!(project_id = %id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_request_validation() {
        let valid = CreateProjectRequest {
            name: "Launch".to_string(),
            description: None,
            owner: None,
            members: vec![],
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateProjectRequest {
            name: "".to_string(),
            description: None,
            owner: None,
            members: vec![],
        };
        assert!(empty_name.validate().is_err());

        let long_name = CreateProjectRequest {
            name: "a".repeat(256),
            description: None,
            owner: None,
            members: vec![],
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_create_project_request_defaults() {
        // members defaults to empty, owner to None
        let request: CreateProjectRequest =
            serde_json::from_str(r#"{"name": "Launch"}"#).unwrap();
        assert_eq!(request.name, "Launch");
        assert!(request.owner.is_none());
        assert!(request.members.is_empty());
    }

    #[test]
    fn test_project_response_wire_fields() {
        let project = Project {
            id: Uuid::new_v4(),
            name: "Launch".to_string(),
            description: Some("Q1 launch".to_string()),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let owner_id = project.owner_id;

        let response =
            ProjectResponse::from_parts(project, vec!["alice".to_string(), "bob".to_string()]);
        let json = serde_json::to_value(&response).unwrap();

        // Field names are wire-stable
        assert_eq!(json["owner"], serde_json::json!(owner_id));
        assert_eq!(json["members"], serde_json::json!(["alice", "bob"]));
        assert_eq!(json["description"], "Q1 launch");
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn test_update_project_request_partial() {
        let request: UpdateProjectRequest =
            serde_json::from_str(r#"{"description": "new"}"#).unwrap();
        assert!(request.name.is_none());
        assert_eq!(request.description.as_deref(), Some("new"));
        assert!(request.validate().is_ok());

        let bad: UpdateProjectRequest = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
