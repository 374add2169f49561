/// HTTP client over the TaskTracker REST surface
///
/// Wraps `reqwest::Client` with the configured base URL and a bounded
/// per-request timeout. Calls either complete, time out, or error; there
/// are no retries and no cancellation semantics. API error bodies are
/// decoded back into their structured shape so field-level messages can
/// be shown inline at the point of the failed action.
///
/// # Example
///
/// ```no_run
/// use tasktracker_dashboard::client::{ApiClient, NewProject};
/// use tasktracker_dashboard::config::DashboardConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = ApiClient::new(&DashboardConfig::from_env()?)?;
///
/// let project = client.create_project(&NewProject {
///     name: "Launch".to_string(),
///     description: Some("Q1 launch".to_string()),
///     members: vec![],
/// }).await?;
///
/// println!("Created project {}", project.id);
/// # Ok(())
/// # }
/// ```

use crate::config::DashboardConfig;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tasktracker_shared::models::task::{TaskPriority, TaskStatus};
use uuid::Uuid;

/// Client error types
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API server could not be reached or did not answer in time
    #[error("cannot reach the API server: {0}")]
    Connectivity(reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable message, including field details when present
        message: String,
    },

    /// The response body was not what the client expected
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// True when the failure is connectivity rather than an API verdict
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Connectivity(_))
    }
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Project as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner: Uuid,
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<String>,
    pub project: Uuid,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Health probe response
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Payload for creating a project
///
/// The owner is left to the server's resolution policy.
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub members: Vec<String>,
}

/// Payload for creating a task
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    pub project: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Structured API error body, mirroring the server's `ErrorResponse`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    error: String,
    message: String,
    #[serde(default)]
    details: Option<Vec<FieldError>>,
}

#[derive(Debug, Deserialize)]
struct FieldError {
    field: String,
    message: String,
}

/// HTTP client for the TaskTracker API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: DashboardConfig,
}

impl ApiClient {
    /// Creates a client with the configured bounded timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &DashboardConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Probes the health endpoint
    pub async fn health(&self) -> ClientResult<Health> {
        let response = self
            .http
            .get(self.config.health_url())
            .send()
            .await
            .map_err(ClientError::Connectivity)?;

        Self::decode(response).await
    }

    /// Fetches all projects
    pub async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        self.get_json(self.config.endpoint_url("/projects")).await
    }

    /// Creates a project
    pub async fn create_project(&self, payload: &NewProject) -> ClientResult<Project> {
        self.post_json(self.config.endpoint_url("/projects"), payload)
            .await
    }

    /// Deletes a project by id
    pub async fn delete_project(&self, id: Uuid) -> ClientResult<()> {
        self.delete(self.config.endpoint_url(&format!("/projects/{}", id)))
            .await
    }

    /// Fetches all tasks
    pub async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        self.get_json(self.config.endpoint_url("/tasks")).await
    }

    /// Creates a task
    pub async fn create_task(&self, payload: &NewTask) -> ClientResult<Task> {
        self.post_json(self.config.endpoint_url("/tasks"), payload)
            .await
    }

    /// Deletes a task by id
    pub async fn delete_task(&self, id: Uuid) -> ClientResult<()> {
        self.delete(self.config.endpoint_url(&format!("/tasks/{}", id)))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ClientResult<T> {
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::Connectivity)?;

        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Connectivity)?;

        Self::decode(response).await
    }

    async fn delete(&self, url: String) -> ClientResult<()> {
        tracing::debug!(%url, "DELETE");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(ClientError::Connectivity)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::api_error(status.as_u16(), response).await)
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), response).await);
        }

        let bytes = response.bytes().await.map_err(ClientError::Connectivity)?;

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Builds an API error from a non-success response
    ///
    /// Prefers the structured error body; falls back to raw text.
    async fn api_error(status: u16, response: reqwest::Response) -> ClientError {
        let text = response.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => format_error_message(&body),
            Err(_) if text.is_empty() => format!("request failed with status {}", status),
            Err(_) => text,
        };

        ClientError::Api { status, message }
    }
}

fn format_error_message(body: &ApiErrorBody) -> String {
    match &body.details {
        Some(details) if !details.is_empty() => {
            let fields: Vec<String> = details
                .iter()
                .map(|d| format!("{}: {}", d.field, d.message))
                .collect();
            format!("{} ({})", body.message, fields.join("; "))
        }
        _ => body.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_payload_omits_absent_fields() {
        let payload = NewTask {
            title: "Write spec".to_string(),
            description: None,
            status: None,
            priority: None,
            project: Uuid::new_v4(),
            assigned_to: None,
            due_date: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "Write spec");
        // Omitted fields are left to server-side defaults
        assert!(json.get("status").is_none());
        assert!(json.get("priority").is_none());
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn test_format_error_message_with_details() {
        let body = ApiErrorBody {
            error: "validation_error".to_string(),
            message: "Request validation failed".to_string(),
            details: Some(vec![FieldError {
                field: "members".to_string(),
                message: "Unknown username: ghost".to_string(),
            }]),
        };

        assert_eq!(
            format_error_message(&body),
            "Request validation failed (members: Unknown username: ghost)"
        );
    }

    #[test]
    fn test_format_error_message_without_details() {
        let body = ApiErrorBody {
            error: "not_found".to_string(),
            message: "Task not found".to_string(),
            details: None,
        };

        assert_eq!(format_error_message(&body), "Task not found");
    }

    #[test]
    fn test_task_deserializes_wire_shape() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "title": "Write spec",
            "description": null,
            "status": "in_progress",
            "priority": "high",
            "assigned_to": "alice",
            "project": "0e37df36-f698-4171-9f0b-a62c2b0f3f5d",
            "due_date": "2025-08-01",
            "created_at": "2025-07-12T12:00:00Z",
            "updated_at": "2025-07-12T12:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.assigned_to.as_deref(), Some("alice"));
    }
}
