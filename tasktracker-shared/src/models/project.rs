/// Project model and database operations
///
/// A project has exactly one owner and a (possibly empty) set of members.
/// Members are stored in a join table and travel as usernames on the wire;
/// the owner travels as a user id.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// Deleting a project cascades to its membership rows and its tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Owning user, resolved at creation time and never null
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
///
/// The owner and members are already resolved to user ids by the caller;
/// the API layer performs username resolution and reports unresolvable
/// values as validation errors before this struct is built.
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Resolved owner id
    pub owner_id: Uuid,

    /// Resolved member ids (may be empty)
    pub member_ids: Vec<Uuid>,
}

/// Input for updating an existing project
///
/// Only non-None fields are updated. `description` uses a nested Option so
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// New project name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,
}

impl Project {
    /// Creates a project together with its membership rows
    ///
    /// Runs in a single transaction: either the project and all its
    /// memberships are persisted, or nothing is.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner or a member id violates a foreign
    /// key, or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        if !data.member_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id)
                SELECT $1, member FROM UNNEST($2::uuid[]) AS member
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(project.id)
            .bind(&data.member_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Checks whether a project id references an existing row
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Lists all projects in creation order
    ///
    /// No filtering or pagination; list-all is acceptable at this scale.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM projects
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Loads member usernames for a single project, sorted by username
    pub async fn member_usernames(pool: &PgPool, project_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT u.username
            FROM project_members pm
            JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = $1
            ORDER BY u.username ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(username,)| username).collect())
    }

    /// Loads member usernames for many projects in one query
    ///
    /// Returns a map keyed by project id; projects without members are
    /// absent from the map.
    pub async fn member_usernames_for(
        pool: &PgPool,
        project_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<String>>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT pm.project_id, u.username
            FROM project_members pm
            JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = ANY($1)
            ORDER BY u.username ASC
            "#,
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await?;

        let mut members: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (project_id, username) in rows {
            members.entry(project_id).or_default().push(username);
        }

        Ok(members)
    }

    /// Updates an existing project
    ///
    /// Only non-None fields are updated. The `updated_at` timestamp is
    /// bumped on every call.
    ///
    /// Returns the updated project if found, None if it doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, description, owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project by ID
    ///
    /// Returns true if a row was deleted. Membership rows and tasks
    /// belonging to the project are removed by CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of projects
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_default() {
        let update = UpdateProject::default();
        assert!(update.name.is_none());
        assert!(update.description.is_none());
    }

    #[test]
    fn test_create_project_struct() {
        let create = CreateProject {
            name: "Launch".to_string(),
            description: Some("Q1 launch".to_string()),
            owner_id: Uuid::new_v4(),
            member_ids: vec![],
        };

        assert_eq!(create.name, "Launch");
        assert!(create.member_ids.is_empty());
    }
}
