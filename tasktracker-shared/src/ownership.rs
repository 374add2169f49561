/// Owner resolution policy for project creation
///
/// Every project has exactly one owner, resolved at creation time even
/// when the client omits it. The policy is a trait so deployments can
/// swap the default-fallback behavior for a hard rejection without
/// touching project-creation logic.
///
/// # Policies
///
/// - [`FallbackOwnerResolver`]: first existing user in creation order;
///   when the store has no users at all, lazily creates the reserved
///   `system` user and uses it. This means creating a project can create
///   a user as a side effect. That coupling is deliberate and documented,
///   not an accident to be dropped.
/// - [`RequireOwnerResolver`]: rejects requests that omit the owner.
///
/// # Example
///
/// ```no_run
/// use tasktracker_shared::ownership::{FallbackOwnerResolver, OwnerResolver};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = FallbackOwnerResolver::default();
/// let owner = resolver.resolve(&pool).await?;
/// println!("Resolved owner: {}", owner.username);
/// # Ok(())
/// # }
/// ```

use crate::models::user::{CreateUser, User};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

/// Username of the lazily-created fallback owner
///
/// The reserved user carries no credential of any kind.
pub const RESERVED_OWNER_USERNAME: &str = "system";

/// Owner resolution error types
#[derive(Debug, thiserror::Error)]
pub enum OwnerResolutionError {
    /// The active policy requires an explicit owner
    #[error("owner is required and was not provided")]
    OwnerRequired,

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Owner resolution result type alias
pub type OwnerResult = Result<User, OwnerResolutionError>;

/// Policy for resolving a project owner when the request omits one
#[async_trait]
pub trait OwnerResolver: Send + Sync {
    /// Returns the policy name, used for logging
    fn name(&self) -> &str;

    /// Resolves the owner for a project being created without one
    ///
    /// # Errors
    ///
    /// Returns [`OwnerResolutionError::OwnerRequired`] if the policy
    /// refuses to supply a default, or a database error.
    async fn resolve(&self, pool: &PgPool) -> OwnerResult;
}

/// Default policy: first existing user, else the reserved user
///
/// "First" means oldest by creation time, a stable order. The reserved
/// user is created with a race-safe upsert, so concurrent project
/// creations against an empty store converge on a single row.
#[derive(Debug, Clone)]
pub struct FallbackOwnerResolver {
    reserved_username: String,
}

impl FallbackOwnerResolver {
    /// Creates a resolver with a custom reserved username
    pub fn new(reserved_username: impl Into<String>) -> Self {
        Self {
            reserved_username: reserved_username.into(),
        }
    }

    /// The username used when the store has no users
    pub fn reserved_username(&self) -> &str {
        &self.reserved_username
    }
}

impl Default for FallbackOwnerResolver {
    fn default() -> Self {
        Self::new(RESERVED_OWNER_USERNAME)
    }
}

#[async_trait]
impl OwnerResolver for FallbackOwnerResolver {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn resolve(&self, pool: &PgPool) -> OwnerResult {
        if let Some(user) = User::first_created(pool).await? {
            return Ok(user);
        }

        info!(
            username = %self.reserved_username,
            "No users exist, creating reserved fallback owner"
        );

        let user = User::get_or_create(
            pool,
            CreateUser {
                username: self.reserved_username.clone(),
                display_name: None,
            },
        )
        .await?;

        Ok(user)
    }
}

/// Strict policy: an omitted owner is a client error
#[derive(Debug, Clone, Default)]
pub struct RequireOwnerResolver;

#[async_trait]
impl OwnerResolver for RequireOwnerResolver {
    fn name(&self) -> &str {
        "require"
    }

    async fn resolve(&self, _pool: &PgPool) -> OwnerResult {
        Err(OwnerResolutionError::OwnerRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_names() {
        assert_eq!(FallbackOwnerResolver::default().name(), "fallback");
        assert_eq!(RequireOwnerResolver.name(), "require");
    }

    #[test]
    fn test_default_reserved_username() {
        let resolver = FallbackOwnerResolver::default();
        assert_eq!(resolver.reserved_username(), "system");

        let custom = FallbackOwnerResolver::new("nobody");
        assert_eq!(custom.reserved_username(), "nobody");
    }

    #[test]
    fn test_owner_required_display() {
        let err = OwnerResolutionError::OwnerRequired;
        assert_eq!(err.to_string(), "owner is required and was not provided");
    }

    // Resolution against a live store is covered by the API crate's
    // integration tests
}
