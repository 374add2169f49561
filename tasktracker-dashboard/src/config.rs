/// Configuration for the dashboard client
///
/// The dashboard receives an explicit configuration object at startup
/// instead of reading a process-wide base-URL constant.
///
/// # Environment Variables
///
/// - `DASHBOARD_API_URL`: API server root (default: http://127.0.0.1:8080)
/// - `DASHBOARD_API_BASE_PATH`: Path the REST surface is rooted at
///   (default: /api, matching the server's `API_BASE_PATH`)
/// - `DASHBOARD_TIMEOUT_SECS`: Bounded wait for every outbound call
///   (default: 10); a request exceeding it is treated as a failure

use std::env;

/// Dashboard client configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API server root, without the base path (e.g., "http://127.0.0.1:8080")
    pub server_url: String,

    /// Base path the REST endpoints are nested under
    pub base_path: String,

    /// Per-request timeout in seconds
    ///
    /// Every outbound call has this finite wait bound; there are no
    /// retries and no background work.
    pub timeout_secs: u64,
}

impl DashboardConfig {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let server_url = env::var("DASHBOARD_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let base_path = env::var("DASHBOARD_API_BASE_PATH").unwrap_or_else(|_| "/api".to_string());
        let base_path = format!("/{}", base_path.trim_matches('/'));

        let timeout_secs = env::var("DASHBOARD_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()?;

        Ok(Self {
            server_url,
            base_path,
            timeout_secs,
        })
    }

    /// Returns the URL of an endpoint under the base path
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.server_url,
            self.base_path,
            path.trim_start_matches('/')
        )
    }

    /// Returns the health probe URL (outside the base path)
    pub fn health_url(&self) -> String {
        format!("{}/health", self.server_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DashboardConfig {
        DashboardConfig {
            server_url: "http://localhost:8080".to_string(),
            base_path: "/api".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_endpoint_url() {
        let config = test_config();
        assert_eq!(
            config.endpoint_url("/projects"),
            "http://localhost:8080/api/projects"
        );
        assert_eq!(
            config.endpoint_url("tasks"),
            "http://localhost:8080/api/tasks"
        );
    }

    #[test]
    fn test_health_url_is_outside_base_path() {
        assert_eq!(test_config().health_url(), "http://localhost:8080/health");
    }
}
