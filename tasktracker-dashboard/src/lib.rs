//! # TaskTracker Dashboard Library
//!
//! This library provides the terminal dashboard client for TaskTracker.
//! Every screen is an independent fetch-render round trip against the API
//! server; state is refetched after every successful mutation.
//!
//! ## Modules
//!
//! - `client`: HTTP client over the REST surface with bounded timeouts
//! - `config`: Dashboard configuration (API location, timeout)
//! - `views`: Menu views (overview, projects, tasks) and form helpers
//!
//! ## Example
//!
//! ```no_run
//! use tasktracker_dashboard::client::ApiClient;
//! use tasktracker_dashboard::config::DashboardConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = DashboardConfig::from_env()?;
//! let client = ApiClient::new(&config)?;
//! let projects = client.list_projects().await?;
//! println!("{} projects", projects.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod views;
