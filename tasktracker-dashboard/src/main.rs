//! # TaskTracker Dashboard
//!
//! A terminal dashboard over the TaskTracker API. Renders aggregate
//! metrics and per-entity lists, and submits create/delete forms that
//! translate to API calls.
//!
//! Every screen is an independent, synchronous round trip: fetch, render,
//! act. There is no background work and no automatic retry; a failed call
//! surfaces inline and is retried only on the next user-triggered action.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasktracker-dashboard
//! ```

use tasktracker_dashboard::client::ApiClient;
use tasktracker_dashboard::config::DashboardConfig;
use tasktracker_dashboard::views;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktracker_dashboard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DashboardConfig::from_env()?;
    let client = ApiClient::new(&config)?;

    println!("TaskTracker Dashboard  ({})", config.server_url);

    loop {
        // Probe connectivity before rendering menu content. A failed
        // probe is shown but never blocks navigation.
        print_connectivity(&client).await;

        println!();
        println!("  1. Overview");
        println!("  2. Projects");
        println!("  3. Tasks");
        println!("  4. Users");
        println!("  q. Quit");

        let choice = match views::read_line("> ")? {
            Some(choice) => choice,
            None => break,
        };

        println!();
        match choice.as_str() {
            "1" => views::overview::show(&client).await,
            "2" => views::projects::show(&client).await,
            "3" => views::tasks::show(&client).await,
            "4" => println!("User management is handled out-of-band."),
            "q" | "Q" => break,
            "" => {}
            other => println!("Unknown choice: {}", other),
        }
    }

    Ok(())
}

/// Prints the persistent connected/disconnected indicator
async fn print_connectivity(client: &ApiClient) {
    match client.health().await {
        Ok(health) if health.status == "healthy" => {
            println!("● API Connected (v{})", health.version);
        }
        Ok(health) => {
            println!("◐ API Degraded (database {})", health.database);
        }
        Err(_) => {
            println!("○ API Not Connected");
        }
    }
}
