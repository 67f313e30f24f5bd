//! # NTP Core API Main Entry Point
//!
//! This is the main entry point for the NTP Core API gateway service.

use ntp_core_api::{config::ConfigLoader, db, logging, server::run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables.
    // A missing MONGO_URI fails here and the process exits non-zero.
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    logging::init_subscriber(&config);

    tracing::info!(profile = %config.profile, "loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "effective configuration");
    }

    // Connect before binding the listener; a dead database is fatal at startup.
    let client = db::init_client(&config).await?;

    run_server(config, client).await
}
