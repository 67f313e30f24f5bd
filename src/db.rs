//! Database client management for the NTP Core API.
//!
//! This module initializes the long-lived MongoDB client shared by all
//! request handlers, verifies connectivity at startup, and declares the
//! unique index backing the users collection.

use anyhow::{Context, Result};
use mongodb::{
    Client, Database, IndexModel,
    bson::doc,
    options::{ClientOptions, IndexOptions},
};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AppConfig;
use crate::models::user::USERS_COLLECTION;

/// Errors that can occur during database bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {source}")]
    ConnectionFailed {
        #[from]
        source: mongodb::error::Error,
    },
    #[error("Invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Initializes the MongoDB client with the given configuration.
///
/// The driver maintains its own connection pool, so a single [`Client`] is
/// created at startup and shared for the process lifetime. Connectivity is
/// verified with a `ping` command, retried with exponential backoff for
/// transient errors; persistent failure is fatal to startup.
pub async fn init_client(cfg: &AppConfig) -> Result<Client> {
    if cfg.mongo_uri.is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "MongoDB URI cannot be empty".to_string(),
        }
        .into());
    }

    let mut options = ClientOptions::parse(&cfg.mongo_uri)
        .await
        .context("Failed to parse MongoDB connection string")?;
    options.server_selection_timeout = Some(Duration::from_millis(cfg.db_connect_timeout_ms));
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    let client =
        Client::with_options(options).map_err(|source| DatabaseError::ConnectionFailed { source })?;

    let max_retries = 5;
    let mut retry_delay = Duration::from_millis(100);

    for attempt in 1..=max_retries {
        match ping(&client.database(&cfg.db_name)).await {
            Ok(()) => {
                tracing::info!(attempt, "successfully connected to database");
                ensure_indexes(&client.database(&cfg.db_name)).await?;
                return Ok(client);
            }
            Err(e) => {
                if attempt == max_retries {
                    tracing::error!(
                        attempts = max_retries,
                        error = %e,
                        "failed to connect to database"
                    );
                    return Err(e).context("Database unreachable at startup");
                }

                tracing::warn!(
                    attempt,
                    error = %e,
                    retry_in = ?retry_delay,
                    "database connection attempt failed, retrying"
                );

                sleep(retry_delay).await;
                retry_delay *= 2;
            }
        }
    }

    unreachable!("retry loop returns on success or final failure")
}

/// Health check for the database connection.
///
/// Issues a `ping` command to verify the deployment is reachable.
pub async fn ping(db: &Database) -> Result<()> {
    db.run_command(doc! { "ping": 1 })
        .await
        .context("Database ping failed")?;

    Ok(())
}

/// Declares the unique sparse index on `users.email`.
///
/// Sparse so documents without an email are not subject to the constraint;
/// creation is idempotent on an existing index with identical options.
async fn ensure_indexes(db: &Database) -> Result<()> {
    let index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .name("email_unique".to_string())
                .build(),
        )
        .build();

    db.collection::<mongodb::bson::Document>(USERS_COLLECTION)
        .create_index(index)
        .await
        .context("Failed to create unique email index")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_mongo_uri_is_rejected() {
        let config = AppConfig {
            mongo_uri: String::new(),
            ..AppConfig::default()
        };

        let result = init_client(&config).await;

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err().downcast::<DatabaseError>(),
            Ok(DatabaseError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_mongo_uri_is_rejected() {
        let config = AppConfig {
            mongo_uri: "mongodb://".to_string(),
            ..AppConfig::default()
        };

        let result = init_client(&config).await;

        assert!(result.is_err());
    }
}
