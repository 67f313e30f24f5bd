//! # Social Impact Repository
//!
//! Read-only access to the two logical stores backing the social impact
//! aggregation: recent jobs from the primary store and pending maintenance
//! alerts from the maintenance store. Both record types are opaque to this
//! service and passed through as raw documents.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Database,
    bson::{Document, doc},
};

use crate::error::RepositoryError;

/// Name of the jobs collection in the primary logical store.
pub const JOBS_COLLECTION: &str = "jobs";

/// Name of the maintenance collection in the maintenance logical store.
pub const MAINTENANCE_COLLECTION: &str = "maintenance";

/// Cap applied to both reads.
pub const SOCIAL_IMPACT_LIMIT: i64 = 5;

/// Store abstraction over the social impact read sources.
#[async_trait]
pub trait SocialImpactStore: Send + Sync {
    /// The most recent jobs, ordered by `date` descending, capped at
    /// [`SOCIAL_IMPACT_LIMIT`].
    async fn latest_jobs(&self) -> Result<Vec<Document>, RepositoryError>;

    /// Maintenance alerts with `status == "pending"`, capped at
    /// [`SOCIAL_IMPACT_LIMIT`], in insertion order.
    async fn pending_alerts(&self) -> Result<Vec<Document>, RepositoryError>;
}

/// MongoDB-backed implementation of [`SocialImpactStore`].
pub struct MongoSocialImpactRepository {
    logistics: Database,
    maintenance: Database,
}

impl MongoSocialImpactRepository {
    /// Create a new repository over the two logical stores.
    pub fn new(logistics: Database, maintenance: Database) -> Self {
        Self {
            logistics,
            maintenance,
        }
    }
}

#[async_trait]
impl SocialImpactStore for MongoSocialImpactRepository {
    async fn latest_jobs(&self) -> Result<Vec<Document>, RepositoryError> {
        let cursor = self
            .logistics
            .collection::<Document>(JOBS_COLLECTION)
            .find(doc! {})
            .sort(doc! { "date": -1 })
            .limit(SOCIAL_IMPACT_LIMIT)
            .await
            .map_err(RepositoryError::database_error)?;

        cursor
            .try_collect()
            .await
            .map_err(RepositoryError::database_error)
    }

    async fn pending_alerts(&self) -> Result<Vec<Document>, RepositoryError> {
        let cursor = self
            .maintenance
            .collection::<Document>(MAINTENANCE_COLLECTION)
            .find(doc! { "status": "pending" })
            .limit(SOCIAL_IMPACT_LIMIT)
            .await
            .map_err(RepositoryError::database_error)?;

        cursor
            .try_collect()
            .await
            .map_err(RepositoryError::database_error)
    }
}
