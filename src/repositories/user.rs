//! # User Repository
//!
//! This module contains the repository for user documents, providing the
//! read and create operations exposed by the users endpoints.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{DateTime, doc, oid::ObjectId},
};

use crate::error::RepositoryError;
use crate::models::user::{USERS_COLLECTION, User};

/// Request data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name for the user
    pub name: String,
    /// Optional email address, subject to the unique index
    pub email: Option<String>,
}

/// Store abstraction over the users collection.
///
/// The long-lived database handle is injected at startup; tests implement
/// this trait with an in-memory fake.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// List all users.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Find a user by its identifier.
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepositoryError>;

    /// Insert a new user with a generated id and creation timestamp.
    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError>;
}

/// MongoDB-backed implementation of [`UserStore`].
pub struct MongoUserRepository {
    db: Database,
}

impl MongoUserRepository {
    /// Create a new repository over the given logical store.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<User> {
        self.db.collection(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let cursor = self
            .collection()
            .find(doc! {})
            .await
            .map_err(RepositoryError::database_error)?;

        cursor
            .try_collect()
            .await
            .map_err(RepositoryError::database_error)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepositoryError> {
        self.collection()
            .find_one(doc! { "_id": id })
            .await
            .map_err(RepositoryError::database_error)
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let user = User {
            id: ObjectId::new(),
            name: new_user.name,
            email: new_user.email,
            created_at: DateTime::now(),
        };

        // Inserted as a raw document: the JSON-facing serializers on `User`
        // would otherwise store `_id` as a hex string instead of an ObjectId.
        let mut document = doc! {
            "_id": user.id,
            "name": &user.name,
            "createdAt": user.created_at,
        };
        if let Some(ref email) = user.email {
            document.insert("email", email);
        }

        self.db
            .collection::<mongodb::bson::Document>(USERS_COLLECTION)
            .insert_one(document)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }
}
