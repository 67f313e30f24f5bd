//! User document model
//!
//! This module contains the MongoDB document model for the users collection.
//! Identifiers and timestamps are stored as native BSON types and rendered
//! to JSON as a hex string and an RFC 3339 timestamp so API callers see the
//! same shapes the original service emitted.

use mongodb::bson::serde_helpers::{
    serialize_bson_datetime_as_rfc3339_string, serialize_object_id_as_hex_string,
};
use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name of the users collection in the primary logical store.
pub const USERS_COLLECTION: &str = "users";

/// User record persisted in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier (hex string in JSON responses)
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String, example = "65f1c0d2a4b8e93f10aa0001")]
    pub id: ObjectId,
    /// Display name
    #[schema(example = "Somchai P.")]
    pub name: String,
    /// Optional email address, unique across users when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "somchai@example.com")]
    pub email: Option<String>,
    /// Server-assigned creation timestamp (RFC 3339 in JSON responses)
    #[serde(
        rename = "createdAt",
        serialize_with = "serialize_bson_datetime_as_rfc3339_string"
    )]
    #[schema(value_type = String, example = "2024-01-15T10:30:00Z")]
    pub created_at: DateTime,
}
