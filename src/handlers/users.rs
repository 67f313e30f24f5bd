//! # Users API Handlers
//!
//! This module contains handlers for listing, fetching, and creating users.

use crate::error::ApiError;
use crate::models::User;
use crate::repositories::NewUser;
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request payload for creating a new user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name for the user (required)
    #[serde(default)]
    #[schema(example = "Somchai P.")]
    pub name: Option<String>,
    /// Optional email address, unique across users
    #[serde(default)]
    #[schema(example = "somchai@example.com")]
    pub email: Option<String>,
}

/// Response payload for the users listing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    /// Always `"success"` on the 200 path
    #[schema(example = "success")]
    pub status: String,
    /// Number of users returned
    #[schema(example = 2)]
    pub count: usize,
    /// All users in the collection
    pub users: Vec<User>,
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users in the collection", body = UsersResponse),
        (status = 500, description = "Database failure, `{status, message}` body")
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.users.list().await.map_err(|err| {
        ApiError::dependency(err, "Internal Server Error during data retrieval.")
    })?;

    Ok(Json(UsersResponse {
        status: "success".to_string(),
        count: users.len(),
        users,
    }))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(
        ("id" = String, Path, description = "User identifier (24-character hex ObjectId)")
    ),
    responses(
        (status = 200, description = "The matching user record", body = User),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "No user with this identifier"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let object_id = ObjectId::parse_str(&id).map_err(|_| ApiError::Validation("Invalid id"))?;

    let user = state
        .users
        .find_by_id(object_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing required name"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::Validation("name is required"))?
        .to_string();

    // Blank emails are treated as absent so they never trip the unique index.
    let email = request
        .email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());

    let user = state.users.insert(NewUser { name, email }).await?;

    Ok((StatusCode::CREATED, Json(user)))
}
