//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the NTP Core API.

pub mod social_impact;
pub mod users;

/// Root handler confirming the service is online.
///
/// Static plain-text response with no side effects; succeeds regardless of
/// database state.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is online", body = String, content_type = "text/plain")
    ),
    tag = "root"
)]
pub async fn root() -> &'static str {
    "NTP AI Core API V2 is Online and ready to serve"
}
