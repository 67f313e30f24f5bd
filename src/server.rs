//! # Server Configuration
//!
//! This module contains the server setup and configuration for the NTP Core API.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use mongodb::Client;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::repositories::{
    MongoSocialImpactRepository, MongoUserRepository, SocialImpactStore, UserStore,
};

/// Application state containing shared resources.
///
/// Stores are trait objects injected at startup so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub social: Arc<dyn SocialImpactStore>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_seconds);

    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/api/v1/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/api/v1/users/{id}", get(handlers::users::get_user))
        .route(
            "/api/social_impact_data",
            get(handlers::social_impact::social_impact_data),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration and database client
pub async fn run_server(
    config: AppConfig,
    client: Client,
) -> Result<(), Box<dyn std::error::Error>> {
    let logistics = client.database(&config.db_name);
    let maintenance = client.database(&config.maintenance_db_name);

    let state = AppState {
        users: Arc::new(MongoUserRepository::new(logistics.clone())),
        social: Arc::new(MongoSocialImpactRepository::new(logistics, maintenance)),
        config: Arc::new(config),
    };

    let addr = state.config.bind_addr();
    let profile = state.config.profile.clone();

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::social_impact::social_impact_data,
    ),
    components(
        schemas(
            crate::models::User,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UsersResponse,
            crate::handlers::social_impact::SocialImpactResponse,
        )
    ),
    info(
        title = "NTP Core API",
        description = "HTTP gateway over the logistics and ntp_logistics stores",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
