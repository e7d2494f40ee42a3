//! HTTP routes

mod auth;
mod credentials;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use vault_core::VaultServices;

/// Build the application router
pub fn router(services: Arc<VaultServices>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/credentials",
            get(credentials::status)
                .put(credentials::update)
                .delete(credentials::remove),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(services)
}

/// Health check endpoint
async fn health() -> &'static str {
    "OK"
}
