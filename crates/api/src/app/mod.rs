//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `config.rs`: process configuration read once at startup
//! - `services.rs`: repositories, token service, agent client
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use accessmate_auth::{PrincipalLookup, TokenService};
use accessmate_infra::RepositoryPrincipalLookup;

use crate::middleware;

pub mod config;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use config::AppConfig;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> Router {
    let services = Arc::new(services::build_services(&config).await);
    build_app_with_services(services)
}

/// Router over pre-built services (used by tests to seed state first).
pub fn build_app_with_services(services: Arc<services::AppServices>) -> Router {
    let tokens: Arc<dyn TokenService> = services.tokens.clone();
    let lookup: Arc<dyn PrincipalLookup> =
        Arc::new(RepositoryPrincipalLookup::new(services.users.clone()));
    let auth_state = middleware::AuthState { tokens, lookup };

    // The filter wraps every route and decides for itself which paths are
    // public; routes never re-check tokens.
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/error", get(routes::system::error_page))
        .nest("/api/auth", routes::auth::router())
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::auth_middleware,
                ))
                .layer(Extension(services)),
        )
}
