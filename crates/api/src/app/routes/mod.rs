use axum::{routing::get, Router};

pub mod agents;
pub mod auth;
pub mod feedback;
pub mod profiles;
pub mod sessions;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/me", get(system::me))
        .nest("/users", users::router())
        .nest("/profiles", profiles::router())
        .nest("/agents", agents::router())
        .nest("/sessions", sessions::router())
        .nest("/feedback", feedback::router())
}
