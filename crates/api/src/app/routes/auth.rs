//! Login boundary: registration and token issuance.
//!
//! Mounted under `/api/auth`, which the authentication filter treats as
//! public; these are the only endpoints that accept credentials instead of a
//! bearer token.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use accessmate_accounts::{NewUser, User};
use accessmate_auth::{ExtraClaims, TokenService};
use accessmate_infra::UserRepository;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let user = match User::register(
        NewUser {
            email: body.email,
            display_name: body.display_name,
            password: body.password,
        },
        Utc::now(),
    ) {
        Ok(user) => user,
        Err(e) => return errors::user_error_to_response(e),
    };

    let json = dto::user_to_json(&user);
    if let Err(e) = services.users.insert(user).await {
        return errors::repo_error_to_response(e);
    }

    (StatusCode::CREATED, Json(json)).into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let email = body.email.trim().to_lowercase();

    let user = match services.users.find_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(&email),
        Err(e) => return errors::repo_error_to_response(e),
    };

    if !user.verify_password(&body.password) {
        return invalid_credentials(&email);
    }

    let token = match services.tokens.issue(&user.email, ExtraClaims::new()) {
        Ok(token) => token,
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                e.to_string(),
            )
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "expires_in_ms": services.tokens.ttl().num_milliseconds(),
            "user": dto::user_to_json(&user),
        })),
    )
        .into_response()
}

fn invalid_credentials(email: &str) -> axum::response::Response {
    // One generic answer for unknown email, wrong password, and suspended
    // accounts; the audit log carries the detail.
    tracing::info!(%email, "failed login attempt");
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "invalid email or password",
    )
}
