use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use accessmate_infra::UserRepository;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::RequireUser;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Echo the authenticated principal's account.
pub async fn me(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
) -> impl IntoResponse {
    match services.users.get(principal.user_id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::repo_error_to_response(e),
    }
}

/// Generic error page (public path). Requests land here only when routed
/// explicitly; there is no stored error context to report.
pub async fn error_page() -> impl IntoResponse {
    errors::json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "error",
        "unhandled error",
    )
}
