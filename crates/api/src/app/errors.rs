use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use accessmate_accounts::UserError;
use accessmate_auth::AuthzError;
use accessmate_core::DomainError;
use accessmate_infra::RepoError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => {
            json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized")
        }
    }
}

pub fn user_error_to_response(err: UserError) -> axum::response::Response {
    match err {
        UserError::Domain(e) => domain_error_to_response(e),
        UserError::Credential(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "credential_error", e.to_string())
        }
    }
}

pub fn repo_error_to_response(err: RepoError) -> axum::response::Response {
    match err {
        RepoError::Duplicate(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        RepoError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    match err {
        AuthzError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", err.to_string())
        }
        AuthzError::Forbidden(_) => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
    }
}
