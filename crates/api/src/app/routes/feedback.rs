//! Feedback endpoints.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use accessmate_feedback::{Feedback, NewFeedback};
use accessmate_infra::{FeedbackRepository, SessionRepository};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{RequireAdmin, RequireUser};

pub fn router() -> Router {
    Router::new()
        .route("/", post(submit_feedback).get(list_my_feedback))
        .route("/all", get(list_all_feedback))
}

pub async fn submit_feedback(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SubmitFeedbackRequest>,
) -> axum::response::Response {
    // A referenced session must exist and belong to the caller.
    if let Some(session_id) = body.session_id {
        match services.sessions.get(session_id).await {
            Ok(Some(session)) if session.user_id == principal.user_id => {}
            Ok(_) => {
                return errors::json_error(
                    StatusCode::NOT_FOUND,
                    "not_found",
                    "session not found",
                )
            }
            Err(e) => return errors::repo_error_to_response(e),
        }
    }

    let feedback = match Feedback::submit(
        NewFeedback {
            user_id: principal.user_id,
            session_id: body.session_id,
            rating: body.rating,
            category: body.category,
            comment: body.comment,
        },
        Utc::now(),
    ) {
        Ok(feedback) => feedback,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let json = dto::feedback_to_json(&feedback);
    match services.feedback.insert(feedback).await {
        Ok(()) => (StatusCode::CREATED, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn list_my_feedback(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.feedback.list_by_user(principal.user_id).await {
        Ok(entries) => {
            let items = entries.iter().map(dto::feedback_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn list_all_feedback(
    RequireAdmin(_admin): RequireAdmin,
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.feedback.list().await {
        Ok(entries) => {
            let items = entries.iter().map(dto::feedback_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}
