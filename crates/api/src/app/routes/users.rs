//! Account endpoints: self-service under `/users/me`, administration on the
//! rest.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;

use accessmate_accounts::{ProfileUpdate, User};
use accessmate_auth::Role;
use accessmate_core::UserId;
use accessmate_infra::UserRepository;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{RequireAdmin, RequireUser};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/me", patch(update_me))
        .route("/me/password", post(change_password))
        .route("/:id", get(get_user).delete(delete_user))
        .route("/:id/suspend", post(suspend_user))
        .route("/:id/activate", post(activate_user))
        .route("/:id/role", post(set_role))
}

fn parse_user_id(id: &str) -> Result<UserId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id")
    })
}

async fn load_user(
    services: &AppServices,
    id: UserId,
) -> Result<User, axum::response::Response> {
    match services.users.get(id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "user not found",
        )),
        Err(e) => Err(errors::repo_error_to_response(e)),
    }
}

pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.users.list().await {
        Ok(users) => {
            let items = users.iter().map(dto::user_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match load_user(&services, id).await {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_me(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let mut user = match load_user(&services, principal.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if let Err(e) = user.apply_update(
        ProfileUpdate {
            display_name: body.display_name,
        },
        Utc::now(),
    ) {
        return errors::domain_error_to_response(e);
    }

    let json = dto::user_to_json(&user);
    match services.users.update(user).await {
        Ok(()) => (StatusCode::OK, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn change_password(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ChangePasswordRequest>,
) -> axum::response::Response {
    let mut user = match load_user(&services, principal.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if let Err(e) = user.change_password(&body.current_password, &body.new_password, Utc::now()) {
        return errors::user_error_to_response(e);
    }

    match services.users.update(user).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn suspend_user(
    RequireAdmin(_admin): RequireAdmin,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let mut user = match load_user(&services, id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if let Err(e) = user.suspend(Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    let json = dto::user_to_json(&user);
    match services.users.update(user).await {
        Ok(()) => (StatusCode::OK, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn activate_user(
    RequireAdmin(_admin): RequireAdmin,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let mut user = match load_user(&services, id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if let Err(e) = user.activate(Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    let json = dto::user_to_json(&user);
    match services.users.update(user).await {
        Ok(()) => (StatusCode::OK, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn set_role(
    RequireAdmin(_admin): RequireAdmin,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetRoleRequest>,
) -> axum::response::Response {
    let role = match body.role.as_str() {
        "admin" => Role::admin(),
        "user" => Role::user(),
        other => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_role",
                format!("unknown role '{other}'; expected 'admin' or 'user'"),
            )
        }
    };

    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let mut user = match load_user(&services, id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if let Err(e) = user.set_role(role, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    let json = dto::user_to_json(&user);
    match services.users.update(user).await {
        Ok(()) => (StatusCode::OK, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn delete_user(
    RequireAdmin(_admin): RequireAdmin,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // Outstanding tokens for the removed account stop authenticating at the
    // next request: the identity lookup no longer resolves the subject.
    match services.users.remove(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::repo_error_to_response(e),
    }
}
