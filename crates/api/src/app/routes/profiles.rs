//! Disability profile endpoints. Users manage their own profiles; admins can
//! reach any of them.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use accessmate_auth::AuthPrincipal;
use accessmate_core::ProfileId;
use accessmate_infra::ProfileRepository;
use accessmate_profiles::{DisabilityProfile, NewProfile, ProfileUpdate};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::RequireUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_profile).get(list_profiles))
        .route("/:id", get(get_profile).patch(update_profile).delete(delete_profile))
}

/// Load a profile the principal is allowed to touch. Foreign profiles answer
/// 404, not 403, so ids cannot be probed.
async fn owned_profile(
    services: &AppServices,
    principal: &AuthPrincipal,
    id: &str,
) -> Result<DisabilityProfile, axum::response::Response> {
    let id: ProfileId = id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid profile id")
    })?;

    let profile = match services.profiles.get(id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return Err(errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "profile not found",
            ))
        }
        Err(e) => return Err(errors::repo_error_to_response(e)),
    };

    if profile.user_id != principal.user_id && !principal.role.is_admin() {
        return Err(errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "profile not found",
        ));
    }

    Ok(profile)
}

pub async fn create_profile(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProfileRequest>,
) -> axum::response::Response {
    let profile = match DisabilityProfile::create(
        NewProfile {
            user_id: principal.user_id,
            kind: body.kind,
            severity: body.severity,
            assistive_technologies: body.assistive_technologies,
            notes: body.notes,
            preferences: body.preferences,
        },
        Utc::now(),
    ) {
        Ok(profile) => profile,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let json = dto::profile_to_json(&profile);
    match services.profiles.insert(profile).await {
        Ok(()) => (StatusCode::CREATED, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn list_profiles(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.profiles.list_by_user(principal.user_id).await {
        Ok(profiles) => {
            let items = profiles.iter().map(dto::profile_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn get_profile(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match owned_profile(&services, &principal, &id).await {
        Ok(profile) => (StatusCode::OK, Json(dto::profile_to_json(&profile))).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_profile(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProfileUpdate>,
) -> axum::response::Response {
    let mut profile = match owned_profile(&services, &principal, &id).await {
        Ok(profile) => profile,
        Err(resp) => return resp,
    };

    if let Err(e) = profile.apply_update(body, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    let json = dto::profile_to_json(&profile);
    match services.profiles.update(profile).await {
        Ok(()) => (StatusCode::OK, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn delete_profile(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let profile = match owned_profile(&services, &principal, &id).await {
        Ok(profile) => profile,
        Err(resp) => return resp,
    };

    match services.profiles.remove(profile.id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}
