//! Agent configuration endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use accessmate_agents::{AgentConfig, AgentConfigUpdate, NewAgentConfig};
use accessmate_auth::AuthPrincipal;
use accessmate_core::AgentConfigId;
use accessmate_infra::AgentConfigRepository;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::RequireUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_config).get(list_configs))
        .route("/:id", get(get_config).patch(update_config).delete(delete_config))
}

async fn owned_config(
    services: &AppServices,
    principal: &AuthPrincipal,
    id: &str,
) -> Result<AgentConfig, axum::response::Response> {
    let id: AgentConfigId = id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid agent config id")
    })?;

    let config = match services.agent_configs.get(id).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            return Err(errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "agent config not found",
            ))
        }
        Err(e) => return Err(errors::repo_error_to_response(e)),
    };

    if config.user_id != principal.user_id && !principal.role.is_admin() {
        return Err(errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "agent config not found",
        ));
    }

    Ok(config)
}

pub async fn create_config(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateAgentConfigRequest>,
) -> axum::response::Response {
    let config = match AgentConfig::create(
        NewAgentConfig {
            user_id: principal.user_id,
            name: body.name,
            language: body.language,
            verbosity: body.verbosity,
            speech_rate: body.speech_rate,
            voice_feedback: body.voice_feedback,
            subtitles_enabled: body.subtitles_enabled,
            layout_hints_enabled: body.layout_hints_enabled,
        },
        Utc::now(),
    ) {
        Ok(config) => config,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let json = dto::agent_config_to_json(&config);
    match services.agent_configs.insert(config).await {
        Ok(()) => (StatusCode::CREATED, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn list_configs(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.agent_configs.list_by_user(principal.user_id).await {
        Ok(configs) => {
            let items = configs.iter().map(dto::agent_config_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn get_config(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match owned_config(&services, &principal, &id).await {
        Ok(config) => (StatusCode::OK, Json(dto::agent_config_to_json(&config))).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_config(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<AgentConfigUpdate>,
) -> axum::response::Response {
    let mut config = match owned_config(&services, &principal, &id).await {
        Ok(config) => config,
        Err(resp) => return resp,
    };

    if let Err(e) = config.apply_update(body, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    let json = dto::agent_config_to_json(&config);
    match services.agent_configs.update(config).await {
        Ok(()) => (StatusCode::OK, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn delete_config(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let config = match owned_config(&services, &principal, &id).await {
        Ok(config) => config,
        Err(resp) => return resp,
    };

    match services.agent_configs.remove(config.id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}
