//! Assist session endpoints, with voice commands, subtitles, and layout
//! analyses nested under their session.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use accessmate_ai::{AgentClient, AgentRequest};
use accessmate_auth::AuthPrincipal;
use accessmate_core::SessionId;
use accessmate_infra::{
    AgentConfigRepository, LayoutAnalysisRepository, SessionRepository, SubtitleRepository,
    VoiceCommandRepository,
};
use accessmate_sessions::{
    AssistSession, IssueSeverity, LayoutAnalysis, LayoutIssue, NewSession, Subtitle, NewSubtitle,
    VoiceCommand,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::RequireUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(start_session).get(list_sessions))
        .route("/:id", get(get_session))
        .route("/:id/end", post(end_session))
        .route("/:id/voice-commands", post(capture_command).get(list_commands))
        .route("/:id/subtitles", post(add_subtitle).get(list_subtitles))
        .route("/:id/layout-analyses", post(analyze_layout).get(list_analyses))
}

async fn owned_session(
    services: &AppServices,
    principal: &AuthPrincipal,
    id: &str,
) -> Result<AssistSession, axum::response::Response> {
    let id: SessionId = id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid session id")
    })?;

    let session = match services.sessions.get(id).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return Err(errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "session not found",
            ))
        }
        Err(e) => return Err(errors::repo_error_to_response(e)),
    };

    if session.user_id != principal.user_id && !principal.role.is_admin() {
        return Err(errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "session not found",
        ));
    }

    Ok(session)
}

/// The agent answers in the language of the session's agent config, when one
/// is attached.
async fn session_language(services: &AppServices, session: &AssistSession) -> Option<String> {
    let config_id = session.agent_config_id?;
    match services.agent_configs.get(config_id).await {
        Ok(config) => config.map(|c| c.language),
        Err(_) => None,
    }
}

pub async fn start_session(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::StartSessionRequest>,
) -> axum::response::Response {
    // An attached agent config must exist and belong to the caller.
    if let Some(config_id) = body.agent_config_id {
        match services.agent_configs.get(config_id).await {
            Ok(Some(config)) if config.user_id == principal.user_id => {}
            Ok(_) => {
                return errors::json_error(
                    StatusCode::NOT_FOUND,
                    "not_found",
                    "agent config not found",
                )
            }
            Err(e) => return errors::repo_error_to_response(e),
        }
    }

    let session = match AssistSession::start(
        NewSession {
            user_id: principal.user_id,
            agent_config_id: body.agent_config_id,
            device: body.device,
        },
        Utc::now(),
    ) {
        Ok(session) => session,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let json = dto::session_to_json(&session);
    match services.sessions.insert(session).await {
        Ok(()) => (StatusCode::CREATED, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn list_sessions(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.sessions.list_by_user(principal.user_id).await {
        Ok(sessions) => {
            let items = sessions.iter().map(dto::session_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn get_session(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match owned_session(&services, &principal, &id).await {
        Ok(session) => (StatusCode::OK, Json(dto::session_to_json(&session))).into_response(),
        Err(resp) => resp,
    }
}

pub async fn end_session(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mut session = match owned_session(&services, &principal, &id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    if let Err(e) = session.end(Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    let json = dto::session_to_json(&session);
    match services.sessions.update(session).await {
        Ok(()) => (StatusCode::OK, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Voice commands
// ─────────────────────────────────────────────────────────────────────────────

pub async fn capture_command(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::CaptureCommandRequest>,
) -> axum::response::Response {
    let session = match owned_session(&services, &principal, &id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    if let Err(e) = session.ensure_active() {
        return errors::domain_error_to_response(e);
    }

    let mut command = match VoiceCommand::capture(session.id, &body.phrase, Utc::now()) {
        Ok(command) => command,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let language = session_language(&services, &session).await;
    match services
        .agent
        .analyze(AgentRequest::interpret_command(&command.phrase, language))
        .await
    {
        Ok(reply) => match reply.intent {
            Some(intent) => command.mark_interpreted(intent),
            None => command.mark_failed(),
        },
        Err(err) => {
            tracing::warn!(%err, "command interpretation failed");
            command.mark_failed();
        }
    }

    let json = dto::voice_command_to_json(&command);
    match services.voice_commands.insert(command).await {
        Ok(()) => (StatusCode::CREATED, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn list_commands(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let session = match owned_session(&services, &principal, &id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    match services.voice_commands.list_by_session(session.id).await {
        Ok(commands) => {
            let items = commands.iter().map(dto::voice_command_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subtitles
// ─────────────────────────────────────────────────────────────────────────────

pub async fn add_subtitle(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<NewSubtitle>,
) -> axum::response::Response {
    let session = match owned_session(&services, &principal, &id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    if let Err(e) = session.ensure_active() {
        return errors::domain_error_to_response(e);
    }

    let subtitle = match Subtitle::create(session.id, body, Utc::now()) {
        Ok(subtitle) => subtitle,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let json = dto::subtitle_to_json(&subtitle);
    match services.subtitles.insert(subtitle).await {
        Ok(()) => (StatusCode::CREATED, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn list_subtitles(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let session = match owned_session(&services, &principal, &id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    match services.subtitles.list_by_session(session.id).await {
        Ok(subtitles) => {
            let items = subtitles.iter().map(dto::subtitle_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout analyses
// ─────────────────────────────────────────────────────────────────────────────

fn parse_severity(severity: &str) -> IssueSeverity {
    match severity {
        "critical" => IssueSeverity::Critical,
        "warning" => IssueSeverity::Warning,
        _ => IssueSeverity::Info,
    }
}

pub async fn analyze_layout(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AnalyzeLayoutRequest>,
) -> axum::response::Response {
    let session = match owned_session(&services, &principal, &id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    if let Err(e) = session.ensure_active() {
        return errors::domain_error_to_response(e);
    }

    let elements_total = body
        .content
        .get("elements")
        .and_then(|e| e.as_array())
        .map(|a| a.len() as u32)
        .unwrap_or(0);

    let language = session_language(&services, &session).await;
    let reply = match services
        .agent
        .analyze(AgentRequest::analyze_layout(&body.source, body.content, language))
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            // The fallback client recovers transport failures itself; an error
            // here means even the mock path was unusable.
            tracing::error!(%err, "layout analysis failed");
            return errors::json_error(
                StatusCode::BAD_GATEWAY,
                "agent_error",
                "layout analysis unavailable",
            );
        }
    };

    let issues = reply
        .issues
        .into_iter()
        .map(|i| LayoutIssue {
            kind: i.kind,
            detail: i.detail,
            severity: parse_severity(&i.severity),
        })
        .collect();

    let analysis = match LayoutAnalysis::record(
        session.id,
        &body.source,
        elements_total,
        issues,
        reply.summary.unwrap_or_default(),
        Utc::now(),
    ) {
        Ok(analysis) => analysis,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let json = dto::layout_analysis_to_json(&analysis);
    match services.layout_analyses.insert(analysis).await {
        Ok(()) => (StatusCode::CREATED, Json(json)).into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn list_analyses(
    RequireUser(principal): RequireUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let session = match owned_session(&services, &principal, &id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    match services.layout_analyses.list_by_session(session.id).await {
        Ok(analyses) => {
            let items = analyses.iter().map(dto::layout_analysis_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repo_error_to_response(e),
    }
}
