use serde::Deserialize;

use accessmate_accounts::User;
use accessmate_agents::{AgentConfig, Verbosity};
use accessmate_core::{AgentConfigId, SessionId};
use accessmate_feedback::{Feedback, FeedbackCategory};
use accessmate_profiles::{DisabilityKind, DisabilityProfile, Severity};
use accessmate_sessions::{AssistSession, LayoutAnalysis, Subtitle, VoiceCommand};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub kind: DisabilityKind,
    pub severity: Severity,
    #[serde(default)]
    pub assistive_technologies: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAgentConfigRequest {
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub verbosity: Verbosity,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default = "default_true")]
    pub voice_feedback: bool,
    #[serde(default = "default_true")]
    pub subtitles_enabled: bool,
    #[serde(default)]
    pub layout_hints_enabled: bool,
}

fn default_speech_rate() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub agent_config_id: Option<AgentConfigId>,
    pub device: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureCommandRequest {
    pub phrase: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeLayoutRequest {
    /// URL or screen label being analysed.
    pub source: String,
    /// Page/screen description forwarded to the agent service.
    #[serde(default)]
    pub content: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    pub rating: u8,
    #[serde(default)]
    pub category: FeedbackCategory,
    #[serde(default)]
    pub comment: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn user_to_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id.to_string(),
        "email": user.email,
        "display_name": user.display_name,
        "role": user.role.as_str(),
        "status": user.status.to_string(),
        "created_at": user.created_at.to_rfc3339(),
        "updated_at": user.updated_at.to_rfc3339(),
    })
}

pub fn profile_to_json(profile: &DisabilityProfile) -> serde_json::Value {
    serde_json::json!({
        "id": profile.id.to_string(),
        "user_id": profile.user_id.to_string(),
        "kind": profile.kind.as_str(),
        "severity": format!("{:?}", profile.severity).to_lowercase(),
        "assistive_technologies": profile.assistive_technologies,
        "notes": profile.notes,
        "preferences": profile.preferences,
        "created_at": profile.created_at.to_rfc3339(),
        "updated_at": profile.updated_at.to_rfc3339(),
    })
}

pub fn agent_config_to_json(config: &AgentConfig) -> serde_json::Value {
    serde_json::json!({
        "id": config.id.to_string(),
        "user_id": config.user_id.to_string(),
        "name": config.name,
        "language": config.language,
        "verbosity": format!("{:?}", config.verbosity).to_lowercase(),
        "speech_rate": config.speech_rate,
        "voice_feedback": config.voice_feedback,
        "subtitles_enabled": config.subtitles_enabled,
        "layout_hints_enabled": config.layout_hints_enabled,
    })
}

pub fn session_to_json(session: &AssistSession) -> serde_json::Value {
    serde_json::json!({
        "id": session.id.to_string(),
        "user_id": session.user_id.to_string(),
        "agent_config_id": session.agent_config_id.map(|id| id.to_string()),
        "device": session.device,
        "status": format!("{:?}", session.status).to_lowercase(),
        "started_at": session.started_at.to_rfc3339(),
        "ended_at": session.ended_at.map(|t| t.to_rfc3339()),
    })
}

pub fn voice_command_to_json(command: &VoiceCommand) -> serde_json::Value {
    serde_json::json!({
        "id": command.id.to_string(),
        "session_id": command.session_id.to_string(),
        "phrase": command.phrase,
        "intent": command.intent,
        "status": format!("{:?}", command.status).to_lowercase(),
        "issued_at": command.issued_at.to_rfc3339(),
    })
}

pub fn subtitle_to_json(subtitle: &Subtitle) -> serde_json::Value {
    serde_json::json!({
        "id": subtitle.id.to_string(),
        "session_id": subtitle.session_id.to_string(),
        "text": subtitle.text,
        "language": subtitle.language,
        "start_ms": subtitle.start_ms,
        "end_ms": subtitle.end_ms,
    })
}

pub fn layout_analysis_to_json(analysis: &LayoutAnalysis) -> serde_json::Value {
    serde_json::json!({
        "id": analysis.id.to_string(),
        "session_id": analysis.session_id.to_string(),
        "source": analysis.source,
        "elements_total": analysis.elements_total,
        "issues": analysis.issues.iter().map(|i| serde_json::json!({
            "kind": i.kind,
            "detail": i.detail,
            "severity": format!("{:?}", i.severity).to_lowercase(),
        })).collect::<Vec<_>>(),
        "summary": analysis.summary,
        "analyzed_at": analysis.analyzed_at.to_rfc3339(),
    })
}

pub fn feedback_to_json(feedback: &Feedback) -> serde_json::Value {
    serde_json::json!({
        "id": feedback.id.to_string(),
        "user_id": feedback.user_id.to_string(),
        "session_id": feedback.session_id.map(|id| id.to_string()),
        "rating": feedback.rating,
        "category": format!("{:?}", feedback.category).to_lowercase(),
        "comment": feedback.comment,
        "created_at": feedback.created_at.to_rfc3339(),
    })
}
