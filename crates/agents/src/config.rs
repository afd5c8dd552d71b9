//! AI agent configuration records.
//!
//! An agent configuration captures how the assistant behaves for one user:
//! output language, verbosity, speech pacing, and which assistance features
//! are switched on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accessmate_core::{AgentConfigId, DomainError, DomainResult, Entity, UserId};

const MIN_SPEECH_RATE: f32 = 0.5;
const MAX_SPEECH_RATE: f32 = 2.0;

/// How chatty the agent is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Low,
    #[default]
    Medium,
    High,
}

/// Creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAgentConfig {
    pub user_id: UserId,
    pub name: String,
    /// Output language as a BCP-47-style tag, e.g. "en" or "pt-BR".
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

/// Fields that may change after creation. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentConfigUpdate {
    pub name: Option<String>,
    pub language: Option<String>,
    pub verbosity: Option<Verbosity>,
    pub speech_rate: Option<f32>,
    pub voice_feedback: Option<bool>,
    pub subtitles_enabled: Option<bool>,
    pub layout_hints_enabled: Option<bool>,
}

/// Per-user AI assistant settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: AgentConfigId,
    pub user_id: UserId,
    pub name: String,
    pub language: String,
    pub verbosity: Verbosity,
    pub speech_rate: f32,
    pub voice_feedback: bool,
    pub subtitles_enabled: bool,
    pub layout_hints_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for AgentConfig {
    type Id = AgentConfigId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AgentConfig {
    pub fn create(cmd: NewAgentConfig, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = validate_name(&cmd.name)?;
        let language = validate_language(&cmd.language)?;
        validate_speech_rate(cmd.speech_rate)?;

        Ok(Self {
            id: AgentConfigId::new(),
            user_id: cmd.user_id,
            name,
            language,
            verbosity: cmd.verbosity,
            speech_rate: cmd.speech_rate,
            voice_feedback: cmd.voice_feedback,
            subtitles_enabled: cmd.subtitles_enabled,
            layout_hints_enabled: cmd.layout_hints_enabled,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, changes: AgentConfigUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = changes.name {
            self.name = validate_name(&name)?;
        }
        if let Some(language) = changes.language {
            self.language = validate_language(&language)?;
        }
        if let Some(verbosity) = changes.verbosity {
            self.verbosity = verbosity;
        }
        if let Some(rate) = changes.speech_rate {
            validate_speech_rate(rate)?;
            self.speech_rate = rate;
        }
        if let Some(v) = changes.voice_feedback {
            self.voice_feedback = v;
        }
        if let Some(v) = changes.subtitles_enabled {
            self.subtitles_enabled = v;
        }
        if let Some(v) = changes.layout_hints_enabled {
            self.layout_hints_enabled = v;
        }
        self.updated_at = now;
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("agent name cannot be empty"));
    }
    Ok(name.to_string())
}

fn validate_language(tag: &str) -> DomainResult<String> {
    let tag = tag.trim();
    let well_formed = !tag.is_empty()
        && tag.len() <= 35
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !well_formed {
        return Err(DomainError::validation(format!(
            "invalid language tag: {tag:?}"
        )));
    }
    Ok(tag.to_string())
}

fn validate_speech_rate(rate: f32) -> DomainResult<()> {
    if !(MIN_SPEECH_RATE..=MAX_SPEECH_RATE).contains(&rate) {
        return Err(DomainError::validation(format!(
            "speech rate must be within {MIN_SPEECH_RATE}..={MAX_SPEECH_RATE}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_config() -> NewAgentConfig {
        NewAgentConfig {
            user_id: UserId::new(),
            name: "Reading assistant".to_string(),
            language: "pt-BR".to_string(),
            verbosity: Verbosity::Medium,
            speech_rate: 1.0,
            voice_feedback: true,
            subtitles_enabled: true,
            layout_hints_enabled: false,
        }
    }

    #[test]
    fn create_accepts_a_well_formed_config() {
        let config = AgentConfig::create(new_config(), Utc::now()).unwrap();
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.verbosity, Verbosity::Medium);
    }

    #[test]
    fn speech_rate_outside_bounds_is_rejected() {
        for rate in [0.0, 0.49, 2.01, -1.0] {
            let mut cmd = new_config();
            cmd.speech_rate = rate;
            assert!(
                matches!(AgentConfig::create(cmd, Utc::now()), Err(DomainError::Validation(_))),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn language_tag_is_validated() {
        for bad in ["", "en us", "en_US", "日本語"] {
            let mut cmd = new_config();
            cmd.language = bad.to_string();
            assert!(
                matches!(AgentConfig::create(cmd, Utc::now()), Err(DomainError::Validation(_))),
                "tag {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn update_toggles_features_without_touching_the_rest() {
        let mut config = AgentConfig::create(new_config(), Utc::now()).unwrap();

        config
            .apply_update(
                AgentConfigUpdate {
                    layout_hints_enabled: Some(true),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();

        assert!(config.layout_hints_enabled);
        assert_eq!(config.name, "Reading assistant");
        assert_eq!(config.speech_rate, 1.0);
    }
}
