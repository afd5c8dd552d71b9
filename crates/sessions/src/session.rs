//! Assist sessions: one live assistance run per user and device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accessmate_core::{AgentConfigId, DomainError, DomainResult, Entity, SessionId, UserId};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Ended,
}

/// Creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSession {
    pub user_id: UserId,
    #[serde(default)]
    pub agent_config_id: Option<AgentConfigId>,
    /// Free-form device label, e.g. "android-tablet" or "kiosk-3".
    pub device: String,
}

/// One assistance run.
///
/// # Invariants
/// - `ended_at` is set iff `status == Ended`.
/// - A session never restarts; ending twice is a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub agent_config_id: Option<AgentConfigId>,
    pub device: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Entity for AssistSession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AssistSession {
    pub fn start(cmd: NewSession, now: DateTime<Utc>) -> DomainResult<Self> {
        let device = cmd.device.trim();
        if device.is_empty() {
            return Err(DomainError::validation("device label cannot be empty"));
        }

        Ok(Self {
            id: SessionId::new(),
            user_id: cmd.user_id,
            agent_config_id: cmd.agent_config_id,
            device: device.to_string(),
            status: SessionStatus::Active,
            started_at: now,
            ended_at: None,
        })
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == SessionStatus::Ended {
            return Err(DomainError::conflict("session already ended"));
        }
        self.status = SessionStatus::Ended;
        self.ended_at = Some(now);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Artifacts (commands, subtitles, analyses) may only attach to a live session.
    pub fn ensure_active(&self) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::invariant("session has ended"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_session() -> AssistSession {
        AssistSession::start(
            NewSession {
                user_id: UserId::new(),
                agent_config_id: None,
                device: " android-tablet ".to_string(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn start_trims_the_device_label() {
        let session = start_session();
        assert_eq!(session.device, "android-tablet");
        assert!(session.is_active());
        assert_eq!(session.ended_at, None);
    }

    #[test]
    fn blank_device_is_rejected() {
        let result = AssistSession::start(
            NewSession {
                user_id: UserId::new(),
                agent_config_id: None,
                device: "   ".to_string(),
            },
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn ending_twice_is_a_conflict() {
        let mut session = start_session();
        session.end(Utc::now()).unwrap();
        assert_eq!(session.status, SessionStatus::Ended);
        assert!(session.ended_at.is_some());

        assert!(matches!(session.end(Utc::now()), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn ended_session_refuses_new_artifacts() {
        let mut session = start_session();
        session.end(Utc::now()).unwrap();
        assert!(matches!(
            session.ensure_active(),
            Err(DomainError::InvariantViolation(_))
        ));
    }
}
