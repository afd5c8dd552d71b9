//! Voice commands captured during a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accessmate_core::{DomainError, DomainResult, Entity, SessionId, VoiceCommandId};

const MAX_PHRASE_LEN: usize = 512;

/// Interpretation state of a captured phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    /// Captured but not yet interpreted.
    #[default]
    Received,
    /// The agent produced an intent for it.
    Interpreted,
    /// Interpretation failed; the phrase is kept for diagnostics.
    Failed,
}

/// A spoken phrase and what the agent made of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCommand {
    pub id: VoiceCommandId,
    pub session_id: SessionId,
    pub phrase: String,
    /// Interpreted intent label, present once `status == Interpreted`.
    pub intent: Option<String>,
    pub status: CommandStatus,
    pub issued_at: DateTime<Utc>,
}

impl Entity for VoiceCommand {
    type Id = VoiceCommandId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl VoiceCommand {
    pub fn capture(session_id: SessionId, phrase: &str, now: DateTime<Utc>) -> DomainResult<Self> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(DomainError::validation("phrase cannot be empty"));
        }
        if phrase.len() > MAX_PHRASE_LEN {
            return Err(DomainError::validation(format!(
                "phrase exceeds {MAX_PHRASE_LEN} characters"
            )));
        }

        Ok(Self {
            id: VoiceCommandId::new(),
            session_id,
            phrase: phrase.to_string(),
            intent: None,
            status: CommandStatus::Received,
            issued_at: now,
        })
    }

    pub fn mark_interpreted(&mut self, intent: impl Into<String>) {
        self.intent = Some(intent.into());
        self.status = CommandStatus::Interpreted;
    }

    pub fn mark_failed(&mut self) {
        self.intent = None;
        self.status = CommandStatus::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_trims_and_starts_received() {
        let cmd = VoiceCommand::capture(SessionId::new(), "  open settings  ", Utc::now()).unwrap();
        assert_eq!(cmd.phrase, "open settings");
        assert_eq!(cmd.status, CommandStatus::Received);
        assert_eq!(cmd.intent, None);
    }

    #[test]
    fn empty_and_oversized_phrases_are_rejected(){
        assert!(VoiceCommand::capture(SessionId::new(), "   ", Utc::now()).is_err());
        let long = "x".repeat(MAX_PHRASE_LEN + 1);
        assert!(VoiceCommand::capture(SessionId::new(), &long, Utc::now()).is_err());
    }

    #[test]
    fn interpretation_sets_intent_and_status() {
        let mut cmd = VoiceCommand::capture(SessionId::new(), "open settings", Utc::now()).unwrap();
        cmd.mark_interpreted("navigate.settings");
        assert_eq!(cmd.status, CommandStatus::Interpreted);
        assert_eq!(cmd.intent.as_deref(), Some("navigate.settings"));

        cmd.mark_failed();
        assert_eq!(cmd.status, CommandStatus::Failed);
        assert_eq!(cmd.intent, None);
    }
}
