//! Subtitle segments generated for a session's audio stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accessmate_core::{DomainError, DomainResult, Entity, SessionId, SubtitleId};

/// Creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubtitle {
    pub text: String,
    pub language: String,
    /// Segment window relative to session start, in milliseconds.
    pub start_ms: u64,
    pub end_ms: u64,
}

/// One timed subtitle segment.
///
/// # Invariants
/// - `end_ms > start_ms` (zero-length segments are rejected).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    pub id: SubtitleId,
    pub session_id: SessionId,
    pub text: String,
    pub language: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl Entity for Subtitle {
    type Id = SubtitleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Subtitle {
    pub fn create(session_id: SessionId, cmd: NewSubtitle, now: DateTime<Utc>) -> DomainResult<Self> {
        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("subtitle text cannot be empty"));
        }
        let language = cmd.language.trim();
        if language.is_empty() {
            return Err(DomainError::validation("subtitle language cannot be empty"));
        }
        if cmd.end_ms <= cmd.start_ms {
            return Err(DomainError::validation("subtitle window must end after it starts"));
        }

        Ok(Self {
            id: SubtitleId::new(),
            session_id,
            text: text.to_string(),
            language: language.to_string(),
            start_ms: cmd.start_ms,
            end_ms: cmd.end_ms,
            created_at: now,
        })
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}
