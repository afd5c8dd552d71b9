//! User feedback entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accessmate_core::{DomainError, DomainResult, Entity, FeedbackId, SessionId, UserId};

const MAX_COMMENT_LEN: usize = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Bug,
    Suggestion,
    Praise,
    #[default]
    Other,
}

/// Submission payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFeedback {
    pub user_id: UserId,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// 1 (worst) to 5 (best).
    pub rating: u8,
    #[serde(default)]
    pub category: FeedbackCategory,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub session_id: Option<SessionId>,
    pub rating: u8,
    pub category: FeedbackCategory,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Feedback {
    type Id = FeedbackId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Feedback {
    pub fn submit(cmd: NewFeedback, now: DateTime<Utc>) -> DomainResult<Self> {
        if !(1..=5).contains(&cmd.rating) {
            return Err(DomainError::validation("rating must be between 1 and 5"));
        }

        let comment = match cmd.comment {
            None => None,
            Some(c) => {
                let c = c.trim().to_string();
                if c.len() > MAX_COMMENT_LEN {
                    return Err(DomainError::validation(format!(
                        "comment exceeds {MAX_COMMENT_LEN} characters"
                    )));
                }
                if c.is_empty() { None } else { Some(c) }
            }
        };

        Ok(Self {
            id: FeedbackId::new(),
            user_id: cmd.user_id,
            session_id: cmd.session_id,
            rating: cmd.rating,
            category: cmd.category,
            comment,
            created_at: now,
        })
    }
}
