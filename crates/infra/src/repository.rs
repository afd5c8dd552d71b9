//! Repository contracts for the platform's entities.
//!
//! No storage assumptions: in-memory implementations back tests/dev, the
//! Postgres user repository backs production identity lookups. All traits are
//! thread-safe read/write paths shared behind `Arc`.

use async_trait::async_trait;
use thiserror::Error;

use accessmate_accounts::User;
use accessmate_agents::AgentConfig;
use accessmate_core::{
    AgentConfigId, FeedbackId, LayoutAnalysisId, ProfileId, SessionId, SubtitleId, UserId,
    VoiceCommandId,
};
use accessmate_feedback::Feedback;
use accessmate_profiles::{DisabilityKind, DisabilityProfile};
use accessmate_sessions::{AssistSession, LayoutAnalysis, Subtitle, VoiceCommand};

/// Infrastructure-level storage error (not a domain failure).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// A uniqueness constraint was violated (e.g. duplicate email).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The backing store failed (connection, query, serialization).
    #[error("storage failure: {0}")]
    Storage(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with [`RepoError::Duplicate`] if the email is taken.
    async fn insert(&self, user: User) -> Result<(), RepoError>;

    /// Persist the current state of an existing user.
    async fn update(&self, user: User) -> Result<(), RepoError>;

    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;

    /// Identity lookup by unique (lowercased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn list(&self) -> Result<Vec<User>, RepoError>;

    /// Returns whether a user was actually removed.
    async fn remove(&self, id: UserId) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert a profile; fails with [`RepoError::Duplicate`] if the user
    /// already has a profile of the same kind.
    async fn insert(&self, profile: DisabilityProfile) -> Result<(), RepoError>;

    async fn update(&self, profile: DisabilityProfile) -> Result<(), RepoError>;

    async fn get(&self, id: ProfileId) -> Result<Option<DisabilityProfile>, RepoError>;

    async fn find_by_user_and_kind(
        &self,
        user_id: UserId,
        kind: DisabilityKind,
    ) -> Result<Option<DisabilityProfile>, RepoError>;

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<DisabilityProfile>, RepoError>;

    async fn remove(&self, id: ProfileId) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait AgentConfigRepository: Send + Sync {
    async fn insert(&self, config: AgentConfig) -> Result<(), RepoError>;

    async fn update(&self, config: AgentConfig) -> Result<(), RepoError>;

    async fn get(&self, id: AgentConfigId) -> Result<Option<AgentConfig>, RepoError>;

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<AgentConfig>, RepoError>;

    async fn remove(&self, id: AgentConfigId) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: AssistSession) -> Result<(), RepoError>;

    async fn update(&self, session: AssistSession) -> Result<(), RepoError>;

    async fn get(&self, id: SessionId) -> Result<Option<AssistSession>, RepoError>;

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<AssistSession>, RepoError>;
}

#[async_trait]
pub trait VoiceCommandRepository: Send + Sync {
    /// Commands are interpreted before they are stored; there is no update.
    async fn insert(&self, command: VoiceCommand) -> Result<(), RepoError>;

    async fn get(&self, id: VoiceCommandId) -> Result<Option<VoiceCommand>, RepoError>;

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<VoiceCommand>, RepoError>;
}

#[async_trait]
pub trait SubtitleRepository: Send + Sync {
    async fn insert(&self, subtitle: Subtitle) -> Result<(), RepoError>;

    async fn get(&self, id: SubtitleId) -> Result<Option<Subtitle>, RepoError>;

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Subtitle>, RepoError>;
}

#[async_trait]
pub trait LayoutAnalysisRepository: Send + Sync {
    async fn insert(&self, analysis: LayoutAnalysis) -> Result<(), RepoError>;

    async fn get(&self, id: LayoutAnalysisId) -> Result<Option<LayoutAnalysis>, RepoError>;

    async fn list_by_session(&self, session_id: SessionId)
        -> Result<Vec<LayoutAnalysis>, RepoError>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn insert(&self, feedback: Feedback) -> Result<(), RepoError>;

    async fn get(&self, id: FeedbackId) -> Result<Option<Feedback>, RepoError>;

    async fn list(&self) -> Result<Vec<Feedback>, RepoError>;

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Feedback>, RepoError>;
}
