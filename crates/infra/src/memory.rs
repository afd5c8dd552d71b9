//! In-memory repositories for tests and development.
//!
//! Backed by `RwLock<HashMap>`; secondary lookups scan. Good enough for the
//! dev store, deliberately free of ordering or indexing cleverness.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use async_trait::async_trait;

use accessmate_accounts::User;
use accessmate_agents::AgentConfig;
use accessmate_core::{
    AgentConfigId, FeedbackId, LayoutAnalysisId, ProfileId, SessionId, SubtitleId, UserId,
    VoiceCommandId,
};
use accessmate_feedback::Feedback;
use accessmate_profiles::{DisabilityKind, DisabilityProfile};
use accessmate_sessions::{AssistSession, LayoutAnalysis, Subtitle, VoiceCommand};

use crate::repository::{
    AgentConfigRepository, FeedbackRepository, LayoutAnalysisRepository, ProfileRepository,
    RepoError, SessionRepository, SubtitleRepository, UserRepository, VoiceCommandRepository,
};

/// Plain keyed store shared by the in-memory repositories.
#[derive(Debug)]
struct KeyedStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> KeyedStore<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K) -> Result<Option<V>, RepoError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn insert_new(&self, key: K, value: V, what: &str) -> Result<(), RepoError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if map.contains_key(&key) {
            return Err(RepoError::Duplicate(what.to_string()));
        }
        map.insert(key, value);
        Ok(())
    }

    fn upsert(&self, key: K, value: V) -> Result<(), RepoError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<bool, RepoError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        Ok(map.remove(key).is_some())
    }

    fn filter(&self, pred: impl Fn(&V) -> bool) -> Result<Vec<V>, RepoError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().filter(|v| pred(v)).cloned().collect())
    }

    fn find(&self, pred: impl Fn(&V) -> bool) -> Result<Option<V>, RepoError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().find(|v| pred(v)).cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepoError {
    RepoError::Storage("store lock poisoned".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct InMemoryUserRepository {
    store: KeyedStore<UserId, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: KeyedStore::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<(), RepoError> {
        if self.store.find(|u| u.email == user.email)?.is_some() {
            return Err(RepoError::Duplicate(format!("email {}", user.email)));
        }
        self.store.insert_new(user.id, user, "user id")
    }

    async fn update(&self, user: User) -> Result<(), RepoError> {
        self.store.upsert(user.id, user)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        self.store.get(&id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.store.find(|u| u.email == email)
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        self.store.filter(|_| true)
    }

    async fn remove(&self, id: UserId) -> Result<bool, RepoError> {
        self.store.remove(&id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profiles
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct InMemoryProfileRepository {
    store: KeyedStore<ProfileId, DisabilityProfile>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self {
            store: KeyedStore::new(),
        }
    }
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn insert(&self, profile: DisabilityProfile) -> Result<(), RepoError> {
        let exists = self
            .store
            .find(|p| p.user_id == profile.user_id && p.kind == profile.kind)?
            .is_some();
        if exists {
            return Err(RepoError::Duplicate(format!(
                "profile kind {} for user {}",
                profile.kind.as_str(),
                profile.user_id
            )));
        }
        self.store.insert_new(profile.id, profile, "profile id")
    }

    async fn update(&self, profile: DisabilityProfile) -> Result<(), RepoError> {
        self.store.upsert(profile.id, profile)
    }

    async fn get(&self, id: ProfileId) -> Result<Option<DisabilityProfile>, RepoError> {
        self.store.get(&id)
    }

    async fn find_by_user_and_kind(
        &self,
        user_id: UserId,
        kind: DisabilityKind,
    ) -> Result<Option<DisabilityProfile>, RepoError> {
        self.store.find(|p| p.user_id == user_id && p.kind == kind)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<DisabilityProfile>, RepoError> {
        self.store.filter(|p| p.user_id == user_id)
    }

    async fn remove(&self, id: ProfileId) -> Result<bool, RepoError> {
        self.store.remove(&id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Agent configs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct InMemoryAgentConfigRepository {
    store: KeyedStore<AgentConfigId, AgentConfig>,
}

impl InMemoryAgentConfigRepository {
    pub fn new() -> Self {
        Self {
            store: KeyedStore::new(),
        }
    }
}

impl Default for InMemoryAgentConfigRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentConfigRepository for InMemoryAgentConfigRepository {
    async fn insert(&self, config: AgentConfig) -> Result<(), RepoError> {
        self.store.insert_new(config.id, config, "agent config id")
    }

    async fn update(&self, config: AgentConfig) -> Result<(), RepoError> {
        self.store.upsert(config.id, config)
    }

    async fn get(&self, id: AgentConfigId) -> Result<Option<AgentConfig>, RepoError> {
        self.store.get(&id)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<AgentConfig>, RepoError> {
        self.store.filter(|c| c.user_id == user_id)
    }

    async fn remove(&self, id: AgentConfigId) -> Result<bool, RepoError> {
        self.store.remove(&id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions and session artifacts
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct InMemorySessionRepository {
    store: KeyedStore<SessionId, AssistSession>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            store: KeyedStore::new(),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: AssistSession) -> Result<(), RepoError> {
        self.store.insert_new(session.id, session, "session id")
    }

    async fn update(&self, session: AssistSession) -> Result<(), RepoError> {
        self.store.upsert(session.id, session)
    }

    async fn get(&self, id: SessionId) -> Result<Option<AssistSession>, RepoError> {
        self.store.get(&id)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<AssistSession>, RepoError> {
        self.store.filter(|s| s.user_id == user_id)
    }
}

#[derive(Debug)]
pub struct InMemoryVoiceCommandRepository {
    store: KeyedStore<VoiceCommandId, VoiceCommand>,
}

impl InMemoryVoiceCommandRepository {
    pub fn new() -> Self {
        Self {
            store: KeyedStore::new(),
        }
    }
}

impl Default for InMemoryVoiceCommandRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceCommandRepository for InMemoryVoiceCommandRepository {
    async fn insert(&self, command: VoiceCommand) -> Result<(), RepoError> {
        self.store.insert_new(command.id, command, "voice command id")
    }

    async fn get(&self, id: VoiceCommandId) -> Result<Option<VoiceCommand>, RepoError> {
        self.store.get(&id)
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<VoiceCommand>, RepoError> {
        self.store.filter(|c| c.session_id == session_id)
    }
}

#[derive(Debug)]
pub struct InMemorySubtitleRepository {
    store: KeyedStore<SubtitleId, Subtitle>,
}

impl InMemorySubtitleRepository {
    pub fn new() -> Self {
        Self {
            store: KeyedStore::new(),
        }
    }
}

impl Default for InMemorySubtitleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubtitleRepository for InMemorySubtitleRepository {
    async fn insert(&self, subtitle: Subtitle) -> Result<(), RepoError> {
        self.store.insert_new(subtitle.id, subtitle, "subtitle id")
    }

    async fn get(&self, id: SubtitleId) -> Result<Option<Subtitle>, RepoError> {
        self.store.get(&id)
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Subtitle>, RepoError> {
        let mut subtitles = self.store.filter(|s| s.session_id == session_id)?;
        subtitles.sort_by_key(|s| s.start_ms);
        Ok(subtitles)
    }
}

#[derive(Debug)]
pub struct InMemoryLayoutAnalysisRepository {
    store: KeyedStore<LayoutAnalysisId, LayoutAnalysis>,
}

impl InMemoryLayoutAnalysisRepository {
    pub fn new() -> Self {
        Self {
            store: KeyedStore::new(),
        }
    }
}

impl Default for InMemoryLayoutAnalysisRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LayoutAnalysisRepository for InMemoryLayoutAnalysisRepository {
    async fn insert(&self, analysis: LayoutAnalysis) -> Result<(), RepoError> {
        self.store.insert_new(analysis.id, analysis, "analysis id")
    }

    async fn get(&self, id: LayoutAnalysisId) -> Result<Option<LayoutAnalysis>, RepoError> {
        self.store.get(&id)
    }

    async fn list_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<LayoutAnalysis>, RepoError> {
        self.store.filter(|a| a.session_id == session_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feedback
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct InMemoryFeedbackRepository {
    store: KeyedStore<FeedbackId, Feedback>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self {
            store: KeyedStore::new(),
        }
    }
}

impl Default for InMemoryFeedbackRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, feedback: Feedback) -> Result<(), RepoError> {
        self.store.insert_new(feedback.id, feedback, "feedback id")
    }

    async fn get(&self, id: FeedbackId) -> Result<Option<Feedback>, RepoError> {
        self.store.get(&id)
    }

    async fn list(&self) -> Result<Vec<Feedback>, RepoError> {
        self.store.filter(|_| true)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Feedback>, RepoError> {
        self.store.filter(|f| f.user_id == user_id)
    }
}
