//! Infrastructure layer: storage and the repository-backed identity lookup.

pub mod lookup;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod repository;

pub use lookup::RepositoryPrincipalLookup;
pub use memory::{
    InMemoryAgentConfigRepository, InMemoryFeedbackRepository, InMemoryLayoutAnalysisRepository,
    InMemoryProfileRepository, InMemorySessionRepository, InMemorySubtitleRepository,
    InMemoryUserRepository, InMemoryVoiceCommandRepository,
};
#[cfg(feature = "postgres")]
pub use postgres::PostgresUserRepository;
pub use repository::{
    AgentConfigRepository, FeedbackRepository, LayoutAnalysisRepository, ProfileRepository,
    RepoError, SessionRepository, SubtitleRepository, UserRepository, VoiceCommandRepository,
};
