//! Service wiring: repositories, token service, agent client.
//!
//! Everything is constructed once at startup and held as immutable `Arc`
//! fields; no service locator, no runtime re-wiring.

use std::sync::Arc;

use chrono::Utc;

use accessmate_accounts::{NewUser, User};
use accessmate_ai::{AgentClient, FallbackAgentClient, HttpAgentClient, MockAgentClient};
use accessmate_auth::{Hs256TokenService, Role};
use accessmate_infra::{
    AgentConfigRepository, FeedbackRepository, InMemoryAgentConfigRepository,
    InMemoryFeedbackRepository, InMemoryLayoutAnalysisRepository, InMemoryProfileRepository,
    InMemorySessionRepository, InMemorySubtitleRepository, InMemoryUserRepository,
    InMemoryVoiceCommandRepository, LayoutAnalysisRepository, ProfileRepository, RepoError,
    SessionRepository, SubtitleRepository, UserRepository, VoiceCommandRepository,
};

use crate::app::config::{AppConfig, AGENT_TIMEOUT};

#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub agent_configs: Arc<dyn AgentConfigRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub voice_commands: Arc<dyn VoiceCommandRepository>,
    pub subtitles: Arc<dyn SubtitleRepository>,
    pub layout_analyses: Arc<dyn LayoutAnalysisRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub tokens: Arc<Hs256TokenService>,
    pub agent: Arc<dyn AgentClient>,
}

pub async fn build_services(config: &AppConfig) -> AppServices {
    let users = build_user_repository(config).await;

    let services = AppServices {
        users,
        profiles: Arc::new(InMemoryProfileRepository::new()),
        agent_configs: Arc::new(InMemoryAgentConfigRepository::new()),
        sessions: Arc::new(InMemorySessionRepository::new()),
        voice_commands: Arc::new(InMemoryVoiceCommandRepository::new()),
        subtitles: Arc::new(InMemorySubtitleRepository::new()),
        layout_analyses: Arc::new(InMemoryLayoutAnalysisRepository::new()),
        feedback: Arc::new(InMemoryFeedbackRepository::new()),
        tokens: Arc::new(Hs256TokenService::with_ttl_millis(
            config.jwt_secret.clone().into_bytes(),
            config.jwt_ttl_ms,
        )),
        agent: build_agent_client(config),
    };

    seed_admin(config, &services).await;

    services
}

async fn build_user_repository(config: &AppConfig) -> Arc<dyn UserRepository> {
    if config.use_persistent_stores {
        #[cfg(feature = "postgres")]
        {
            return build_postgres_user_repository(config).await;
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
        }
    }

    Arc::new(InMemoryUserRepository::new())
}

#[cfg(feature = "postgres")]
async fn build_postgres_user_repository(config: &AppConfig) -> Arc<dyn UserRepository> {
    use accessmate_infra::PostgresUserRepository;

    let database_url = config
        .database_url
        .as_deref()
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = sqlx::PgPool::connect(database_url)
        .await
        .expect("Failed to connect to Postgres");

    PostgresUserRepository::ensure_schema(&pool)
        .await
        .expect("Failed to prepare users schema");

    Arc::new(PostgresUserRepository::new(pool))
}

fn build_agent_client(config: &AppConfig) -> Arc<dyn AgentClient> {
    match &config.agent_service_url {
        Some(url) => match HttpAgentClient::new(url.clone(), AGENT_TIMEOUT) {
            Ok(http) => Arc::new(FallbackAgentClient::new(Arc::new(http))),
            Err(err) => {
                tracing::warn!(%err, "agent service client unavailable; using mock");
                Arc::new(MockAgentClient)
            }
        },
        None => Arc::new(MockAgentClient),
    }
}

/// Create the configured admin account on first start.
async fn seed_admin(config: &AppConfig, services: &AppServices) {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return;
    };

    let mut admin = match User::register(
        NewUser {
            email: email.clone(),
            display_name: "Administrator".to_string(),
            password: password.clone(),
        },
        Utc::now(),
    ) {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(%err, "admin seed credentials rejected");
            return;
        }
    };

    if admin.set_role(Role::admin(), Utc::now()).is_err() {
        return;
    }

    match services.users.insert(admin).await {
        Ok(()) => tracing::info!(%email, "seeded admin account"),
        Err(RepoError::Duplicate(_)) => {}
        Err(err) => tracing::warn!(%err, "failed to seed admin account"),
    }
}
