//! Agent service clients: HTTP passthrough plus a static offline fallback.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{AgentReply, AgentRequest, AgentTask, ReportedIssue};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent transport failed: {0}")]
    Transport(String),

    #[error("agent returned an unusable reply: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AgentError::Decode(err.to_string())
        } else {
            AgentError::Transport(err.to_string())
        }
    }
}

/// Boundary to the external agent service.
///
/// Implementations must not mutate platform state; they answer a single
/// request/response contract.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn analyze(&self, request: AgentRequest) -> Result<AgentReply, AgentError>;
}

/// Thin HTTP passthrough to `POST {base_url}/analyze`.
pub struct HttpAgentClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAgentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn analyze(&self, request: AgentRequest) -> Result<AgentReply, AgentError> {
        let reply = self
            .http
            .post(format!("{}/analyze", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<AgentReply>()
            .await?;

        Ok(reply)
    }
}

/// Static canned replies for development and for transport failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockAgentClient;

impl MockAgentClient {
    fn reply_for(task: AgentTask) -> AgentReply {
        match task {
            AgentTask::InterpretCommand => AgentReply {
                intent: Some("assist.generic".to_string()),
                issues: Vec::new(),
                summary: None,
                confidence: 0.0,
            },
            AgentTask::AnalyzeLayout => AgentReply {
                intent: None,
                issues: vec![ReportedIssue {
                    kind: "not-analyzed".to_string(),
                    detail: "agent service unavailable; no findings produced".to_string(),
                    severity: "info".to_string(),
                }],
                summary: Some("offline placeholder analysis".to_string()),
                confidence: 0.0,
            },
        }
    }
}

#[async_trait]
impl AgentClient for MockAgentClient {
    async fn analyze(&self, request: AgentRequest) -> Result<AgentReply, AgentError> {
        Ok(Self::reply_for(request.task))
    }
}

/// Primary client with the mock as a fallback.
///
/// Any transport or decode failure degrades to the canned reply; callers
/// never see an error from this client.
pub struct FallbackAgentClient {
    primary: Arc<dyn AgentClient>,
}

impl FallbackAgentClient {
    pub fn new(primary: Arc<dyn AgentClient>) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl AgentClient for FallbackAgentClient {
    async fn analyze(&self, request: AgentRequest) -> Result<AgentReply, AgentError> {
        let task = request.task;
        match self.primary.analyze(request).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                tracing::warn!(%err, ?task, "agent service call failed; using mock reply");
                Ok(MockAgentClient::reply_for(task))
            }
        }
    }
}
