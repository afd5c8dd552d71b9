//! `accessmate-ai`
//!
//! **Responsibility:** boundary to the external AI agent service.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It must not depend on platform entities (sessions/profiles/etc).
//! - It must not mutate domain state.
//! - It answers a single request/response contract; callers decide what to
//!   record from a reply.

pub mod client;
pub mod types;

pub use client::{AgentClient, AgentError, FallbackAgentClient, HttpAgentClient, MockAgentClient};
pub use types::{AgentReply, AgentRequest, AgentTask, ReportedIssue};
