//! `accessmate-agents` — AI agent configuration domain.

pub mod config;

pub use config::{AgentConfig, AgentConfigUpdate, NewAgentConfig, Verbosity};
