use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// What the agent service is being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentTask {
    /// Turn a spoken phrase into an intent label.
    InterpretCommand,
    /// Scan a page/screen description for accessibility issues.
    AnalyzeLayout,
}

/// Request forwarded to the agent service.
///
/// The payload is passed through verbatim; this crate does not interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub task: AgentTask,
    pub payload: JsonValue,
    /// Preferred reply language, when the caller has one configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AgentRequest {
    pub fn interpret_command(phrase: &str, language: Option<String>) -> Self {
        Self {
            task: AgentTask::InterpretCommand,
            payload: serde_json::json!({ "phrase": phrase }),
            language,
        }
    }

    pub fn analyze_layout(source: &str, content: JsonValue, language: Option<String>) -> Self {
        Self {
            task: AgentTask::AnalyzeLayout,
            payload: serde_json::json!({ "source": source, "content": content }),
            language,
        }
    }
}

/// One accessibility finding as reported by the agent service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedIssue {
    pub kind: String,
    pub detail: String,
    /// "info" | "warning" | "critical"; unknown values degrade to "info"
    /// at the mapping layer.
    pub severity: String,
}

/// Reply from the agent service.
///
/// Fields are task-dependent: `intent` for command interpretation,
/// `issues`/`summary` for layout analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub issues: Vec<ReportedIssue>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Confidence in \[0, 1\] (recommended convention; not enforced).
    #[serde(default)]
    pub confidence: f64,
}
