//! Layout analyses: accessibility findings for a page or screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accessmate_core::{DomainError, DomainResult, Entity, LayoutAnalysisId, SessionId};

/// How much a finding impairs use of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Info,
    Warning,
    Critical,
}

/// One accessibility finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutIssue {
    /// Finding kind label, e.g. "missing-alt-text" or "low-contrast".
    pub kind: String,
    pub detail: String,
    pub severity: IssueSeverity,
}

/// The analysed findings for one page/screen, as reported by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutAnalysis {
    pub id: LayoutAnalysisId,
    pub session_id: SessionId,
    /// URL or screen label the analysis ran against.
    pub source: String,
    pub elements_total: u32,
    pub issues: Vec<LayoutIssue>,
    pub summary: String,
    pub analyzed_at: DateTime<Utc>,
}

impl Entity for LayoutAnalysis {
    type Id = LayoutAnalysisId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl LayoutAnalysis {
    pub fn record(
        session_id: SessionId,
        source: &str,
        elements_total: u32,
        issues: Vec<LayoutIssue>,
        summary: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(DomainError::validation("analysis source cannot be empty"));
        }
        for issue in &issues {
            if issue.kind.trim().is_empty() {
                return Err(DomainError::validation("issue kind cannot be empty"));
            }
        }

        Ok(Self {
            id: LayoutAnalysisId::new(),
            session_id,
            source: source.to_string(),
            elements_total,
            issues,
            summary: summary.into(),
            analyzed_at: now,
        })
    }

    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Critical)
            .count()
    }
}
