//! Disability profiles: a user's declared accessibility needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accessmate_core::{DomainError, DomainResult, Entity, ProfileId, UserId};

const MAX_NOTES_LEN: usize = 1_000;

/// Broad category of disability a profile describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabilityKind {
    Visual,
    Hearing,
    Motor,
    Cognitive,
    Speech,
    Other,
}

impl DisabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisabilityKind::Visual => "visual",
            DisabilityKind::Hearing => "hearing",
            DisabilityKind::Motor => "motor",
            DisabilityKind::Cognitive => "cognitive",
            DisabilityKind::Speech => "speech",
            DisabilityKind::Other => "other",
        }
    }
}

/// Self-reported severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Profound,
}

/// Creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub user_id: UserId,
    pub kind: DisabilityKind,
    pub severity: Severity,
    #[serde(default)]
    pub assistive_technologies: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Free-form client preferences (JSON object).
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

/// Fields that may change after creation. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub severity: Option<Severity>,
    pub assistive_technologies: Option<Vec<String>>,
    pub notes: Option<String>,
    pub preferences: Option<serde_json::Value>,
}

/// A user's disability profile.
///
/// # Invariants
/// - At most one profile per (user, kind); enforced by the repository.
/// - `preferences` is always a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisabilityProfile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub kind: DisabilityKind,
    pub severity: Severity,
    pub assistive_technologies: Vec<String>,
    pub notes: Option<String>,
    pub preferences: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for DisabilityProfile {
    type Id = ProfileId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl DisabilityProfile {
    pub fn create(cmd: NewProfile, now: DateTime<Utc>) -> DomainResult<Self> {
        let assistive_technologies = normalize_tech_labels(cmd.assistive_technologies)?;
        let notes = validate_notes(cmd.notes)?;
        let preferences = validate_preferences(cmd.preferences)?;

        Ok(Self {
            id: ProfileId::new(),
            user_id: cmd.user_id,
            kind: cmd.kind,
            severity: cmd.severity,
            assistive_technologies,
            notes,
            preferences,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, changes: ProfileUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(severity) = changes.severity {
            self.severity = severity;
        }
        if let Some(tech) = changes.assistive_technologies {
            self.assistive_technologies = normalize_tech_labels(tech)?;
        }
        if let Some(notes) = changes.notes {
            self.notes = validate_notes(Some(notes))?;
        }
        if let Some(preferences) = changes.preferences {
            self.preferences = validate_preferences(Some(preferences))?;
        }
        self.updated_at = now;
        Ok(())
    }
}

fn normalize_tech_labels(labels: Vec<String>) -> DomainResult<Vec<String>> {
    let mut out = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            return Err(DomainError::validation(
                "assistive technology labels cannot be empty",
            ));
        }
        out.push(label.to_string());
    }
    Ok(out)
}

fn validate_notes(notes: Option<String>) -> DomainResult<Option<String>> {
    match notes {
        None => Ok(None),
        Some(n) => {
            let n = n.trim().to_string();
            if n.len() > MAX_NOTES_LEN {
                return Err(DomainError::validation(format!(
                    "notes exceed {MAX_NOTES_LEN} characters"
                )));
            }
            Ok(if n.is_empty() { None } else { Some(n) })
        }
    }
}

fn validate_preferences(preferences: Option<serde_json::Value>) -> DomainResult<serde_json::Value> {
    match preferences {
        None => Ok(serde_json::Value::Object(serde_json::Map::new())),
        Some(v) if v.is_object() => Ok(v),
        Some(_) => Err(DomainError::validation("preferences must be a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_profile() -> NewProfile {
        NewProfile {
            user_id: UserId::new(),
            kind: DisabilityKind::Visual,
            severity: Severity::Moderate,
            assistive_technologies: vec!["  screen reader ".to_string()],
            notes: Some("Prefers high contrast.".to_string()),
            preferences: Some(json!({"contrast": "high", "font_scale": 1.5})),
        }
    }

    #[test]
    fn create_trims_labels_and_keeps_preferences() {
        let profile = DisabilityProfile::create(new_profile(), Utc::now()).unwrap();
        assert_eq!(profile.assistive_technologies, vec!["screen reader"]);
        assert_eq!(profile.preferences["contrast"], "high");
    }

    #[test]
    fn preferences_must_be_an_object() {
        let mut cmd = new_profile();
        cmd.preferences = Some(json!(["not", "an", "object"]));
        assert!(matches!(
            DisabilityProfile::create(cmd, Utc::now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn missing_preferences_default_to_an_empty_object() {
        let mut cmd = new_profile();
        cmd.preferences = None;
        let profile = DisabilityProfile::create(cmd, Utc::now()).unwrap();
        assert!(profile.preferences.as_object().unwrap().is_empty());
    }

    #[test]
    fn empty_tech_label_is_rejected() {
        let mut cmd = new_profile();
        cmd.assistive_technologies = vec!["   ".to_string()];
        assert!(matches!(
            DisabilityProfile::create(cmd, Utc::now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn update_only_touches_provided_fields() {
        let mut profile = DisabilityProfile::create(new_profile(), Utc::now()).unwrap();
        let created_severity = profile.severity;

        profile
            .apply_update(
                ProfileUpdate {
                    notes: Some("".to_string()),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();

        assert_eq!(profile.severity, created_severity);
        assert_eq!(profile.notes, None);
    }

    #[test]
    fn oversized_notes_are_rejected() {
        let mut profile = DisabilityProfile::create(new_profile(), Utc::now()).unwrap();
        let result = profile.apply_update(
            ProfileUpdate {
                notes: Some("x".repeat(MAX_NOTES_LEN + 1)),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
