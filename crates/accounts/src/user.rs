//! User accounts: registration, profile updates, credential changes.
//!
//! Pure domain logic; uniqueness of emails is enforced by the repository
//! layer, everything else is validated here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use accessmate_auth::Role;
use accessmate_core::{DomainError, DomainResult, Entity, UserId};

use crate::credential::{self, CredentialError};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// User account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User is active and can authenticate.
    #[default]
    Active,
    /// User is suspended and cannot authenticate.
    Suspended,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Registration payload (pre-validation).
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Profile fields a user may change after registration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
}

/// A platform user.
///
/// # Invariants
/// - `email` is lowercased and unique (uniqueness enforced by the repository).
/// - `password_hash` is always a PHC string; the cleartext never leaves the
///   registration/change call.
/// - Suspended users cannot authenticate or be updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl User {
    /// Register a new user with the default "user" tier.
    pub fn register(cmd: NewUser, now: DateTime<Utc>) -> Result<Self, UserError> {
        let email = normalize_email(&cmd.email)?;
        let display_name = validate_display_name(&cmd.display_name)?;
        validate_password(&cmd.password)?;

        let password_hash = credential::hash_password(&cmd.password)?;

        Ok(Self {
            id: UserId::new(),
            email,
            display_name,
            password_hash,
            role: Role::user(),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Verify a login attempt against the stored credential.
    ///
    /// Suspended users never verify, regardless of the password.
    pub fn verify_password(&self, password: &str) -> bool {
        self.status == UserStatus::Active && credential::verify_password(&self.password_hash, password)
    }

    pub fn apply_update(&mut self, changes: ProfileUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_active()?;

        if let Some(name) = changes.display_name {
            self.display_name = validate_display_name(&name)?;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Change the password, verifying the current one first.
    pub fn change_password(
        &mut self,
        current: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), UserError> {
        self.ensure_active()?;

        if !credential::verify_password(&self.password_hash, current) {
            return Err(DomainError::Unauthorized.into());
        }
        validate_password(new_password)?;

        self.password_hash = credential::hash_password(new_password)?;
        self.updated_at = now;
        Ok(())
    }

    /// Grant or revoke the admin tier (admin-only operation at the API layer).
    pub fn set_role(&mut self, role: Role, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_active()?;
        self.role = role;
        self.updated_at = now;
        Ok(())
    }

    pub fn suspend(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == UserStatus::Suspended {
            return Err(DomainError::conflict("user already suspended"));
        }
        self.status = UserStatus::Suspended;
        self.updated_at = now;
        Ok(())
    }

    pub fn activate(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == UserStatus::Active {
            return Err(DomainError::conflict("user already active"));
        }
        self.status = UserStatus::Active;
        self.updated_at = now;
        Ok(())
    }

    fn ensure_active(&self) -> DomainResult<()> {
        if self.status == UserStatus::Suspended {
            return Err(DomainError::invariant("user is suspended"));
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

fn validate_display_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("display name cannot be empty"));
    }
    Ok(name.to_string())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
