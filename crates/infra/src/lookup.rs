//! Repository-backed identity lookup for the authentication path.

use std::sync::Arc;

use async_trait::async_trait;

use accessmate_accounts::UserStatus;
use accessmate_auth::{AuthPrincipal, LookupError, PrincipalLookup};

use crate::repository::UserRepository;

/// Resolves token subjects against the user repository.
///
/// Suspended users do not resolve: their tokens stop authenticating
/// immediately, without waiting for expiry.
pub struct RepositoryPrincipalLookup {
    users: Arc<dyn UserRepository>,
}

impl RepositoryPrincipalLookup {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl PrincipalLookup for RepositoryPrincipalLookup {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthPrincipal>, LookupError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| LookupError(e.to_string()))?;

        Ok(user
            .filter(|u| u.status == UserStatus::Active)
            .map(|u| AuthPrincipal {
                user_id: u.id,
                email: u.email,
                role: u.role,
            }))
    }
}
