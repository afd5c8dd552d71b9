//! Request-scoped security context and the extractors that enforce it.
//!
//! The filter only ever *populates* the context; these extractors are the
//! downstream authorization layer that answers 401/403.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Response};

use accessmate_auth::{authorize, AuthPrincipal, Role, Tier};
use accessmate_core::UserId;

use crate::app::errors;

/// Security context for one request: the resolved principal and its
/// role-derived authority. Inserted by the authentication filter, dropped
/// with the request.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(AuthPrincipal);

impl CurrentPrincipal {
    pub fn new(principal: AuthPrincipal) -> Self {
        Self(principal)
    }

    pub fn principal(&self) -> &AuthPrincipal {
        &self.0
    }

    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> &Role {
        &self.0.role
    }
}

/// Extractor: any authenticated principal (401 otherwise).
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthPrincipal);

/// Extractor: a principal carrying the admin role (401/403 otherwise).
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthPrincipal);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<CurrentPrincipal>();
        authorize(ctx.map(CurrentPrincipal::principal), Tier::Authenticated)
            .map_err(errors::authz_error_to_response)?;

        // authorize() accepted, so the context is present.
        match ctx {
            Some(ctx) => Ok(Self(ctx.principal().clone())),
            None => Err(errors::authz_error_to_response(
                accessmate_auth::AuthzError::Unauthenticated,
            )),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<CurrentPrincipal>();
        authorize(ctx.map(CurrentPrincipal::principal), Tier::Admin)
            .map_err(errors::authz_error_to_response)?;

        match ctx {
            Some(ctx) => Ok(Self(ctx.principal().clone())),
            None => Err(errors::authz_error_to_response(
                accessmate_auth::AuthzError::Unauthenticated,
            )),
        }
    }
}
