//! Downstream authorization policy.
//!
//! The authentication filter never rejects a request itself; it either
//! populates a principal or forwards the request without one. This module is
//! the layer that turns "no principal" or "insufficient tier" into a denial.

use thiserror::Error;

use crate::AuthPrincipal;

/// Access tier required by an endpoint or operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tier {
    /// Any authenticated principal.
    Authenticated,
    /// Principals carrying the "admin" role.
    Admin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: requires the '{0}' role")]
    Forbidden(&'static str),
}

/// Authorize a (possibly absent) principal against a required tier.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: Option<&AuthPrincipal>, tier: Tier) -> Result<(), AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthenticated)?;

    match tier {
        Tier::Authenticated => Ok(()),
        Tier::Admin if principal.role.is_admin() => Ok(()),
        Tier::Admin => Err(AuthzError::Forbidden("admin")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use accessmate_core::UserId;

    fn principal(role: Role) -> AuthPrincipal {
        AuthPrincipal {
            user_id: UserId::new(),
            email: "p@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn absent_principal_is_unauthenticated_for_every_tier() {
        assert_eq!(
            authorize(None, Tier::Authenticated),
            Err(AuthzError::Unauthenticated)
        );
        assert_eq!(authorize(None, Tier::Admin), Err(AuthzError::Unauthenticated));
    }

    #[test]
    fn any_principal_passes_the_authenticated_tier() {
        let p = principal(Role::user());
        assert_eq!(authorize(Some(&p), Tier::Authenticated), Ok(()));
    }

    #[test]
    fn admin_tier_requires_the_admin_role() {
        let user = principal(Role::user());
        let admin = principal(Role::admin());

        assert_eq!(
            authorize(Some(&user), Tier::Admin),
            Err(AuthzError::Forbidden("admin"))
        );
        assert_eq!(authorize(Some(&admin), Tier::Admin), Ok(()));
    }
}
