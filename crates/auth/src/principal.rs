use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use accessmate_core::UserId;

use crate::{Role, TokenError, TokenService};

/// A resolved, authenticated principal.
///
/// Construction is decoupled from storage and transport: the authentication
/// path builds this from a verified token subject plus the identity lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPrincipal {
    pub user_id: UserId,
    /// Unique email; also the token subject.
    pub email: String,
    pub role: Role,
}

/// Failure of the identity-lookup collaborator itself (not "no such user").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("identity lookup failed: {0}")]
pub struct LookupError(pub String);

/// The user-lookup collaborator consumed by the authentication path.
///
/// Implementations are expected to be thread-safe read paths (typically a
/// repository over a connection pool). No retries happen here or in callers.
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    /// Resolve a principal by its unique email.
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthPrincipal>, LookupError>;
}

/// Why a presented bearer token did not authenticate.
///
/// All variants are recovered where authentication is attempted; none may
/// surface to a client as a server error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unparseable token or signature mismatch.
    #[error(transparent)]
    MalformedToken(#[from] TokenError),

    /// The token's subject does not resolve to a known principal.
    /// Logged distinctly from malformed tokens for audit.
    #[error("identity not found: {0}")]
    IdentityNotFound(String),

    /// The lookup collaborator failed (storage error, pool exhaustion, ...).
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Well-formed token that is expired or bound to a different subject.
    #[error("token rejected (expired or subject mismatch)")]
    Rejected,
}

/// Authenticate a presented bearer token end to end.
///
/// Extracts the subject, resolves the principal via `lookup`, then validates
/// the token against the resolved identity. All three checks are required; a
/// token is never accepted on signature alone.
pub async fn authenticate(
    tokens: &dyn TokenService,
    lookup: &dyn PrincipalLookup,
    token: &str,
) -> Result<AuthPrincipal, AuthError> {
    let subject = tokens.extract_subject(token)?;

    let principal = lookup
        .find_by_email(&subject)
        .await?
        .ok_or(AuthError::IdentityNotFound(subject))?;

    if tokens.validate(token, &principal.email)? {
        Ok(principal)
    } else {
        Err(AuthError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ExtraClaims;
    use crate::token::Hs256TokenService;
    use chrono::Duration;

    struct StaticLookup {
        known: Vec<AuthPrincipal>,
        fail: bool,
    }

    #[async_trait]
    impl PrincipalLookup for StaticLookup {
        async fn find_by_email(&self, email: &str) -> Result<Option<AuthPrincipal>, LookupError> {
            if self.fail {
                return Err(LookupError("store unavailable".to_string()));
            }
            Ok(self.known.iter().find(|p| p.email == email).cloned())
        }
    }

    fn alice() -> AuthPrincipal {
        AuthPrincipal {
            user_id: UserId::new(),
            email: "alice@example.com".to_string(),
            role: Role::user(),
        }
    }

    fn service() -> Hs256TokenService {
        Hs256TokenService::new(b"test-secret".to_vec(), Duration::minutes(5))
    }

    #[tokio::test]
    async fn known_subject_with_valid_token_authenticates() {
        let svc = service();
        let lookup = StaticLookup { known: vec![alice()], fail: false };
        let token = svc.issue("alice@example.com", ExtraClaims::new()).unwrap();

        let principal = authenticate(&svc, &lookup, &token).await.unwrap();
        assert_eq!(principal.email, "alice@example.com");
    }

    #[tokio::test]
    async fn unknown_subject_is_identity_not_found() {
        let svc = service();
        let lookup = StaticLookup { known: vec![], fail: false };
        let token = svc.issue("ghost@example.com", ExtraClaims::new()).unwrap();

        let err = authenticate(&svc, &lookup, &token).await.unwrap_err();
        assert_eq!(err, AuthError::IdentityNotFound("ghost@example.com".to_string()));
    }

    #[tokio::test]
    async fn malformed_token_is_not_a_lookup() {
        let svc = service();
        // A lookup failure here would mean we consulted storage for garbage input.
        let lookup = StaticLookup { known: vec![], fail: true };

        let err = authenticate(&svc, &lookup, "garbage").await.unwrap_err();
        assert_eq!(err, AuthError::MalformedToken(TokenError::Malformed));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_not_an_error() {
        let svc = Hs256TokenService::new(b"test-secret".to_vec(), Duration::milliseconds(0));
        let lookup = StaticLookup { known: vec![alice()], fail: false };
        let token = svc.issue("alice@example.com", ExtraClaims::new()).unwrap();

        let err = authenticate(&svc, &lookup, &token).await.unwrap_err();
        assert_eq!(err, AuthError::Rejected);
    }

    #[tokio::test]
    async fn lookup_failure_propagates_as_lookup_error() {
        let svc = service();
        let lookup = StaticLookup { known: vec![], fail: true };
        let token = svc.issue("alice@example.com", ExtraClaims::new()).unwrap();

        let err = authenticate(&svc, &lookup, &token).await.unwrap_err();
        assert!(matches!(err, AuthError::Lookup(_)));
    }
}
