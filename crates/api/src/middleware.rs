//! Bearer-token authentication filter.
//!
//! Runs once per inbound request. Public paths pass through with no token
//! work at all. Everywhere else the filter extracts a bearer token, resolves
//! the principal via the identity lookup, validates the token against that
//! identity, and attaches the security context on success. On any failure the
//! request is forwarded *unauthenticated* — turning that into a 401/403 is
//! the extractors' job (see `context`), never this filter's.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use accessmate_auth::{authenticate, AuthError, PrincipalLookup, TokenService};

use crate::context::CurrentPrincipal;

/// Path prefixes the filter never inspects: API docs, auth endpoints, and
/// console/error pages.
pub const PUBLIC_PATH_PREFIXES: &[&str] = &[
    "/v3/api-docs",
    "/swagger-ui",
    "/swagger-resources",
    "/webjars",
    "/api/auth",
    "/h2-console",
];

/// Exact public paths.
pub const PUBLIC_PATHS: &[&str] = &["/error"];

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenService>,
    pub lookup: Arc<dyn PrincipalLookup>,
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PATH_PREFIXES.iter().any(|p| path.starts_with(p))
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let Some(token) = bearer_token(req.headers()) else {
        // No Authorization header, or not a bearer credential. Forward with
        // no security context; protected handlers will answer 401.
        return next.run(req).await;
    };
    let token = token.to_string();

    match authenticate(state.tokens.as_ref(), state.lookup.as_ref(), &token).await {
        Ok(principal) => {
            req.extensions_mut().insert(CurrentPrincipal::new(principal));
        }
        Err(AuthError::IdentityNotFound(subject)) => {
            // Distinct audit trail: well-signed token for an unknown user.
            tracing::warn!(%subject, "token subject does not resolve to a known user");
        }
        Err(AuthError::Lookup(err)) => {
            tracing::warn!(%err, "identity lookup failed; request proceeds unauthenticated");
        }
        Err(err) => {
            tracing::debug!(%err, "bearer token did not authenticate");
        }
    }

    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{routing::get, Router};
    use chrono::Duration;
    use tower::ServiceExt;

    use accessmate_auth::{
        AuthPrincipal, ExtraClaims, Hs256TokenService, LookupError, Role, TokenError,
    };
    use accessmate_core::UserId;

    /// Panics on any use; proves the filter does no token work on a path.
    struct UntouchableTokens;

    impl TokenService for UntouchableTokens {
        fn issue(&self, _: &str, _: ExtraClaims) -> Result<String, TokenError> {
            panic!("token service must not be touched");
        }

        fn validate(&self, _: &str, _: &str) -> Result<bool, TokenError> {
            panic!("token service must not be touched");
        }

        fn extract_subject(&self, _: &str) -> Result<String, TokenError> {
            panic!("token service must not be touched");
        }
    }

    struct StaticLookup(Vec<AuthPrincipal>);

    #[async_trait]
    impl PrincipalLookup for StaticLookup {
        async fn find_by_email(&self, email: &str) -> Result<Option<AuthPrincipal>, LookupError> {
            Ok(self.0.iter().find(|p| p.email == email).cloned())
        }
    }

    async fn echo_identity(req: Request<Body>) -> String {
        match req.extensions().get::<CurrentPrincipal>() {
            Some(ctx) => ctx.email().to_string(),
            None => "anonymous".to_string(),
        }
    }

    fn app(state: AuthState) -> Router {
        Router::new()
            .route("/swagger-ui/index.html", get(echo_identity))
            .route("/protected", get(echo_identity))
            .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
    }

    fn get_request(path: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn alice() -> AuthPrincipal {
        AuthPrincipal {
            user_id: UserId::new(),
            email: "alice@example.com".to_string(),
            role: Role::user(),
        }
    }

    #[tokio::test]
    async fn public_paths_skip_token_work_even_with_garbled_headers() {
        let state = AuthState {
            tokens: Arc::new(UntouchableTokens),
            lookup: Arc::new(StaticLookup(vec![])),
        };

        let response = app(state)
            .oneshot(get_request(
                "/swagger-ui/index.html",
                Some("Bearer garbage"),
            ))
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn missing_or_non_bearer_headers_forward_unauthenticated() {
        let tokens = Arc::new(Hs256TokenService::new(
            b"test-secret".to_vec(),
            Duration::minutes(5),
        ));

        for authorization in [None, Some("Basic dXNlcjpwdw=="), Some("bearer lowercase")] {
            let state = AuthState {
                tokens: tokens.clone(),
                lookup: Arc::new(StaticLookup(vec![alice()])),
            };
            let response = app(state)
                .oneshot(get_request("/protected", authorization))
                .await
                .unwrap();

            assert!(response.status().is_success());
            assert_eq!(body_string(response).await, "anonymous");
        }
    }

    #[tokio::test]
    async fn valid_token_for_known_user_populates_the_context() {
        let tokens = Arc::new(Hs256TokenService::new(
            b"test-secret".to_vec(),
            Duration::minutes(5),
        ));
        let token = tokens
            .issue("alice@example.com", ExtraClaims::new())
            .unwrap();

        let state = AuthState {
            tokens,
            lookup: Arc::new(StaticLookup(vec![alice()])),
        };
        let response = app(state)
            .oneshot(get_request("/protected", Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "alice@example.com");
    }

    #[tokio::test]
    async fn malformed_unknown_or_expired_tokens_forward_unauthenticated() {
        let tokens = Arc::new(Hs256TokenService::new(
            b"test-secret".to_vec(),
            Duration::minutes(5),
        ));
        let other_key = Hs256TokenService::new(b"other-secret".to_vec(), Duration::minutes(5));
        let expired = Hs256TokenService::new(b"test-secret".to_vec(), Duration::zero());

        let foreign = other_key
            .issue("alice@example.com", ExtraClaims::new())
            .unwrap();
        let unknown = tokens.issue("ghost@example.com", ExtraClaims::new()).unwrap();
        let stale = expired
            .issue("alice@example.com", ExtraClaims::new())
            .unwrap();

        for token in ["garbage".to_string(), foreign, unknown, stale] {
            let state = AuthState {
                tokens: tokens.clone(),
                lookup: Arc::new(StaticLookup(vec![alice()])),
            };
            let response = app(state)
                .oneshot(get_request("/protected", Some(&format!("Bearer {token}"))))
                .await
                .unwrap();

            // Never a 500; the request simply proceeds without identity.
            assert!(response.status().is_success());
            assert_eq!(body_string(response).await, "anonymous");
        }
    }
}
