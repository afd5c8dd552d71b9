//! Bearer-token issuance and validation (HMAC-SHA256 compact tokens).
//!
//! The service is constructed once at startup with its secret and TTL and is
//! immutable afterwards; issuing and validating are pure functions of the
//! token, the key, and the clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{ExtraClaims, TokenClaims};

/// Token-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token cannot be parsed, or its signature does not verify against
    /// the configured secret. Callers must treat this as "unauthenticated",
    /// never as a server error.
    #[error("malformed or unverifiable token")]
    Malformed,

    /// Signing/serialization failed while minting a token.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Issues and validates signed bearer tokens.
///
/// Expired-but-well-signed tokens and subject mismatches validate to
/// `Ok(false)`; only unparseable or wrongly-signed input is an error.
pub trait TokenService: Send + Sync {
    /// Mint a signed token with `sub = subject`, `iat = now`,
    /// `exp = now + ttl`, plus any caller-supplied extra claims.
    fn issue(&self, subject: &str, extra: ExtraClaims) -> Result<String, TokenError>;

    /// `Ok(true)` iff the token verifies, its subject equals
    /// `expected_subject`, and it has not expired.
    fn validate(&self, token: &str, expected_subject: &str) -> Result<bool, TokenError>;

    /// Decode and return the subject claim.
    fn extract_subject(&self, token: &str) -> Result<String, TokenError>;
}

/// HS256 implementation of [`TokenService`] over a shared symmetric secret.
pub struct Hs256TokenService {
    secret: Vec<u8>,
    ttl: Duration,
}

impl Hs256TokenService {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Convenience for the externally-configured TTL unit.
    pub fn with_ttl_millis(secret: impl Into<Vec<u8>>, ttl_ms: u64) -> Self {
        Self::new(secret, Duration::milliseconds(ttl_ms as i64))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token as of an explicit instant (deterministic variant used by
    /// time-dependent tests; [`TokenService::issue`] delegates with `Utc::now`).
    pub fn issue_at(
        &self,
        subject: &str,
        extra: ExtraClaims,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims::new(subject, now, self.ttl).with_extra(extra);
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token as of an explicit instant.
    pub fn validate_at(
        &self,
        token: &str,
        expected_subject: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, TokenError> {
        let claims = self.decode_claims(token)?;
        Ok(claims.sub == expected_subject && !claims.is_expired_at(now))
    }

    /// Decode and signature-check a token, without the expiry check.
    ///
    /// Expiry is evaluated separately so that an expired-but-well-signed token
    /// validates to `false` instead of surfacing as a parse error.
    fn decode_claims(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Malformed)
    }
}

impl TokenService for Hs256TokenService {
    fn issue(&self, subject: &str, extra: ExtraClaims) -> Result<String, TokenError> {
        self.issue_at(subject, extra, Utc::now())
    }

    fn validate(&self, token: &str, expected_subject: &str) -> Result<bool, TokenError> {
        self.validate_at(token, expected_subject, Utc::now())
    }

    fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.decode_claims(token).map(|c| c.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn service_ms(secret: &str, ttl_ms: i64) -> Hs256TokenService {
        Hs256TokenService::new(secret.as_bytes().to_vec(), Duration::milliseconds(ttl_ms))
    }

    #[test]
    fn issued_token_validates_for_its_subject() {
        let svc = service_ms("test-secret", 60_000);
        let token = svc.issue("alice@example.com", ExtraClaims::new()).unwrap();

        assert_eq!(svc.validate(&token, "alice@example.com"), Ok(true));
        assert_eq!(
            svc.extract_subject(&token).as_deref(),
            Ok("alice@example.com")
        );
    }

    #[test]
    fn validity_window_follows_the_configured_ttl() {
        use chrono::TimeZone;

        // TTL = 1000ms; issue at t0, probe at t0+500ms and t0+1500ms. A fixed
        // whole-second t0 keeps the check independent of sub-second phase
        // (claims carry epoch seconds).
        let svc = service_ms("test-secret", 1000);
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = svc
            .issue_at("alice@example.com", ExtraClaims::new(), t0)
            .unwrap();

        let at = |ms: i64| t0 + Duration::milliseconds(ms);
        assert_eq!(svc.validate_at(&token, "alice@example.com", at(500)), Ok(true));
        assert_eq!(svc.validate_at(&token, "alice@example.com", at(1500)), Ok(false));
        assert_eq!(svc.validate_at(&token, "bob@example.com", at(500)), Ok(false));
    }

    #[test]
    fn expired_token_is_false_not_an_error() {
        let svc = service_ms("test-secret", 1000);
        let t0 = Utc::now();
        let token = svc
            .issue_at("alice@example.com", ExtraClaims::new(), t0)
            .unwrap();

        let later = t0 + Duration::seconds(10);
        assert_eq!(svc.validate_at(&token, "alice@example.com", later), Ok(false));
        // The token still parses; only the expiry check fails.
        assert!(svc.extract_subject(&token).is_ok());
    }

    #[test]
    fn token_signed_with_another_key_is_malformed() {
        let issuer = service_ms("key-one", 60_000);
        let verifier = service_ms("key-two", 60_000);
        let token = issuer.issue("alice@example.com", ExtraClaims::new()).unwrap();

        assert_eq!(verifier.extract_subject(&token), Err(TokenError::Malformed));
        assert_eq!(
            verifier.validate(&token, "alice@example.com"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn garbage_input_is_malformed() {
        let svc = service_ms("test-secret", 60_000);

        for garbage in ["", "garbage", "a.b", "a.b.c.d", "header.payload.signature"] {
            assert_eq!(svc.extract_subject(garbage), Err(TokenError::Malformed));
            assert_eq!(
                svc.validate(garbage, "alice@example.com"),
                Err(TokenError::Malformed)
            );
        }
    }

    #[test]
    fn extra_claims_survive_the_round_trip() {
        let svc = service_ms("test-secret", 60_000);
        let mut extra = ExtraClaims::new();
        extra.insert("role".into(), serde_json::Value::String("admin".into()));

        let token = svc.issue("alice@example.com", extra).unwrap();
        assert_eq!(svc.validate(&token, "alice@example.com"), Ok(true));
    }

    proptest! {
        #[test]
        fn subject_round_trips_for_any_nonempty_identity(subject in "[a-zA-Z0-9._%+-]{1,40}@[a-z0-9.-]{1,20}") {
            let svc = service_ms("round-trip-secret", 60_000);
            let token = svc.issue(&subject, ExtraClaims::new()).unwrap();
            prop_assert_eq!(svc.extract_subject(&token).unwrap(), subject);
        }
    }
}
