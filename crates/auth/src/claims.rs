use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Additional claims carried alongside the registered ones.
pub type ExtraClaims = Map<String, Value>;

/// Claims encoded into a signed bearer token.
///
/// This is the minimal registered set the platform relies on (`sub`, `iat`,
/// `exp`); anything else a caller asks to embed rides along in `extra` and is
/// never interpreted by the authentication path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the principal's unique email.
    pub sub: String,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,

    /// Caller-supplied extra claims (opaque to validation).
    #[serde(flatten)]
    pub extra: ExtraClaims,
}

impl TokenClaims {
    /// Build claims for `subject` issued at `now` with the given lifetime.
    pub fn new(subject: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            extra: ExtraClaims::new(),
        }
    }

    pub fn with_extra(mut self, extra: ExtraClaims) -> Self {
        self.extra = extra;
        self
    }

    /// Whether the token is past its expiry at `now`.
    ///
    /// Expiry is inclusive: a token is no longer valid at exactly `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
