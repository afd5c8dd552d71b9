use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role label naming a permission tier.
///
/// Roles are intentionally opaque strings at this layer; the platform ships
/// with the "admin" and "user" tiers, but nothing here enumerates them so a
/// policy layer can introduce more without touching authentication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The administrative tier.
    pub fn admin() -> Self {
        Self::new("admin")
    }

    /// The default tier for registered users.
    pub fn user() -> Self {
        Self::new("user")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == "admin"
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::user()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
