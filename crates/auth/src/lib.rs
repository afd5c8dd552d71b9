//! `accessmate-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: token
//! issuance/validation, the identity-lookup contract, and the downstream
//! authorization policy live here; the axum filter and the repositories that
//! implement the lookup live elsewhere.

pub mod authorize;
pub mod claims;
pub mod principal;
pub mod roles;
pub mod token;

pub use authorize::{authorize, AuthzError, Tier};
pub use claims::{ExtraClaims, TokenClaims};
pub use principal::{authenticate, AuthError, AuthPrincipal, LookupError, PrincipalLookup};
pub use roles::Role;
pub use token::{Hs256TokenService, TokenError, TokenService};
