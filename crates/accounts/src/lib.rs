//! `accessmate-accounts` — user account domain.
//!
//! Registration, credential hashing/verification, and account lifecycle,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod credential;
pub mod user;

pub use credential::{hash_password, verify_password, CredentialError};
pub use user::{NewUser, ProfileUpdate, User, UserError, UserStatus};
