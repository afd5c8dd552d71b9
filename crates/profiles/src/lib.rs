//! `accessmate-profiles` — disability profile domain.
//!
//! Pure domain logic for a user's declared accessibility needs; storage and
//! HTTP mapping live elsewhere.

pub mod profile;

pub use profile::{
    DisabilityKind, DisabilityProfile, NewProfile, ProfileUpdate, Severity,
};
