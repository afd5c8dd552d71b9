//! Entity trait: stable identity across state changes.

/// Minimal interface shared by the platform's persisted entities.
///
/// An entity is defined by its identifier, not its field values: a renamed
/// user or an ended session is still the same row. Repositories key on
/// `Entity::Id`.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
