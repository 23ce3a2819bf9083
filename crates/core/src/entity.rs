//! Entity trait: identity + the collection a document lives in.

use uuid::Uuid;

/// Entity marker + minimal interface for documents persisted by collection.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Into<Uuid>;

    /// Name of the collection holding documents of this type.
    const COLLECTION: &'static str;

    /// Top-level document fields that must be unique within the collection.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
