//! Item domain model.
//!
//! # Responsibility
//! - Define the single record type persisted by the store.
//!
//! # Invariants
//! - `id` is strictly positive, assigned at creation and never reused.
//! - `name` is stored exactly as received; it may be empty.

/// Store-assigned item identifier (SQLite rowid).
pub type ItemId = i64;

/// A named item record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Immutable identifier assigned by the store.
    pub id: ItemId,
    /// Mutable display name.
    pub name: String,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
