//! Domain model for persisted item records.
//!
//! # Invariants
//! - Every item is identified by a store-assigned `ItemId`.
//! - Deletion is a hard delete; a deleted id never resolves again.

pub mod item;
