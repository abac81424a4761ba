//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the item data access contract used by request handling.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - "No matching row" is an `Ok` outcome; storage faults are `StoreError`.

pub mod item_repo;
