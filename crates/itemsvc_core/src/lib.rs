//! Core storage logic for the item service.
//! This crate owns the item records and every invariant about their identity.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::path::{default_data_dir, resolve_db_path};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
