//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/get/update/delete over the `items` table.
//! - Own the single backing connection for the lifetime of the store.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT` and are never handed out twice.
//! - Each operation is a single SQL statement and atomic on its own.
//! - Item names are user content and never appear in log lines.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::item::{Item, ItemId};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const ITEMS_TABLE: &str = "items";
const REQUIRED_ITEM_COLUMNS: &[&str] = &["id", "name"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for item persistence and schema checks.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    /// Persists a new item and returns its freshly assigned id.
    fn create_item(&self, name: &str) -> StoreResult<ItemId>;
    /// Returns every live item ordered by id ascending.
    fn list_items(&self) -> StoreResult<Vec<Item>>;
    fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>>;
    /// Returns `false` when no item has this id.
    fn update_item(&self, id: ItemId, name: &str) -> StoreResult<bool>;
    /// Returns `false` when no item has this id.
    fn delete_item(&self, id: ItemId) -> StoreResult<bool>;
}

/// SQLite-backed item repository owning its connection.
pub struct SqliteItemRepository {
    conn: Connection,
}

impl SqliteItemRepository {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps an existing connection after checking its schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the
    ///   `items` table does not have the expected shape.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ItemRepository for SqliteItemRepository {
    fn create_item(&self, name: &str) -> StoreResult<ItemId> {
        self.conn
            .execute("INSERT INTO items (name) VALUES (?1);", params![name])?;
        let id = self.conn.last_insert_rowid();
        debug!("event=item_create module=repo status=ok item_id={id}");
        Ok(id)
    }

    fn list_items(&self) -> StoreResult<Vec<Item>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM items ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        debug!(
            "event=item_list module=repo status=ok count={}",
            items.len()
        );
        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let item = self
            .conn
            .query_row(
                "SELECT id, name FROM items WHERE id = ?1;",
                params![id],
                |row| Ok((row.get::<_, ItemId>("id")?, row.get::<_, Option<String>>("name")?)),
            )
            .optional()?;

        debug!(
            "event=item_get module=repo status=ok item_id={id} found={}",
            item.is_some()
        );
        item.map(|(id, name)| item_from_parts(id, name)).transpose()
    }

    fn update_item(&self, id: ItemId, name: &str) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE items SET name = ?1 WHERE id = ?2;",
            params![name, id],
        )?;
        debug!("event=item_update module=repo status=ok item_id={id} changed={changed}");
        Ok(changed > 0)
    }

    fn delete_item(&self, id: ItemId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", params![id])?;
        debug!("event=item_delete module=repo status=ok item_id={id} changed={changed}");
        Ok(changed > 0)
    }
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<Item> {
    item_from_parts(row.get("id")?, row.get("name")?)
}

fn item_from_parts(id: ItemId, name: Option<String>) -> StoreResult<Item> {
    let name = name.ok_or_else(|| {
        StoreError::InvalidData(format!("NULL value in items.name for id {id}"))
    })?;
    Ok(Item::new(id, name))
}

fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    if actual_version > expected_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported: expected_version,
        }
        .into());
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [ITEMS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(StoreError::MissingRequiredTable(ITEMS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([ITEMS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in REQUIRED_ITEM_COLUMNS {
        if !columns.iter().any(|existing| existing == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: ITEMS_TABLE,
                column,
            });
        }
    }

    Ok(())
}
