//! Server configuration.
//!
//! Defaults reproduce the fixed deployment shape: port 8080 on all
//! interfaces, storage and logs under the per-user data directory.

use itemsvc_core::db::DbResult;
use itemsvc_core::{default_data_dir, default_log_level, resolve_db_path};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_READ_BUFFER_BYTES: usize = 4096;
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Explicit database file; `None` selects the per-user default.
    pub db_path: Option<PathBuf>,
    /// Size of the single read performed per connection.
    pub read_buffer_bytes: usize,
    pub log_level: String,
    /// Explicit log directory; `None` selects `<data dir>/logs`.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            db_path: None,
            read_buffer_bytes: DEFAULT_READ_BUFFER_BYTES,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Database file this configuration points at.
    pub fn resolved_db_path(&self) -> DbResult<PathBuf> {
        resolve_db_path(self.db_path.as_deref())
    }

    /// Log directory this configuration points at.
    pub fn resolved_log_dir(&self) -> DbResult<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(default_data_dir()?.join(LOG_DIR_NAME)),
        }
    }
}
