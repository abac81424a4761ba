//! Storage location resolution.
//!
//! # Invariants
//! - The platform data directory is only consulted when the caller does
//!   not supply an explicit database path.
//! - Directories created here are owner-only on Unix.

use super::{DbError, DbResult};
use std::fs::DirBuilder;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "itemsvc";
const DB_FILE_NAME: &str = "items.sqlite3";

/// Returns the per-user data directory
/// (`~/.local/share/itemsvc` on Linux).
pub fn default_data_dir() -> DbResult<PathBuf> {
    app_dir_in(dirs::data_local_dir())
}

/// Returns `explicit` when supplied, else the database file inside the
/// per-user data directory.
pub fn resolve_db_path(explicit: Option<&Path>) -> DbResult<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(default_data_dir()?.join(DB_FILE_NAME)),
    }
}

/// Creates `dir` (and missing parents) when absent.
///
/// Existing directories are left untouched.
pub fn ensure_private_dir(dir: &Path) -> DbResult<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder.create(dir).map_err(|source| DbError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Restricts an existing database file to owner read/write on Unix.
pub(crate) fn restrict_file_permissions(path: &Path) -> DbResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(
            |source| DbError::Io {
                path: path.to_path_buf(),
                source,
            },
        )?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

fn app_dir_in(data_local_dir: Option<PathBuf>) -> DbResult<PathBuf> {
    data_local_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(DbError::HomeDirUnavailable)
}

#[cfg(test)]
mod tests {
    use super::{app_dir_in, ensure_private_dir, resolve_db_path};
    use crate::db::DbError;
    use std::path::{Path, PathBuf};

    #[test]
    fn app_dir_is_nested_under_platform_data_dir() {
        let dir = app_dir_in(Some(PathBuf::from("/home/ada/.local/share"))).unwrap();
        assert_eq!(dir, PathBuf::from("/home/ada/.local/share/itemsvc"));
    }

    #[test]
    fn missing_or_empty_data_dir_is_rejected() {
        assert!(matches!(app_dir_in(None), Err(DbError::HomeDirUnavailable)));
        assert!(matches!(
            app_dir_in(Some(PathBuf::new())),
            Err(DbError::HomeDirUnavailable)
        ));
    }

    #[test]
    fn default_db_path_matches_platform_data_dir() {
        if let Some(base) = dirs::data_local_dir() {
            assert_eq!(
                resolve_db_path(None).unwrap(),
                base.join("itemsvc").join("items.sqlite3")
            );
        }
    }

    #[test]
    fn explicit_path_wins_over_default() {
        let path = resolve_db_path(Some(Path::new("/srv/items.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/srv/items.db"));
    }

    #[cfg(unix)]
    #[test]
    fn created_directory_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("data");
        ensure_private_dir(&dir).unwrap();

        let mode = std::fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn existing_directory_is_accepted() {
        let root = tempfile::tempdir().unwrap();
        ensure_private_dir(root.path()).unwrap();
        assert!(root.path().is_dir());
    }
}
