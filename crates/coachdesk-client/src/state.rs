//! Layout of a coachdesk home directory: the client store, `config.json`,
//! and field map files referenced from the config.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Error as SqliteError, ffi::ErrorCode};
use tracing::debug;

use crate::{ClientError, ClientResult};

pub const HOME_ENV_VAR: &str = "COACHDESK_HOME";

const DEFAULT_HOME_DIR: &str = ".coachdesk";
const DB_FILE_NAME: &str = "clients.db";
const CONFIG_FILE_NAME: &str = "config.json";
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// An absolute path to the directory holding one coach's client store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachHome {
    root: PathBuf,
}

impl CoachHome {
    /// The override when given, then `COACHDESK_HOME`, then `~/.coachdesk`.
    /// Relative paths are taken against the working directory.
    pub fn resolve(home_override: Option<&Path>) -> ClientResult<Self> {
        let candidate = match home_override {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(HOME_ENV_VAR) {
                Some(from_env) => PathBuf::from(from_env),
                None => home::home_dir()
                    .map(|user_home| user_home.join(DEFAULT_HOME_DIR))
                    .ok_or_else(|| {
                        ClientError::store_init_failed(
                            Path::new("."),
                            "Could not resolve a home directory for the client store.",
                        )
                    })?,
            },
        };

        let root = if candidate.is_absolute() {
            candidate
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&candidate))
                .map_err(|error| ClientError::store_init_failed(&candidate, &error.to_string()))?
        };
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Paths written in `config.json` are relative to the home, not to the
    /// directory the command runs from.
    pub fn resolve_relative(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Creates the directory if needed. Client records hold health data, so
    /// on unix the directory is narrowed to the owner.
    pub fn create(&self) -> ClientResult<()> {
        fs::create_dir_all(&self.root).map_err(|error| map_io_error(&self.root, &error))?;
        restrict_to_owner(&self.root);
        Ok(())
    }
}

pub fn open_connection(db_path: &Path) -> ClientResult<Connection> {
    let connection =
        Connection::open(db_path).map_err(|error| map_sqlite_error(db_path, &error))?;
    connection
        .busy_timeout(BUSY_TIMEOUT)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(connection)
}

pub fn map_io_error(path: &Path, error: &std::io::Error) -> ClientError {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => {
            ClientError::store_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::store_init_failed(path, &error.to_string()),
    }
}

pub fn map_sqlite_error(path: &Path, error: &SqliteError) -> ClientError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            ClientError::store_locked(path)
        }
        Some(ErrorCode::NotADatabase) => ClientError::store_corrupt(path),
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly) => {
            ClientError::store_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::store_init_failed(path, &error.to_string()),
    }
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(error) = fs::set_permissions(path, fs::Permissions::from_mode(0o700)) {
        debug!(path = %path.display(), %error, "could not restrict store home permissions");
    }
}

#[cfg(not(unix))]
fn restrict_to_owner(path: &Path) {
    debug!(path = %path.display(), "store home permissions left as created");
}
