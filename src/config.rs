//! Image store location, read from the environment.

use crate::error::StoreError;
use crate::store::SqliteImageStore;
use std::env;
use std::path::PathBuf;

/// Environment variable naming the store database file.
pub const DATABASE_ENV: &str = "WPIMPORT_DATABASE";

/// Environment variable naming the media root directory.
pub const MEDIA_ROOT_ENV: &str = "WPIMPORT_MEDIA_ROOT";

/// Default database path.
pub const DEFAULT_DATABASE: &str = "wpimport.db";

/// Default media root.
pub const DEFAULT_MEDIA_ROOT: &str = "media";

/// Where the image store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file
    pub database: PathBuf,

    /// Directory receiving image files
    pub media_root: PathBuf,
}

impl StoreConfig {
    /// Create a config with explicit paths.
    pub fn new(database: impl Into<PathBuf>, media_root: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            media_root: media_root.into(),
        }
    }

    /// Read `WPIMPORT_DATABASE` and `WPIMPORT_MEDIA_ROOT`, falling back to
    /// the defaults for unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            database: read(DATABASE_ENV, DEFAULT_DATABASE),
            media_root: read(MEDIA_ROOT_ENV, DEFAULT_MEDIA_ROOT),
        }
    }

    /// Open the configured SQLite store.
    pub fn open(&self) -> Result<SqliteImageStore, StoreError> {
        SqliteImageStore::open(&self.database, self.media_root.clone())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE, DEFAULT_MEDIA_ROOT)
    }
}
