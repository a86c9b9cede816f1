//! SQLite-backed image store with files on disk.

use super::{available_name, committable, ImageStore, StoredImage, ORIGINALS_DIR};
use crate::error::StoreError;
use crate::model::ImageDescriptor;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Image records in SQLite, image files under `<media_root>/original_images`.
pub struct SqliteImageStore {
    conn: Connection,
    media_root: PathBuf,
}

impl SqliteImageStore {
    /// Open or create a store database.
    pub fn open(database: impl AsRef<Path>, media_root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let database = database.as_ref();
        if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(database)?;
        log::debug!("Opened image store at {}", database.display());
        Self::with_connection(conn, media_root.into())
    }

    /// Create a store with an in-memory database.
    pub fn open_in_memory(media_root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, media_root.into())
    }

    fn with_connection(conn: Connection, media_root: PathBuf) -> Result<Self, StoreError> {
        let store = Self { conn, media_root };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS images (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL DEFAULT '',
                file            TEXT NOT NULL,
                width           INTEGER NOT NULL,
                height          INTEGER NOT NULL,
                file_size       INTEGER NOT NULL,
                created_at      TEXT NOT NULL
            )",
            [],
        )?;

        // Lookups by title gate every download.
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_images_title ON images(title)",
            [],
        )?;

        Ok(())
    }

    /// Absolute path of a stored file.
    pub fn file_path(&self, image: &StoredImage) -> PathBuf {
        self.media_root.join(&image.file)
    }

    fn row_to_image(row: &Row<'_>) -> rusqlite::Result<StoredImage> {
        let created_at: String = row.get(7)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
        let file_size: i64 = row.get(6)?;

        Ok(StoredImage {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            file: row.get(3)?,
            width: row.get(4)?,
            height: row.get(5)?,
            file_size: file_size as u64,
            created_at,
        })
    }
}

impl ImageStore for SqliteImageStore {
    fn create(&mut self, image: &ImageDescriptor) -> Result<i64, StoreError> {
        let parts = committable(image)?;

        let dir = self.media_root.join(ORIGINALS_DIR);
        fs::create_dir_all(&dir)?;

        let name = available_name(&parts.file.filename, |candidate| dir.join(candidate).exists());
        let path = dir.join(&name);
        fs::write(&path, &parts.file.content)?;

        let relative = format!("{ORIGINALS_DIR}/{name}");
        let inserted = self.conn.execute(
            "INSERT INTO images (title, description, file, width, height, file_size, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                image.title,
                image.description,
                relative,
                parts.width,
                parts.height,
                parts.file.content.len() as i64,
                Utc::now().to_rfc3339(),
            ],
        );

        if let Err(e) = inserted {
            // Keep the media directory in step with the table.
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        let id = self.conn.last_insert_rowid();
        log::debug!("Stored image {} as {} ({} bytes)", id, relative, parts.file.content.len());
        Ok(id)
    }

    fn exists(&self, title: &str) -> Result<bool, StoreError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM images WHERE title = ?1)",
            params![title],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn delete_all(&mut self) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;

        let files: Vec<String> = {
            let mut stmt = tx.prepare("SELECT file FROM images")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<_>>()?
        };
        let deleted = tx.execute("DELETE FROM images", [])?;
        tx.commit()?;

        // Rows are gone at this point; a leftover file must not hide the count.
        for file in files {
            let path = self.media_root.join(&file);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Cannot remove {}: {}", path.display(), e),
            }
        }

        Ok(deleted)
    }

    fn all(&self) -> Result<Vec<StoredImage>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, file, width, height, file_size, created_at
             FROM images ORDER BY id",
        )?;
        let rows = stmt.query_map([], Self::row_to_image)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}
