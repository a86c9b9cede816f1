//! Image store abstraction and backends.
//!
//! The importer only needs four operations from a store: check whether a
//! title exists, commit a new image, count, and delete everything. Titles
//! are not unique at the storage level; the importer checks before it
//! creates.

mod memory;
mod sqlite;

pub use memory::MemoryImageStore;
pub use sqlite::SqliteImageStore;

use crate::error::StoreError;
use crate::model::{ImageDescriptor, StagedFile};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Subdirectory of the media root holding original image files.
pub const ORIGINALS_DIR: &str = "original_images";

/// An image record persisted in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    /// Store-assigned identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// Alt text
    pub description: String,
    /// File path relative to the media root
    pub file: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// File size in bytes
    pub file_size: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Persistence for imported images.
pub trait ImageStore {
    /// Commit a complete descriptor and return the new record's id.
    fn create(&mut self, image: &ImageDescriptor) -> Result<i64, StoreError>;

    /// Whether an image with exactly this title exists.
    fn exists(&self, title: &str) -> Result<bool, StoreError>;

    /// Number of stored images.
    fn count(&self) -> Result<usize, StoreError>;

    /// Delete every image and its file; returns the number deleted.
    fn delete_all(&mut self) -> Result<usize, StoreError>;

    /// All stored images ordered by id.
    fn all(&self) -> Result<Vec<StoredImage>, StoreError>;
}

/// Fields of a descriptor that must be set before commit.
pub(crate) struct Committable<'a> {
    pub file: &'a StagedFile,
    pub width: u32,
    pub height: u32,
}

pub(crate) fn committable(image: &ImageDescriptor) -> Result<Committable<'_>, StoreError> {
    let file = image.file.as_ref().ok_or(StoreError::Incomplete("file"))?;
    let width = image.width.ok_or(StoreError::Incomplete("width"))?;
    let height = image.height.ok_or(StoreError::Incomplete("height"))?;
    Ok(Committable { file, width, height })
}

/// First filename not rejected by `taken`, adding `_1`, `_2`, ... before the
/// extension.
pub(crate) fn available_name(filename: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(filename) {
        return filename.to_string();
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(dot) if dot > 0 => filename.split_at(dot),
        _ => (filename, ""),
    };

    (1..)
        .map(|n| format!("{stem}_{n}{ext}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_name_free() {
        assert_eq!(available_name("a.jpg", |_| false), "a.jpg");
    }

    #[test]
    fn test_available_name_suffixes() {
        let taken = ["a.jpg", "a_1.jpg"];
        assert_eq!(available_name("a.jpg", |n| taken.contains(&n)), "a_2.jpg");
        assert_eq!(available_name("noext", |n| n == "noext"), "noext_1");
        assert_eq!(available_name(".hidden", |n| n == ".hidden"), ".hidden_1");
    }

    #[test]
    fn test_committable_requires_all_parts() {
        let d = ImageDescriptor::new("t", "", "u");
        assert!(matches!(committable(&d), Err(StoreError::Incomplete("file"))));

        let d = d.with_file("a.jpg", vec![0]);
        assert!(matches!(committable(&d), Err(StoreError::Incomplete("width"))));

        let d = d.with_dimensions(1, 2);
        let c = committable(&d).unwrap();
        assert_eq!((c.width, c.height), (1, 2));
    }
}
