//! In-memory image store.

use super::{available_name, committable, ImageStore, StoredImage, ORIGINALS_DIR};
use crate::error::StoreError;
use crate::model::ImageDescriptor;
use chrono::Utc;
use std::collections::HashMap;

/// Image store kept entirely in memory. Useful for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    images: Vec<StoredImage>,
    contents: HashMap<i64, Vec<u8>>,
    next_id: i64,
}

impl MemoryImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bytes of an image.
    pub fn content(&self, id: i64) -> Option<&[u8]> {
        self.contents.get(&id).map(Vec::as_slice)
    }
}

impl ImageStore for MemoryImageStore {
    fn create(&mut self, image: &ImageDescriptor) -> Result<i64, StoreError> {
        let parts = committable(image)?;

        let name = available_name(&parts.file.filename, |candidate| {
            let path = format!("{ORIGINALS_DIR}/{candidate}");
            self.images.iter().any(|i| i.file == path)
        });

        self.next_id += 1;
        let id = self.next_id;

        self.images.push(StoredImage {
            id,
            title: image.title.clone(),
            description: image.description.clone(),
            file: format!("{ORIGINALS_DIR}/{name}"),
            width: parts.width,
            height: parts.height,
            file_size: parts.file.content.len() as u64,
            created_at: Utc::now(),
        });
        self.contents.insert(id, parts.file.content.clone());

        Ok(id)
    }

    fn exists(&self, title: &str) -> Result<bool, StoreError> {
        Ok(self.images.iter().any(|i| i.title == title))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.images.len())
    }

    fn delete_all(&mut self) -> Result<usize, StoreError> {
        let deleted = self.images.len();
        self.images.clear();
        self.contents.clear();
        Ok(deleted)
    }

    fn all(&self) -> Result<Vec<StoredImage>, StoreError> {
        Ok(self.images.clone())
    }
}
