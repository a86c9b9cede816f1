//! Image descriptors handed to the image store.

/// Binary content staged for storage under a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Filename derived from the source URL
    pub filename: String,
    /// Raw image bytes
    pub content: Vec<u8>,
}

/// A new image built from one attachment, ready to commit.
///
/// Built in stages: title and description first, then the file, then the
/// pixel dimensions. The store refuses to commit a descriptor missing the
/// file or the dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Derived display title (also the dedup key)
    pub title: String,

    /// Alt text
    pub description: String,

    /// URL the image was downloaded from
    pub source_url: String,

    /// Staged file content
    pub file: Option<StagedFile>,

    /// Width in pixels
    pub width: Option<u32>,

    /// Height in pixels
    pub height: Option<u32>,
}

impl ImageDescriptor {
    /// Create a descriptor with title and description.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            source_url: source_url.into(),
            file: None,
            width: None,
            height: None,
        }
    }

    /// Stage binary content under a filename.
    pub fn with_file(mut self, filename: impl Into<String>, content: Vec<u8>) -> Self {
        self.file = Some(StagedFile {
            filename: filename.into(),
            content,
        });
        self
    }

    /// Set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Size of the staged content in bytes.
    pub fn size(&self) -> usize {
        self.file.as_ref().map_or(0, |f| f.content.len())
    }

    /// Whether the file and dimensions are both set.
    pub fn is_complete(&self) -> bool {
        self.file.is_some() && self.width.is_some() && self.height.is_some()
    }
}
