//! Model types for WordPress exports and the images derived from them.
//!
//! The element tree is produced by the parser; attachments are borrowed
//! views over `<item>` elements; descriptors carry everything the image
//! store needs to commit one image.

mod attachment;
mod descriptor;
mod element;

pub use attachment::{
    derive_alt_text, derive_title, title_case, Attachment, PostMeta, ALT_TEXT_META_KEY,
    CONTENT_NS, EXCERPT_NS, FALLBACK_TITLE_PREFIX, WP_NS,
};
pub use descriptor::{ImageDescriptor, StagedFile};
pub use element::{Descendants, Element};
