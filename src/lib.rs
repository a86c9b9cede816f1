//! # wpimport
//!
//! Import images from a WordPress eXtended RSS (WXR) export into an image
//! store.
//!
//! The export is read leniently (invalid UTF-8 replaced, illegal XML
//! characters stripped), every `attachment` item with an image URL is
//! downloaded, its pixel dimensions are read, and a new image record is
//! committed unless one with the same derived title already exists.
//!
//! ## Quick Start
//!
//! ```no_run
//! use wpimport::{import_file, ImportOptions, NoopObserver, StoreConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = StoreConfig::from_env().open()?;
//!     let summary = import_file("export.xml", &mut store, ImportOptions::default(), &mut NoopObserver)?;
//!     println!("{} imported, {} failed", summary.imported, summary.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`parser`]: loading, sanitizing and parsing the export
//! - [`model`]: element tree, attachment view, title and alt-text derivation
//! - [`detect`]: image URL classification and URL-derived names
//! - [`fetch`] / [`decode`]: HTTP download and dimension reading behind traits
//! - [`store`]: the [`ImageStore`] trait with SQLite and in-memory backends
//! - [`import`]: the pipeline and its observer hooks

pub mod config;
pub mod decode;
pub mod detect;
pub mod error;
pub mod fetch;
pub mod import;
pub mod model;
pub mod parser;
pub mod store;

// Re-export commonly used types
pub use config::StoreConfig;
pub use decode::{Decoder, ImageDecoder};
pub use detect::{filename_from_url, is_image_url, url_hash, IMAGE_EXTENSIONS};
pub use error::{Error, ImportError, Result, StoreError};
pub use fetch::{HttpClient, HttpResponse, ReqwestClient, DEFAULT_USER_AGENT};
pub use import::{
    DebugBlock, ImportObserver, ImportOptions, ImportOutcome, ImportSummary, Importer,
    ItemReport, NoopObserver,
};
pub use model::{Attachment, Element, ImageDescriptor, PostMeta};
pub use parser::{load_export, sanitize_xml, WxrDocument};
pub use store::{ImageStore, MemoryImageStore, SqliteImageStore, StoredImage};

use std::path::Path;

/// Import an export file with the default HTTP client and decoder.
///
/// # Arguments
///
/// * `path` - Path to the WXR export
/// * `store` - Destination image store
/// * `options` - Purge/debug switches and user agent
/// * `observer` - Receives progress and debug output
pub fn import_file<P: AsRef<Path>>(
    path: P,
    store: &mut dyn ImageStore,
    options: ImportOptions,
    observer: &mut dyn ImportObserver,
) -> Result<ImportSummary> {
    let client = ReqwestClient::new().map_err(|e| Error::Other(e.to_string()))?;
    let decoder = ImageDecoder::new();

    Importer::new(store, &client, &decoder)
        .with_options(options)
        .run_file(path, observer)
}
