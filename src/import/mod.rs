//! The import pipeline.
//!
//! # Example
//!
//! ```no_run
//! use wpimport::import::{Importer, ImportOptions, NoopObserver};
//! use wpimport::{ImageDecoder, MemoryImageStore, ReqwestClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = MemoryImageStore::new();
//!     let client = ReqwestClient::new()?;
//!     let decoder = ImageDecoder::new();
//!
//!     let summary = Importer::new(&mut store, &client, &decoder)
//!         .with_options(ImportOptions::new().with_debug(true))
//!         .run_file("export.xml", &mut NoopObserver)?;
//!     println!("imported {}", summary.imported);
//!     Ok(())
//! }
//! ```

mod options;
mod report;

pub use options::ImportOptions;
pub use report::{
    DebugBlock, ImportObserver, ImportOutcome, ImportSummary, ItemReport, NoopObserver,
};

use crate::decode::Decoder;
use crate::detect::{filename_from_url, is_image_url};
use crate::error::{ImportError, Result};
use crate::fetch::{download, HttpClient};
use crate::model::{Attachment, ImageDescriptor};
use crate::parser::WxrDocument;
use crate::store::ImageStore;
use std::path::Path;

/// Runs the import pipeline against an image store.
pub struct Importer<'a> {
    store: &'a mut dyn ImageStore,
    client: &'a dyn HttpClient,
    decoder: &'a dyn Decoder,
    options: ImportOptions,
}

/// Where an attachment stands before any network traffic.
enum Gate<'a> {
    Skip(ImportOutcome),
    Fetch {
        url: &'a str,
        title: String,
        description: String,
    },
}

impl<'a> Importer<'a> {
    /// Create an importer with default options.
    pub fn new(
        store: &'a mut dyn ImageStore,
        client: &'a dyn HttpClient,
        decoder: &'a dyn Decoder,
    ) -> Self {
        Self {
            store,
            client,
            decoder,
            options: ImportOptions::default(),
        }
    }

    /// Set import options.
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Delete every image in the store, returning how many were removed.
    pub fn purge(&mut self) -> Result<usize> {
        let deleted = self.store.delete_all()?;
        log::info!("Deleted {} existing images", deleted);
        Ok(deleted)
    }

    /// Purge if requested, then load, parse and import an export file.
    ///
    /// Missing files and unparseable XML are fatal. Failures of single
    /// attachments are reported through the observer and do not stop the run.
    pub fn run_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        observer: &mut dyn ImportObserver,
    ) -> Result<ImportSummary> {
        let deleted = if self.options.purge {
            let deleted = self.purge()?;
            observer.on_purge(deleted);
            deleted
        } else {
            0
        };

        let document = WxrDocument::open(path)?;
        let mut summary = self.import_document(&document, observer)?;
        summary.deleted = deleted;
        Ok(summary)
    }

    /// Import every attachment of a parsed document, in document order.
    pub fn import_document(
        &mut self,
        document: &WxrDocument,
        observer: &mut dyn ImportObserver,
    ) -> Result<ImportSummary> {
        let attachments = document.attachments();
        let mut summary = ImportSummary::new();
        summary.total = attachments.len();
        observer.on_start(summary.total);

        for (index, attachment) in attachments.iter().enumerate() {
            let url = attachment.url();
            let result = self.import_attachment(attachment, observer)?;

            match &result {
                Err(e) => log::warn!("Failed to import {}: {}", url.unwrap_or_default(), e),
                Ok(outcome) => log::debug!("{:?}: {:?}", url, outcome),
            }

            summary.record(&result);
            observer.on_item(&ItemReport {
                index,
                url: url.map(str::to_string),
                result,
            });
        }

        log::info!(
            "Imported {} of {} attachments ({} skipped, {} failed)",
            summary.imported,
            summary.total,
            summary.skipped(),
            summary.failed
        );
        observer.on_finish(&summary);
        Ok(summary)
    }

    /// Handle one attachment.
    ///
    /// The outer `Result` carries fatal store errors from the duplicate
    /// check; the inner one is the per-item result.
    pub fn import_attachment(
        &mut self,
        attachment: &Attachment<'_>,
        observer: &mut dyn ImportObserver,
    ) -> Result<std::result::Result<ImportOutcome, ImportError>> {
        match self.gate(attachment, observer)? {
            Gate::Skip(outcome) => Ok(Ok(outcome)),
            Gate::Fetch {
                url,
                title,
                description,
            } => Ok(self.fetch_and_persist(url, title, description)),
        }
    }

    fn gate<'d>(
        &self,
        attachment: &Attachment<'d>,
        observer: &mut dyn ImportObserver,
    ) -> Result<Gate<'d>> {
        let url = match attachment.url() {
            Some(url) => url,
            None => return Ok(Gate::Skip(ImportOutcome::SkippedNoUrl)),
        };
        if !is_image_url(url) {
            return Ok(Gate::Skip(ImportOutcome::SkippedNotImage));
        }

        if self.options.debug {
            observer.on_debug(&DebugBlock::from_attachment(attachment, url));
        }

        let title = attachment.title(url);
        if self.store.exists(&title)? {
            return Ok(Gate::Skip(ImportOutcome::SkippedExisting { title }));
        }

        Ok(Gate::Fetch {
            url,
            title,
            description: attachment.alt_text(),
        })
    }

    /// Download, measure and commit one image.
    pub fn fetch_and_persist(
        &mut self,
        url: &str,
        title: String,
        description: String,
    ) -> std::result::Result<ImportOutcome, ImportError> {
        let content = download(self.client, url, &self.options.user_agent)?;
        let filename = filename_from_url(url)?;
        let (width, height) = self.decoder.dimensions(&content)?;

        let image = ImageDescriptor::new(title, description, url)
            .with_file(filename, content)
            .with_dimensions(width, height);
        let id = self.store.create(&image)?;

        Ok(ImportOutcome::Imported {
            id,
            title: image.title,
        })
    }
}
