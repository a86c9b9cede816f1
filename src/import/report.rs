//! Per-item outcomes, run statistics, and the observer used for progress
//! and debug output.

use crate::error::{Error, ImportError, Result as CrateResult};
use crate::model::{Attachment, WP_NS};
use serde::{Deserialize, Serialize};

/// What happened to one attachment that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A new image was committed.
    Imported {
        /// Store id of the new image
        id: i64,
        /// Derived title
        title: String,
    },
    /// The attachment has no URL.
    SkippedNoUrl,
    /// The URL does not end in an image extension.
    SkippedNotImage,
    /// An image with the same derived title already exists.
    SkippedExisting {
        /// Derived title
        title: String,
    },
}

impl ImportOutcome {
    /// Whether a new image was created.
    pub fn is_imported(&self) -> bool {
        matches!(self, ImportOutcome::Imported { .. })
    }
}

/// Report for one attachment, delivered once per attachment.
#[derive(Debug)]
pub struct ItemReport {
    /// Zero-based position among the attachments
    pub index: usize,

    /// Attachment URL, when present
    pub url: Option<String>,

    /// Outcome or per-item failure
    pub result: Result<ImportOutcome, ImportError>,
}

/// Diagnostic dump of one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugBlock {
    /// Attachment URL
    pub url: String,

    /// `label: value` lines in output order
    pub lines: Vec<String>,
}

impl DebugBlock {
    /// Collect the attachment's fields for display.
    ///
    /// Lines, in order: the URL, unnamespaced children, `wp:` children,
    /// post-meta pairs, content and excerpt. Blank values are omitted.
    pub fn from_attachment(attachment: &Attachment<'_>, url: &str) -> Self {
        let element = attachment.element();
        let mut lines = vec![format!("URL: {url}")];

        for child in element.children.iter().filter(|c| c.is_unqualified()) {
            if let Some(text) = child.trimmed_text() {
                lines.push(format!("{}: {}", child.name, text));
            }
        }

        for child in element.children_in(WP_NS) {
            if let Some(text) = child.trimmed_text() {
                lines.push(format!("wp:{}: {}", child.name, text));
            }
        }

        for meta in attachment.post_meta() {
            if let (Some(key), Some(value)) = (meta.key, meta.value) {
                lines.push(format!("meta - {}: {}", key, value.trim()));
            }
        }

        if let Some(content) = attachment.content() {
            lines.push(format!("content: {content}"));
        }
        if let Some(excerpt) = attachment.excerpt() {
            lines.push(format!("excerpt: {excerpt}"));
        }

        Self {
            url: url.to_string(),
            lines,
        }
    }
}

/// Counters for an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Attachments found in the export
    pub total: usize,

    /// Images deleted by the purge step
    pub deleted: usize,

    /// New images created
    pub imported: usize,

    /// Attachments without a URL
    pub skipped_no_url: usize,

    /// Attachments whose URL is not an image
    pub skipped_not_image: usize,

    /// Attachments whose title already exists
    pub skipped_existing: usize,

    /// Attachments that failed to download, decode or persist
    pub failed: usize,
}

impl ImportSummary {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON for the run statistics.
    pub fn to_json(&self) -> CrateResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Other(format!("JSON serialization error: {}", e)))
    }

    /// Count one item report.
    pub fn record(&mut self, result: &Result<ImportOutcome, ImportError>) {
        match result {
            Ok(ImportOutcome::Imported { .. }) => self.imported += 1,
            Ok(ImportOutcome::SkippedNoUrl) => self.skipped_no_url += 1,
            Ok(ImportOutcome::SkippedNotImage) => self.skipped_not_image += 1,
            Ok(ImportOutcome::SkippedExisting { .. }) => self.skipped_existing += 1,
            Err(_) => self.failed += 1,
        }
    }

    /// Attachments handled so far.
    pub fn processed(&self) -> usize {
        self.imported
            + self.skipped_no_url
            + self.skipped_not_image
            + self.skipped_existing
            + self.failed
    }

    /// All skipped attachments.
    pub fn skipped(&self) -> usize {
        self.skipped_no_url + self.skipped_not_image + self.skipped_existing
    }
}

/// Receives progress and diagnostics during an import.
///
/// `on_item` is called exactly once per attachment and is the progress
/// advance. All methods do nothing by default.
pub trait ImportObserver {
    /// Existing images were purged.
    fn on_purge(&mut self, deleted: usize) {
        let _ = deleted;
    }

    /// The export was parsed and `total` attachments were found.
    fn on_start(&mut self, total: usize) {
        let _ = total;
    }

    /// Debug dump for an attachment, before it is processed.
    fn on_debug(&mut self, block: &DebugBlock) {
        let _ = block;
    }

    /// One attachment was handled.
    fn on_item(&mut self, report: &ItemReport) {
        let _ = report;
    }

    /// The run completed.
    fn on_finish(&mut self, summary: &ImportSummary) {
        let _ = summary;
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ImportObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, CONTENT_NS, EXCERPT_NS};

    fn wp(name: &str, text: &str) -> Element {
        Element::new(Some(WP_NS.into()), name).with_text(text)
    }

    #[test]
    fn test_debug_block_lines() {
        let element = Element::new(None, "item")
            .with_text("\n  ")
            .with_child(Element::new(None, "title").with_text(" beach "))
            .with_child(Element::new(None, "guid").with_text(""))
            .with_child(wp("post_type", "attachment"))
            .with_child(
                Element::new(Some(WP_NS.into()), "postmeta")
                    .with_text("\n")
                    .with_child(wp("meta_key", "_wp_attachment_image_alt"))
                    .with_child(wp("meta_value", " Sand ")),
            )
            .with_child(Element::new(Some(CONTENT_NS.into()), "encoded").with_text(" <p>x</p> "))
            .with_child(Element::new(Some(EXCERPT_NS.into()), "encoded").with_text("  "));
        let attachment = Attachment::new(&element);

        let block = DebugBlock::from_attachment(&attachment, "https://example.com/b.jpg");
        assert_eq!(
            block.lines,
            vec![
                "URL: https://example.com/b.jpg",
                "title: beach",
                "wp:post_type: attachment",
                "meta - _wp_attachment_image_alt: Sand",
                "content: <p>x</p>",
            ]
        );
    }

    #[test]
    fn test_summary_record() {
        let mut summary = ImportSummary::new();
        summary.record(&Ok(ImportOutcome::Imported {
            id: 1,
            title: "A".into(),
        }));
        summary.record(&Ok(ImportOutcome::SkippedNoUrl));
        summary.record(&Ok(ImportOutcome::SkippedNotImage));
        summary.record(&Ok(ImportOutcome::SkippedExisting { title: "B".into() }));
        summary.record(&Err(ImportError::Decode("bad".into())));

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped(), 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed(), 5);
    }

    #[test]
    fn test_summary_to_json() {
        let summary = ImportSummary {
            total: 4,
            imported: 2,
            failed: 1,
            skipped_existing: 1,
            ..Default::default()
        };

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"imported\": 2"));
        assert!(json.contains("\"failed\": 1"));

        let back: ImportSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
