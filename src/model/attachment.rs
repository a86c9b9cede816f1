//! WordPress attachment records and derived metadata.

use super::Element;
use crate::detect::url_hash;

/// WordPress core export namespace.
pub const WP_NS: &str = "http://wordpress.org/export/1.2/";

/// Rich content namespace (`content:encoded`).
pub const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

/// Excerpt namespace (`excerpt:encoded`).
pub const EXCERPT_NS: &str = "http://wordpress.org/export/1.2/excerpt/";

/// Post-meta key holding an attachment's alt text.
pub const ALT_TEXT_META_KEY: &str = "_wp_attachment_image_alt";

/// Prefix of the title used when an attachment has no usable title.
pub const FALLBACK_TITLE_PREFIX: &str = "wp-";

/// A post-meta key/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostMeta<'a> {
    /// Meta key (None when the element is missing or empty)
    pub key: Option<&'a str>,
    /// Meta value (None when the element is missing or empty)
    pub value: Option<&'a str>,
}

/// Borrowed view over an `<item>` element whose post type is `attachment`.
#[derive(Debug, Clone, Copy)]
pub struct Attachment<'a> {
    element: &'a Element,
}

impl<'a> Attachment<'a> {
    /// Wrap an `<item>` element.
    pub fn new(element: &'a Element) -> Self {
        Self { element }
    }

    /// Check whether an element is an attachment item.
    pub fn matches(element: &Element) -> bool {
        element.is(None, "item")
            && element
                .child(Some(WP_NS), "post_type")
                .is_some_and(|t| t.text == "attachment")
    }

    /// The underlying element.
    pub fn element(&self) -> &'a Element {
        self.element
    }

    /// Resource URL from `wp:attachment_url`, None when absent or empty.
    pub fn url(&self) -> Option<&'a str> {
        self.element
            .child(Some(WP_NS), "attachment_url")
            .and_then(Element::text)
    }

    /// Raw `<title>` text, None when absent or empty.
    pub fn raw_title(&self) -> Option<&'a str> {
        self.element.child(None, "title").and_then(Element::text)
    }

    /// All `wp:postmeta` pairs in document order.
    pub fn post_meta(&self) -> impl Iterator<Item = PostMeta<'a>> + 'a {
        self.element
            .children_named(Some(WP_NS), "postmeta")
            .map(|meta| PostMeta {
                key: meta.child(Some(WP_NS), "meta_key").and_then(Element::text),
                value: meta.child(Some(WP_NS), "meta_value").and_then(Element::text),
            })
    }

    /// Trimmed `content:encoded` text.
    pub fn content(&self) -> Option<&'a str> {
        self.element
            .child(Some(CONTENT_NS), "encoded")
            .and_then(Element::trimmed_text)
    }

    /// Trimmed `excerpt:encoded` text.
    pub fn excerpt(&self) -> Option<&'a str> {
        self.element
            .child(Some(EXCERPT_NS), "encoded")
            .and_then(Element::trimmed_text)
    }

    /// Display title derived from the WordPress title, falling back to a
    /// hash of `url`.
    pub fn title(&self, url: &str) -> String {
        derive_title(self.raw_title(), url)
    }

    /// Alt text from post-meta, empty when not set.
    pub fn alt_text(&self) -> String {
        derive_alt_text(self.post_meta())
    }
}

/// Derive a display title.
///
/// Hyphens become spaces, the result is title-cased and trimmed. A missing
/// or empty title becomes `wp-<md5(url)>`. A title that only trims down to
/// nothing stays empty.
pub fn derive_title(raw: Option<&str>, url: &str) -> String {
    match raw.filter(|t| !t.is_empty()) {
        Some(title) => title_case(&title.replace('-', " ")).trim().to_string(),
        None => format!("{}{}", FALLBACK_TITLE_PREFIX, url_hash(url)),
    }
}

/// Title-case a string.
///
/// A cased letter is uppercased when it follows an uncased character (or
/// starts the string) and lowercased otherwise. Digits and punctuation are
/// uncased, so `"it's 2nd"` becomes `"It'S 2Nd"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;

    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }

    out
}

/// Alt text from the first alt-text meta pair carrying a value, trimmed.
pub fn derive_alt_text<'a>(meta: impl IntoIterator<Item = PostMeta<'a>>) -> String {
    meta.into_iter()
        .find(|m| m.key == Some(ALT_TEXT_META_KEY) && m.value.is_some())
        .and_then(|m| m.value)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(name: &str) -> Element {
        Element::new(Some(WP_NS.into()), name)
    }

    fn meta(key: &str, value: &str) -> Element {
        wp("postmeta")
            .with_child(wp("meta_key").with_text(key))
            .with_child(wp("meta_value").with_text(value))
    }

    fn item() -> Element {
        Element::new(None, "item")
            .with_child(Element::new(None, "title").with_text("golden-gate-bridge"))
            .with_child(wp("post_type").with_text("attachment"))
            .with_child(wp("attachment_url").with_text("https://example.com/ggb.jpg"))
            .with_child(meta("_wp_attached_file", "2020/01/ggb.jpg"))
            .with_child(meta(ALT_TEXT_META_KEY, " Sunset over hills "))
    }

    #[test]
    fn test_matches_attachment_items_only() {
        assert!(Attachment::matches(&item()));

        let post = Element::new(None, "item").with_child(wp("post_type").with_text("post"));
        assert!(!Attachment::matches(&post));

        let no_type = Element::new(None, "item");
        assert!(!Attachment::matches(&no_type));
    }

    #[test]
    fn test_attachment_accessors() {
        let element = item();
        let attachment = Attachment::new(&element);
        assert_eq!(attachment.url(), Some("https://example.com/ggb.jpg"));
        assert_eq!(attachment.raw_title(), Some("golden-gate-bridge"));
        assert_eq!(attachment.post_meta().count(), 2);
        assert_eq!(attachment.title("https://example.com/ggb.jpg"), "Golden Gate Bridge");
        assert_eq!(attachment.alt_text(), "Sunset over hills");
        assert_eq!(attachment.content(), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("hello world"), "Hello World");
        assert_eq!(title_case("HELLO wORLD"), "Hello World");
        assert_eq!(title_case("it's 2nd_place"), "It'S 2Nd_Place");
        assert_eq!(title_case("élan vital"), "Élan Vital");
    }

    #[test]
    fn test_derive_title() {
        let url = "https://example.com/a.jpg";
        assert_eq!(derive_title(Some("my-holiday-photo"), url), "My Holiday Photo");
        assert_eq!(derive_title(Some("  -trail-  "), url), "Trail");
        assert_eq!(
            derive_title(None, url),
            format!("wp-{}", crate::detect::url_hash(url))
        );
        assert_eq!(derive_title(Some(""), url), derive_title(None, url));
    }

    #[test]
    fn test_blank_title_is_not_replaced_by_hash() {
        let url = "https://example.com/a.jpg";
        assert_eq!(derive_title(Some(" - "), url), "");
        assert_eq!(derive_title(Some("   "), url), "");
    }

    #[test]
    fn test_derive_title_is_deterministic() {
        let url = "https://example.com/b.png";
        assert_eq!(derive_title(None, url), derive_title(None, url));
        assert_eq!(
            derive_title(Some("a-b-c"), url),
            derive_title(Some("a-b-c"), url)
        );
    }

    #[test]
    fn test_alt_text_missing_is_empty() {
        let pairs = vec![PostMeta {
            key: Some("_wp_attached_file"),
            value: Some("x.jpg"),
        }];
        assert_eq!(derive_alt_text(pairs), "");
        assert_eq!(derive_alt_text(Vec::new()), "");
    }

    #[test]
    fn test_alt_text_skips_empty_values() {
        let pairs = vec![
            PostMeta {
                key: Some(ALT_TEXT_META_KEY),
                value: None,
            },
            PostMeta {
                key: Some(ALT_TEXT_META_KEY),
                value: Some("second"),
            },
        ];
        assert_eq!(derive_alt_text(pairs), "second");
    }
}
