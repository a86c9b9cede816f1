//! WordPress eXtended RSS (WXR) document parsing.

use crate::error::{Error, Result};
use crate::model::{Attachment, Element};
use crate::parser::sanitize::load_export;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::path::Path;

/// A parsed WXR export.
#[derive(Debug, Clone)]
pub struct WxrDocument {
    root: Element,
}

impl WxrDocument {
    /// Load, sanitize and parse an export file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = load_export(path)?;
        Self::parse(&text)
    }

    /// Parse already sanitized export text.
    pub fn parse(text: &str) -> Result<Self> {
        let root = build_tree(text)?;
        Ok(Self { root })
    }

    /// The document root (usually `<rss>`).
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All attachment items in document order.
    pub fn attachments(&self) -> Vec<Attachment<'_>> {
        self.root
            .descendants()
            .filter(|e| Attachment::matches(e))
            .map(Attachment::new)
            .collect()
    }
}

fn resolve_namespace(ns: ResolveResult<'_>) -> Option<String> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        _ => None,
    }
}

fn open_element(namespace: Option<String>, start: &BytesStart<'_>) -> Element {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    Element::new(namespace, name)
}

/// Build an element tree from XML text, resolving namespace prefixes.
fn build_tree(text: &str) -> Result<Element> {
    let mut reader = NsReader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let namespace = resolve_namespace(ns);

        match event {
            Event::Start(ref e) => {
                if root.is_some() {
                    return Err(Error::XmlParse("junk after document element".into()));
                }
                stack.push(open_element(namespace, e));
            }
            Event::Empty(ref e) => {
                let element = open_element(namespace, e);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(Error::XmlParse("junk after document element".into())),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::XmlParse("unexpected closing tag".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::XmlParse(format!(
            "unexpected end of file: unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| Error::XmlParse("no element found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WP_NS;
    use crate::parser::sanitize::sanitize_bytes;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0"
    xmlns:excerpt="http://wordpress.org/export/1.2/excerpt/"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
    <title>My Blog</title>
    <item>
        <title>hello-world</title>
        <wp:post_type><![CDATA[post]]></wp:post_type>
    </item>
    <item>
        <title>first-image</title>
        <wp:post_type><![CDATA[attachment]]></wp:post_type>
        <wp:attachment_url><![CDATA[https://example.com/first.jpg]]></wp:attachment_url>
    </item>
    <item>
        <title>second &amp; last</title>
        <wp:post_type>attachment</wp:post_type>
        <wp:attachment_url>https://example.com/second.png</wp:attachment_url>
    </item>
</channel>
</rss>"#;

    #[test]
    fn test_selects_attachments_in_order() {
        let doc = WxrDocument::parse(EXPORT).unwrap();
        let attachments = doc.attachments();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].url(), Some("https://example.com/first.jpg"));
        assert_eq!(attachments[1].url(), Some("https://example.com/second.png"));
        assert_eq!(attachments[1].raw_title(), Some("second & last"));
    }

    #[test]
    fn test_namespaces_are_resolved() {
        let doc = WxrDocument::parse(EXPORT).unwrap();
        assert_eq!(doc.root().name, "rss");
        let channel = doc.root().child(None, "channel").unwrap();
        let item = channel.children_named(None, "item").nth(1).unwrap();
        assert!(item.child(Some(WP_NS), "post_type").is_some());
        assert!(item.child(None, "post_type").is_none());
    }

    #[test]
    fn test_prefix_is_not_the_namespace() {
        let xml = r#"<rss xmlns:x="http://wordpress.org/export/1.2/">
            <item><x:post_type>attachment</x:post_type></item></rss>"#;
        let doc = WxrDocument::parse(xml).unwrap();
        assert_eq!(doc.attachments().len(), 1);
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        assert!(matches!(
            WxrDocument::parse("<rss><channel></rss>"),
            Err(Error::XmlParse(_))
        ));
        assert!(matches!(
            WxrDocument::parse("<rss><channel>"),
            Err(Error::XmlParse(_))
        ));
        assert!(matches!(WxrDocument::parse(""), Err(Error::XmlParse(_))));
    }

    #[test]
    fn test_nul_byte_parses_after_sanitizing() {
        let mut raw = EXPORT.as_bytes().to_vec();
        let pos = EXPORT.find("first-image").unwrap() + "first".len();
        raw.insert(pos, 0);

        let text = sanitize_bytes(&raw);
        let doc = WxrDocument::parse(&text).unwrap();
        assert_eq!(doc.attachments()[0].raw_title(), Some("first-image"));
    }
}
