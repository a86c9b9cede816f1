//! Export loading and WXR parsing.

mod sanitize;
mod wxr;

pub use sanitize::{is_xml_char, load_export, sanitize_bytes, sanitize_xml};
pub use wxr::WxrDocument;
