//! Image detection for attachment URLs.
//!
//! Classification is a plain suffix match on the raw URL string. A URL with a
//! query string or fragment after the extension (`photo.jpg?w=300`) is not
//! recognized.

use md5::{Digest, Md5};
use reqwest::Url;

use crate::error::ImportError;

/// Extensions accepted as images, lowercase with the leading dot.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Check whether a URL points to an image based on its extension.
///
/// # Example
/// ```
/// use wpimport::detect::is_image_url;
///
/// assert!(is_image_url("https://example.com/photo.JPG"));
/// assert!(!is_image_url("https://example.com/doc.pdf"));
/// ```
pub fn is_image_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Lowercase hex MD5 digest of the URL.
pub fn url_hash(url: &str) -> String {
    let digest = Md5::digest(url.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Extract the filename from the path component of a URL.
///
/// The URL is validated, but the name is cut from the string as written, so
/// raw spaces, non-ASCII text and percent escapes all come back unchanged.
pub fn filename_from_url(url: &str) -> Result<String, ImportError> {
    Url::parse(url).map_err(|e| ImportError::InvalidUrl(format!("{url}: {e}")))?;

    let without_suffix = url.split(['?', '#']).next().unwrap_or_default();
    let path = match without_suffix.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |start| &rest[start..]),
        None => without_suffix,
    };
    let name = path.rsplit('/').next().unwrap_or_default();

    if name.is_empty() {
        return Err(ImportError::InvalidUrl(format!("{url}: no filename in path")));
    }

    Ok(name.to_string())
}
