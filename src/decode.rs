//! Reading pixel dimensions from downloaded image bytes.

use crate::error::ImportError;
use image::ImageReader;
use std::io::Cursor;

/// Reads pixel dimensions from encoded image bytes.
pub trait Decoder {
    /// Return `(width, height)` of the encoded image.
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), ImportError>;
}

/// [`Decoder`] backed by the `image` crate.
///
/// The format is guessed from the content, not the URL, and only the header
/// is read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl ImageDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for ImageDecoder {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), ImportError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImportError::Decode(e.to_string()))?;

        if reader.format().is_none() {
            return Err(ImportError::Decode("unrecognized image format".into()));
        }

        reader
            .into_dimensions()
            .map_err(|e| ImportError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::new(width, height);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_png_dimensions() {
        let bytes = encode(7, 3, ImageFormat::Png);
        assert_eq!(ImageDecoder::new().dimensions(&bytes).unwrap(), (7, 3));
    }

    #[test]
    fn test_jpeg_dimensions() {
        let bytes = encode(5, 9, ImageFormat::Jpeg);
        assert_eq!(ImageDecoder::new().dimensions(&bytes).unwrap(), (5, 9));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = ImageDecoder::new().dimensions(b"<html>not an image</html>");
        assert!(matches!(result, Err(ImportError::Decode(_))));
    }
}
