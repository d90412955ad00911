//! # PNG Embedding
//!
//! Validates and decodes PNG payloads for placement on a page. Pixels are
//! decoded to RGB with a separate alpha channel, which the PDF serializer
//! writes as an SMask.

use crate::error::{Result, TableError};
use std::io::Cursor;
use std::sync::Arc;

/// The eight bytes every PNG file starts with.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Decoded pixel data.
#[derive(Debug)]
pub struct DecodedImage {
    pub width_px: u32,
    pub height_px: u32,
    /// width * height * 3 bytes (RGB)
    pub rgb: Vec<u8>,
    /// width * height bytes (grayscale alpha). None if fully opaque.
    pub alpha: Option<Vec<u8>>,
}

/// An image embedded in a document. Clones share the pixel data.
#[derive(Debug, Clone)]
pub struct Image {
    inner: Arc<DecodedImage>,
}

impl Image {
    pub fn width_px(&self) -> u32 {
        self.inner.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.inner.height_px
    }

    pub fn pixels(&self) -> &DecodedImage {
        &self.inner
    }

    pub fn same_image(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Check the length and signature of a PNG payload without decoding it.
pub fn validate_png(data: &[u8]) -> Result<()> {
    if data.is_empty() {
        return Err(TableError::InvalidImageData("image data is empty".to_string()));
    }
    if data.len() < PNG_SIGNATURE.len() {
        return Err(TableError::InvalidImageData(format!(
            "image data is too short ({} bytes)",
            data.len()
        )));
    }
    if data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(TableError::InvalidImageData(
            "missing PNG signature".to_string(),
        ));
    }
    Ok(())
}

/// Validate and decode a PNG payload.
pub fn decode_png(data: &[u8]) -> Result<Image> {
    validate_png(data)?;

    let img = ::image::io::Reader::with_format(Cursor::new(data), ::image::ImageFormat::Png)
        .decode()
        .map_err(|e| TableError::InvalidImageData(format!("failed to decode PNG: {}", e)))?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();

    let pixel_count = pixel_count(width, height)?;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
        if pixel[3] != 255 {
            has_transparency = true;
        }
    }

    Ok(Image {
        inner: Arc::new(DecodedImage {
            width_px: width,
            height_px: height,
            rgb,
            alpha: has_transparency.then_some(alpha),
        }),
    })
}

/// Number of pixels in a `width` x `height` image. Fails when the RGB
/// buffer for it would not be addressable.
fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|count| count.checked_mul(3).is_some())
        .ok_or_else(|| {
            TableError::InvalidImageData(format!("image dimensions {}x{} overflow", width, height))
        })
}

#[cfg(test)]
pub(crate) fn encode_test_png(rgba: [u8; 4], width: u32, height: u32) -> Vec<u8> {
    let img = ::image::RgbaImage::from_pixel(width, height, ::image::Rgba(rgba));
    let mut buf = Vec::new();
    let encoder = ::image::codecs::png::PngEncoder::new(&mut buf);
    ::image::ImageEncoder::write_image(encoder, img.as_raw(), width, height, ::image::ColorType::Rgba8)
        .unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_dimensions_are_invalid() {
        assert_eq!(pixel_count(640, 480).unwrap(), 307_200);
        assert!(matches!(
            pixel_count(u32::MAX, u32::MAX),
            Err(TableError::InvalidImageData(_))
        ));
    }

    #[test]
    fn rejects_empty_and_short() {
        assert!(matches!(validate_png(&[]), Err(TableError::InvalidImageData(_))));
        assert!(matches!(
            validate_png(&[137, 80, 78]),
            Err(TableError::InvalidImageData(_))
        ));
    }

    #[test]
    fn rejects_wrong_signature() {
        let jpeg_ish = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(decode_png(&jpeg_ish), Err(TableError::InvalidImageData(_))));
    }

    #[test]
    fn rejects_signature_with_garbage_body() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(b"definitely not chunks");
        assert!(matches!(decode_png(&data), Err(TableError::InvalidImageData(_))));
    }

    #[test]
    fn decodes_opaque_png() {
        let png = encode_test_png([255, 0, 0, 255], 2, 1);
        let image = decode_png(&png).unwrap();
        assert_eq!((image.width_px(), image.height_px()), (2, 1));
        assert_eq!(image.pixels().rgb, vec![255, 0, 0, 255, 0, 0]);
        assert!(image.pixels().alpha.is_none());
    }

    #[test]
    fn keeps_alpha_channel() {
        let png = encode_test_png([0, 0, 255, 128], 1, 1);
        let image = decode_png(&png).unwrap();
        assert_eq!(image.pixels().alpha.as_deref(), Some(&[128u8][..]));
    }
}
