use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{DocscanError, Result};

/// Decode uploaded bytes into pixel data, guessing the format from content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(DocscanError::InvalidImage(
            "Uploaded file is empty".to_string(),
        ));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DocscanError::InvalidImage(format!("Failed to read image: {e}")))?;

    if reader.format().is_none() {
        return Err(DocscanError::InvalidImage(
            "Cannot identify image file".to_string(),
        ));
    }

    reader
        .decode()
        .map_err(|e| DocscanError::InvalidImage(format!("Failed to decode image: {e}")))
}

/// Re-encode decoded pixels as PNG for engines that take encoded input.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();

    // PNG has no float sample formats.
    let written = match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        }
        _ => image.write_to(&mut Cursor::new(&mut output), ImageFormat::Png),
    };
    written.map_err(|e| DocscanError::Ocr(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageBuffer, Luma, Rgb};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Luma([200u8]));
        let mut out = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn decodes_png() {
        let img = decode_image(&png_bytes(40, 20)).unwrap();
        assert_eq!(img.dimensions(), (40, 20));
    }

    #[test]
    fn decodes_jpeg() {
        let img = ImageBuffer::from_pixel(16, 16, Rgb([10u8, 20, 30]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .unwrap();

        let decoded = decode_image(&out).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
    }

    #[test]
    fn rejects_empty_input() {
        let err = decode_image(&[]).unwrap_err();
        assert!(matches!(err, DocscanError::InvalidImage(_)));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = decode_image(b"just some text, definitely not pixels").unwrap_err();
        assert!(matches!(err, DocscanError::InvalidImage(_)));
    }

    #[test]
    fn rejects_truncated_png() {
        let bytes = png_bytes(40, 40);
        let err = decode_image(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, DocscanError::InvalidImage(_)));
    }

    #[test]
    fn encode_png_round_trips() {
        let original = decode_image(&png_bytes(12, 8)).unwrap();
        let encoded = encode_png(&original).unwrap();
        let decoded = decode_image(&encoded).unwrap();
        assert_eq!(decoded.dimensions(), (12, 8));
    }
}
