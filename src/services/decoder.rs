use image::{DynamicImage, ImageFormat};
use log::{debug, trace};

use crate::error::DecodeError;

/// Formats tried, in order, when no hint is given. Only formats with a
/// magic number are listed: trial-decoding headerless formats such as TGA
/// would happily "succeed" on arbitrary bytes.
pub const DEFAULT_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Ico,
    ImageFormat::Pnm,
];

/// Decodes raw upload bytes by trying each registered format in priority order.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    formats: Vec<ImageFormat>,
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::with_formats(DEFAULT_FORMATS.to_vec())
    }
}

impl ImageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats(formats: Vec<ImageFormat>) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &[ImageFormat] {
        &self.formats
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        for &format in &self.formats {
            match image::load_from_memory_with_format(bytes, format) {
                Ok(image) => {
                    debug!(
                        "Decoded {} bytes as {:?} ({}x{})",
                        bytes.len(),
                        format,
                        image.width(),
                        image.height()
                    );
                    return Ok((image, format));
                }
                Err(e) => trace!("{:?} decoder rejected payload: {}", format, e),
            }
        }

        Err(DecodeError::Unrecognized {
            len: bytes.len(),
            tried: self.format_names(),
        })
    }

    fn format_names(&self) -> String {
        self.formats
            .iter()
            .map(|f| f.extensions_str().first().copied().unwrap_or("?").to_uppercase())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(100, 30, Rgb([255u8, 255, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decodes_png_and_jpeg() {
        let decoder = ImageDecoder::new();

        let (image, format) = decoder.decode(&encode(ImageFormat::Png)).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!((image.width(), image.height()), (100, 30));

        let (_, format) = decoder.decode(&encode(ImageFormat::Jpeg)).unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_empty_payload() {
        let err = ImageDecoder::new().decode(&[]).unwrap_err();
        assert!(matches!(err, DecodeError::Empty));
    }

    #[test]
    fn test_text_bytes_are_rejected_with_one_error() {
        let err = ImageDecoder::new()
            .decode(b"just some plain text, definitely not an image")
            .unwrap_err();

        match err {
            DecodeError::Unrecognized { len, tried } => {
                assert_eq!(len, 45);
                assert!(tried.starts_with("PNG, JPG"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_only_registered_formats_are_tried() {
        let decoder = ImageDecoder::with_formats(vec![ImageFormat::Jpeg]);
        assert!(decoder.decode(&encode(ImageFormat::Png)).is_err());
        assert!(decoder.decode(&encode(ImageFormat::Jpeg)).is_ok());
    }
}
