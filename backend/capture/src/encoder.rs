use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};

use textcam_core::{CaptureError, CapturedImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StillFormat {
    Png,
    Jpeg { quality: u8 },
}

/// Encodes sampled frames into stills.
#[derive(Debug, Clone, Copy)]
pub struct StillEncoder {
    pub format: StillFormat,
}

impl Default for StillEncoder {
    fn default() -> Self {
        Self {
            format: StillFormat::Png,
        }
    }
}

impl StillEncoder {
    pub fn new(format: StillFormat) -> Self {
        Self { format }
    }

    pub fn encode(&self, frame: &RgbaImage) -> Result<CapturedImage, CaptureError> {
        let mut buf = Cursor::new(Vec::new());
        let image = DynamicImage::ImageRgba8(frame.clone());

        let (mime, written) = match self.format {
            StillFormat::Png => ("image/png", image.write_with_encoder(PngEncoder::new(&mut buf))),
            // JPEG has no alpha channel.
            StillFormat::Jpeg { quality } => (
                "image/jpeg",
                DynamicImage::ImageRgb8(image.to_rgb8())
                    .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))),
            ),
        };
        written.map_err(|e| CaptureError::Device(format!("encoding still: {e}")))?;

        Ok(CapturedImage::new(mime, buf.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_keeps_native_resolution() {
        let frame = RgbaImage::from_pixel(64, 48, Rgba([10, 20, 30, 255]));
        let still = StillEncoder::default().encode(&frame).unwrap();

        assert_eq!(still.mime, "image/png");
        let decoded = image::load_from_memory(&still.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn test_jpeg_encoding() {
        let frame = RgbaImage::from_pixel(16, 16, Rgba([200, 0, 0, 255]));
        let still = StillEncoder::new(StillFormat::Jpeg { quality: 85 }).encode(&frame).unwrap();
        assert_eq!(still.mime, "image/jpeg");
        assert_eq!(&still.bytes[..2], &[0xFF, 0xD8]);
    }
}
