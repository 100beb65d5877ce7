//! Image reader backed by the `image` crate.
//!
//! Any format compiled into `image` is accepted; the result is always
//! converted to 8-bit RGB so downstream transforms see three channels, the
//! same way a colour read would.

use tracing::debug;
use image::RgbImage;
use crate::image_pipeline::common::error::{Result, PipelineError};
use crate::image_pipeline::loader::reader::ImageReader;

pub struct StandardImageReader;

impl ImageReader for StandardImageReader {
    fn read_image(&self, data: &[u8]) -> Result<RgbImage> {
        debug!("Decoding image, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let rgb = decoded.to_rgb8();
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(PipelineError::EmptyImage(format!(
                "decoded {}x{} image",
                rgb.width(),
                rgb.height()
            )));
        }

        debug!("Decoded image: {}x{}", rgb.width(), rgb.height());
        Ok(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    #[test]
    fn test_decodes_png_to_rgb() {
        let img = RgbImage::from_pixel(5, 3, Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();

        let decoded = StandardImageReader.read_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.get_pixel(4, 2), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_rejects_garbage() {
        let result = StandardImageReader.read_image(b"definitely not an image");
        assert!(matches!(result, Err(PipelineError::DecodeError(_))));
    }
}
