use std::io::Write;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::png::writer::ImageWriter;

pub struct PngWriter;

impl ImageWriter for PngWriter {
    fn write_image(&self, image: &RgbImage, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding PNG image: {}x{}", image.width(), image.height());

        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("PNG encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_png_decodes_back() {
        let img = RgbImage::from_fn(6, 4, |x, y| Rgb([x as u8, y as u8, 200]));
        let mut out = Vec::new();
        PngWriter.write_image(&img, &mut out).unwrap();

        assert_eq!(&out[..8], b"\x89PNG\r\n\x1a\n");
        let back = image::load_from_memory(&out).unwrap().to_rgb8();
        assert_eq!(back, img);
    }
}
