use std::io::Write;

use image::RgbImage;

use crate::image_pipeline::common::error::Result;

pub trait ImageWriter {
    fn write_image(&self, image: &RgbImage, output: &mut dyn Write) -> Result<()>;
}
