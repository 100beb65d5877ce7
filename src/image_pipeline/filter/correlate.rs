use image::{Rgb, Rgb32FImage, RgbImage};
use imageproc::filter::separable_filter;
use imageproc::map::map_subpixels;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::filter::border::{crop_padding, pad_reflect101};
use crate::image_pipeline::filter::kernel::Kernel;

/// Rounds half-to-even and saturates to 0..255.
#[inline]
pub(crate) fn saturate_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Widens 8-bit RGB to f32, keeping the 0..255 range.
pub fn to_float(image: &RgbImage) -> Result<Rgb32FImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::EmptyImage(format!(
            "cannot filter a {}x{} image",
            image.width(),
            image.height()
        )));
    }
    Ok(map_subpixels(image, |v| v as f32))
}

pub fn to_rgb8(image: &Rgb32FImage) -> RgbImage {
    map_subpixels(image, saturate_u8)
}

/// Correlates every channel of `image` with `kernel`, anchored at the kernel
/// centre, with a reflect-101 border. No clamping is applied.
pub fn filter2d(image: &Rgb32FImage, kernel: &Kernel) -> Result<Rgb32FImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::EmptyImage("cannot filter a 0-sized image".to_string()));
    }
    let (rx, ry) = (kernel.width() as u32 / 2, kernel.height() as u32 / 2);
    let padded = pad_reflect101(image, rx, ry);
    let filtered = kernel
        .as_imageproc()
        .filter::<Rgb<f32>, _, Rgb<f32>>(&padded, |out, acc| *out = acc);
    Ok(crop_padding(&filtered, rx, ry))
}

/// Separable correlation: `kx` along rows, then `ky` along columns. Both must
/// have odd length.
pub fn sep_filter2d(image: &Rgb32FImage, kx: &[f32], ky: &[f32]) -> Result<Rgb32FImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::EmptyImage("cannot filter a 0-sized image".to_string()));
    }
    if kx.len() % 2 == 0 || ky.len() % 2 == 0 {
        return Err(PipelineError::InvalidKernel(kx.len(), ky.len()));
    }
    let (rx, ry) = (kx.len() as u32 / 2, ky.len() as u32 / 2);
    let padded = pad_reflect101(image, rx, ry);
    Ok(crop_padding(&separable_filter(&padded, kx, ky), rx, ry))
}
