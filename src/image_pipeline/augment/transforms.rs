//! Single-image augmentation transforms.
//!
//! Every transform borrows its input and returns a new image of the same
//! size; the input is never modified.

use image::imageops;
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

use crate::image_pipeline::augment::types::{FlipCode, Transform};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::filter::{
    filter2d, gaussian_kernel_1d, saturate_u8, sep_filter2d, sharpen_kernel, to_float, to_rgb8,
};

/// Fails with [`PipelineError::EmptyImage`] for a 0-sized image.
pub fn ensure_non_empty(image: &RgbImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::EmptyImage(format!(
            "{}x{} image reached a transform",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

/// Rotates counter-clockwise by `angle_degrees` about the centre, keeping the
/// size. Corners rotated in from outside are black.
pub fn rotate(image: &RgbImage, angle_degrees: f64) -> Result<RgbImage> {
    ensure_non_empty(image)?;
    // rotate_about_center turns clockwise for positive theta
    let theta = -(angle_degrees.to_radians()) as f32;
    Ok(rotate_about_center(
        image,
        theta,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
    ))
}

pub fn flip(image: &RgbImage, code: FlipCode) -> Result<RgbImage> {
    ensure_non_empty(image)?;
    Ok(match code {
        FlipCode::Vertical => imageops::flip_vertical(image),
        FlipCode::Horizontal => imageops::flip_horizontal(image),
    })
}

/// `out = alpha * in + beta` per channel, rounded and clipped to 0..255.
pub fn brightness_contrast(image: &RgbImage, alpha: f64, beta: i32) -> Result<RgbImage> {
    ensure_non_empty(image)?;
    let mut out = image.clone();
    for v in out.iter_mut() {
        *v = saturate_u8((alpha * *v as f64 + beta as f64) as f32);
    }
    Ok(out)
}

/// Gaussian blur with an odd `kernel_size`; sigma is derived from the size.
pub fn gaussian_blur(image: &RgbImage, kernel_size: usize) -> Result<RgbImage> {
    gaussian_blur_with_sigma(image, kernel_size, None)
}

/// Gaussian blur with an explicit sigma, or the derived weights for `None`.
pub fn gaussian_blur_with_sigma(
    image: &RgbImage,
    kernel_size: usize,
    sigma: Option<f64>,
) -> Result<RgbImage> {
    ensure_non_empty(image)?;
    let weights = gaussian_kernel_1d(kernel_size, sigma.unwrap_or(0.0))?;
    let blurred = sep_filter2d(&to_float(image)?, &weights, &weights)?;
    Ok(to_rgb8(&blurred))
}

pub fn sharpen(image: &RgbImage) -> Result<RgbImage> {
    ensure_non_empty(image)?;
    let sharpened = filter2d(&to_float(image)?, &sharpen_kernel())?;
    Ok(to_rgb8(&sharpened))
}

impl Transform {
    /// Runs this transform with its recorded parameters.
    pub fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        match *self {
            Transform::Rotate { angle_degrees } => rotate(image, angle_degrees),
            Transform::Flip { code } => flip(image, code),
            Transform::BrightnessContrast { alpha, beta } => brightness_contrast(image, alpha, beta),
            Transform::GaussianBlur { kernel_size, sigma } => {
                gaussian_blur_with_sigma(image, kernel_size, sigma)
            }
            Transform::Sharpen => sharpen(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> RgbImage {
        RgbImage::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, ((x + y) * 4) as u8]))
    }

    #[test]
    fn test_flip_is_involution() {
        let img = gradient();
        for code in [FlipCode::Vertical, FlipCode::Horizontal] {
            let once = flip(&img, code).unwrap();
            assert_ne!(once, img);
            assert_eq!(flip(&once, code).unwrap(), img);
        }
    }

    #[test]
    fn test_flip_axes() {
        let img = gradient();
        let v = flip(&img, FlipCode::Vertical).unwrap();
        let h = flip(&img, FlipCode::Horizontal).unwrap();
        assert_eq!(v.get_pixel(3, 0), img.get_pixel(3, 31));
        assert_eq!(h.get_pixel(0, 3), img.get_pixel(31, 3));
    }

    #[test]
    fn test_brightness_contrast_identity() {
        let img = gradient();
        assert_eq!(brightness_contrast(&img, 1.0, 0).unwrap(), img);
    }

    #[test]
    fn test_brightness_contrast_clips() {
        let img = RgbImage::from_pixel(2, 2, Rgb([10, 128, 250]));
        let brighter = brightness_contrast(&img, 1.2, 50).unwrap();
        assert_eq!(brighter.get_pixel(0, 0), &Rgb([62, 204, 255]));
        let darker = brightness_contrast(&img, 0.8, -50).unwrap();
        assert_eq!(darker.get_pixel(1, 1), &Rgb([0, 52, 150]));
    }

    #[test]
    fn test_sharpen_and_blur_keep_flat_images() {
        let img = RgbImage::from_pixel(8, 8, Rgb([90, 10, 200]));
        assert_eq!(sharpen(&img).unwrap(), img);
        for k in [3, 5, 7, 9, 11] {
            assert_eq!(gaussian_blur(&img, k).unwrap(), img);
        }
    }

    #[test]
    fn test_blur_smooths_an_impulse() {
        let mut img = RgbImage::new(9, 9);
        img.put_pixel(4, 4, Rgb([255, 255, 255]));
        let out = gaussian_blur(&img, 3).unwrap();
        // 255 * 0.5 * 0.5
        assert_eq!(out.get_pixel(4, 4)[0], 64);
        assert!(out.get_pixel(3, 4)[0] > 0);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_rotate_zero_keeps_image() {
        let img = gradient();
        let out = rotate(&img, 0.0).unwrap();
        assert_eq!(out.dimensions(), img.dimensions());
        assert_eq!(out.get_pixel(16, 16), img.get_pixel(16, 16));
    }

    #[test]
    fn test_rotate_keeps_size() {
        let img = gradient();
        for angle in [-30.0, -12.5, 17.0, 30.0] {
            assert_eq!(rotate(&img, angle).unwrap().dimensions(), (32, 32));
        }
    }

    #[test]
    fn test_empty_image_rejected_before_transform() {
        let empty = RgbImage::new(0, 0);
        assert!(matches!(rotate(&empty, 10.0), Err(PipelineError::EmptyImage(_))));
        assert!(matches!(flip(&empty, FlipCode::Vertical), Err(PipelineError::EmptyImage(_))));
        assert!(matches!(sharpen(&empty), Err(PipelineError::EmptyImage(_))));
    }
}
