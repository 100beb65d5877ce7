//! Gabor feature extraction
//!
//! Computes an oriented-texture response image: the input is correlated with
//! a bank of Gabor kernels at evenly spaced orientations and the responses are
//! merged by per-pixel maximum.

use std::f64::consts::PI;

use image::{Rgb32FImage, RgbImage};
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::filter::{Kernel, filter2d, gabor_kernel, to_float, to_rgb8};

/// Gabor filter bank parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GaborParams {
    /// Kernel side length (odd)
    pub ksize: usize,
    /// Standard deviation of the Gaussian envelope
    pub sigma: f64,
    /// Spatial aspect ratio
    pub gamma: f64,
    /// Wavelength of the sinusoidal carrier
    pub lambda: f64,
    /// Phase offset
    pub psi: f64,
    /// Orientations are `i * PI / orientations` for `i in 0..orientations`
    pub orientations: usize,
}

impl Default for GaborParams {
    fn default() -> Self {
        Self {
            ksize: 21,
            sigma: 5.0,
            gamma: 0.5,
            lambda: 10.0,
            psi: 0.0,
            orientations: 4,
        }
    }
}

pub struct GaborExtractor {
    params: GaborParams,
    bank: Vec<Kernel>,
}

impl GaborExtractor {
    pub fn new(params: GaborParams) -> Result<Self> {
        if params.orientations == 0 {
            return Err(PipelineError::InvalidConfig(
                "gabor bank needs at least one orientation".to_string(),
            ));
        }
        if params.gamma == 0.0 || params.lambda == 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "gabor gamma={} lambda={}",
                params.gamma, params.lambda
            )));
        }

        let bank = (0..params.orientations)
            .map(|i| {
                let theta = i as f64 * PI / params.orientations as f64;
                gabor_kernel(params.ksize, params.sigma, theta, params.lambda, params.gamma, params.psi)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(kernels = bank.len(), ksize = params.ksize, "Gabor bank built");
        Ok(Self { params, bank })
    }

    pub fn params(&self) -> &GaborParams {
        &self.params
    }

    pub fn kernels(&self) -> &[Kernel] {
        &self.bank
    }

    /// Max-combined Gabor response of `image`, per channel, as 8-bit.
    ///
    /// The combination starts from zero, so negative responses end up black.
    pub fn extract(&self, image: &RgbImage) -> Result<RgbImage> {
        let input = to_float(image)?;
        let mut combined = Rgb32FImage::new(input.width(), input.height());

        for kernel in &self.bank {
            let response = filter2d(&input, kernel)?;
            for (acc, &v) in combined.iter_mut().zip(response.iter()) {
                *acc = acc.max(v);
            }
        }

        Ok(to_rgb8(&combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_default_bank_orientations() {
        let extractor = GaborExtractor::new(GaborParams::default()).unwrap();
        assert_eq!(extractor.kernels().len(), 4);
        for k in extractor.kernels() {
            assert_eq!((k.width(), k.height()), (21, 21));
        }
    }

    #[test]
    fn test_black_image_stays_black() {
        let extractor = GaborExtractor::new(GaborParams::default()).unwrap();
        let out = extractor.extract(&RgbImage::new(32, 32)).unwrap();
        assert_eq!(out.dimensions(), (32, 32));
        assert!(out.as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_flat_image_response_matches_kernel_sum() {
        let extractor = GaborExtractor::new(GaborParams::default()).unwrap();
        let img = RgbImage::from_pixel(32, 32, Rgb([1, 1, 1]));
        let out = extractor.extract(&img).unwrap();

        // A flat image correlated with any kernel gives value * kernel sum
        let best = extractor
            .kernels()
            .iter()
            .map(|k| k.sum())
            .fold(0.0f32, f32::max);
        let expected = best.round_ties_even().clamp(0.0, 255.0) as u8;
        assert!(out.as_raw().iter().all(|&v| v == expected));
    }

    #[test]
    fn test_vertical_stripes_respond() {
        let extractor = GaborExtractor::new(GaborParams::default()).unwrap();
        // period 10 matches the carrier wavelength
        let img = RgbImage::from_fn(32, 32, |x, _| {
            let v = if (x / 5) % 2 == 0 { 200 } else { 20 };
            Rgb([v, v, v])
        });
        let out = extractor.extract(&img).unwrap();
        assert!(out.as_raw().iter().any(|&v| v > 0));
    }

    #[test]
    fn test_zero_orientations_rejected() {
        let params = GaborParams {
            orientations: 0,
            ..Default::default()
        };
        assert!(matches!(GaborExtractor::new(params), Err(PipelineError::InvalidConfig(_))));
    }
}
