//! Filter kernels

use std::f64::consts::PI;

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Dense 2D correlation kernel, anchored at its centre
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Kernel {
    /// Builds a kernel from row-major weights. Both sides must be odd.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || width % 2 == 0 || height % 2 == 0 {
            return Err(PipelineError::InvalidKernel(width, height));
        }
        if data.len() != width * height {
            return Err(PipelineError::InvalidKernel(width, height));
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Borrowed view for `imageproc::filter`.
    pub fn as_imageproc(&self) -> imageproc::filter::Kernel<'_, f32> {
        imageproc::filter::Kernel::new(&self.data, self.width as u32, self.height as u32)
    }
}

/// Fixed binomial weights used for small kernels when no sigma is given.
const SMALL_GAUSSIAN: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Standard deviation derived from an odd kernel size.
pub fn gaussian_sigma_for(ksize: usize) -> f64 {
    0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Sigma a derived blur of size `ksize` is actually built with, or `None`
/// when the fixed binomial table for sizes up to 7 is used instead.
pub fn gaussian_blur_sigma(ksize: usize) -> Option<f64> {
    (ksize > SMALL_GAUSSIAN.len() * 2 - 1).then(|| gaussian_sigma_for(ksize))
}

/// Normalized 1D Gaussian weights of length `ksize`.
///
/// A non-positive `sigma` means "derive from `ksize`"; sizes up to 7 then use
/// the fixed binomial tables.
pub fn gaussian_kernel_1d(ksize: usize, sigma: f64) -> Result<Vec<f32>> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(PipelineError::InvalidKernel(ksize, 1));
    }

    if sigma <= 0.0 && ksize <= 7 {
        return Ok(SMALL_GAUSSIAN[ksize / 2].to_vec());
    }

    let sigma = if sigma > 0.0 { sigma } else { gaussian_sigma_for(ksize) };
    let scale = -0.5 / (sigma * sigma);
    let center = (ksize as f64 - 1.0) * 0.5;

    let weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();

    Ok(weights.into_iter().map(|w| (w / total) as f32).collect())
}

/// Gabor kernel: a cosine carrier of wavelength `lambda` along orientation
/// `theta` (radians) under a Gaussian envelope with aspect ratio `gamma`.
pub fn gabor_kernel(
    ksize: usize,
    sigma: f64,
    theta: f64,
    lambda: f64,
    gamma: f64,
    psi: f64,
) -> Result<Kernel> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(PipelineError::InvalidKernel(ksize, ksize));
    }

    let sigma_x = sigma;
    let sigma_y = sigma / gamma;
    let (s, c) = theta.sin_cos();
    let half = (ksize / 2) as i64;
    let ex = -0.5 / (sigma_x * sigma_x);
    let ey = -0.5 / (sigma_y * sigma_y);
    let cscale = 2.0 * PI / lambda;

    let mut data = vec![0.0f32; ksize * ksize];
    for y in -half..=half {
        for x in -half..=half {
            let (xf, yf) = (x as f64, y as f64);
            let xr = xf * c + yf * s;
            let yr = -xf * s + yf * c;
            let v = (ex * xr * xr + ey * yr * yr).exp() * (cscale * xr + psi).cos();
            // stored point-reflected around the centre
            let row = (half - y) as usize;
            let col = (half - x) as usize;
            data[row * ksize + col] = v as f32;
        }
    }

    Kernel::new(ksize, ksize, data)
}

/// 3x3 sharpening kernel: centre 5, four neighbours -1, corners 0.
pub fn sharpen_kernel() -> Kernel {
    Kernel {
        width: 3,
        height: 3,
        data: vec![
            0.0, -1.0, 0.0, //
            -1.0, 5.0, -1.0, //
            0.0, -1.0, 0.0,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_kernels_are_normalized() {
        for ksize in [3, 5, 7, 9, 11] {
            let k = gaussian_kernel_1d(ksize, 0.0).unwrap();
            assert_eq!(k.len(), ksize);
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "ksize {ksize} sums to {sum}");
            for i in 0..ksize / 2 {
                assert!((k[i] - k[ksize - 1 - i]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn test_small_gaussian_uses_binomial_table() {
        assert_eq!(gaussian_kernel_1d(3, 0.0).unwrap(), vec![0.25, 0.5, 0.25]);
    }

    #[test]
    fn test_blur_sigma_only_for_large_kernels() {
        for ksize in [1, 3, 5, 7] {
            assert_eq!(gaussian_blur_sigma(ksize), None);
        }
        assert_eq!(gaussian_blur_sigma(9), Some(gaussian_sigma_for(9)));
        let sigma = gaussian_blur_sigma(11).unwrap();
        assert_eq!(
            gaussian_kernel_1d(11, sigma).unwrap(),
            gaussian_kernel_1d(11, 0.0).unwrap()
        );
    }

    #[test]
    fn test_derived_sigma() {
        assert!((gaussian_sigma_for(3) - 0.8).abs() < 1e-12);
        assert!((gaussian_sigma_for(11) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_sizes_rejected() {
        assert!(gaussian_kernel_1d(4, 0.0).is_err());
        assert!(gabor_kernel(20, 5.0, 0.0, 10.0, 0.5, 0.0).is_err());
        assert!(Kernel::new(3, 3, vec![0.0; 8]).is_err());
    }

    #[test]
    fn test_gabor_peak_and_symmetry() {
        let k = gabor_kernel(21, 5.0, 0.0, 10.0, 0.5, 0.0).unwrap();
        assert_eq!((k.width(), k.height()), (21, 21));
        // cos(0) * exp(0) at the centre
        assert!((k.at(10, 10) - 1.0).abs() < 1e-6);
        for y in 0..21 {
            for x in 0..21 {
                assert!((k.at(x, y) - k.at(20 - x, y)).abs() < 1e-6);
                assert!((k.at(x, y) - k.at(x, 20 - y)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_gabor_orientation_rotates_kernel() {
        let k0 = gabor_kernel(21, 5.0, 0.0, 10.0, 0.5, 0.0).unwrap();
        let k90 = gabor_kernel(21, 5.0, PI / 2.0, 10.0, 0.5, 0.0).unwrap();
        for y in 0..21 {
            for x in 0..21 {
                assert!((k0.at(x, y) - k90.at(y, x)).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_sharpen_kernel_sums_to_one() {
        assert_eq!(sharpen_kernel().sum(), 1.0);
    }
}
