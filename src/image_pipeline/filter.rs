//! Linear filtering module
//!
//! Kernel construction (Gaussian, Gabor, sharpen) and reflect-101 correlation
//! on `Rgb32FImage` buffers through `imageproc::filter`.

mod border;
mod correlate;
pub mod kernel;

pub use correlate::{filter2d, sep_filter2d, to_float, to_rgb8};
pub(crate) use correlate::saturate_u8;
pub use kernel::{
    Kernel, gabor_kernel, gaussian_blur_sigma, gaussian_kernel_1d, gaussian_sigma_for,
    sharpen_kernel,
};
