//! Augmentation module
//!
//! Label-preserving transforms and the randomized five-step generator that
//! drives them.

mod generator;
pub mod transforms;
pub mod types;

pub use generator::{AugmentationGenerator, STEPS_PER_REPETITION};
pub use transforms::{
    brightness_contrast, ensure_non_empty, flip, gaussian_blur, gaussian_blur_with_sigma, rotate,
    sharpen,
};
pub use types::{AugmentationRecord, AugmentationRow, Augmented, FlipCode, Transform};
