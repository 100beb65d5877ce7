use image::RgbImage;
use rand::Rng;
use tracing::{debug, instrument};

use crate::image_pipeline::augment::transforms::ensure_non_empty;
use crate::image_pipeline::augment::types::{AugmentationRecord, Augmented, FlipCode, Transform};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::filter::gaussian_blur_sigma;

/// Number of variants one generator call produces.
pub const STEPS_PER_REPETITION: usize = 5;

/// Randomized five-step augmentation: rotate, flip, brightness/contrast,
/// Gaussian blur, sharpen. Every variant is derived from the same input.
///
/// Parameters are drawn from the caller's random source in step order, so a
/// seeded source reproduces the exact same outputs.
#[derive(Debug, Clone)]
pub struct AugmentationGenerator {
    /// Rotation angle is drawn from `[-max, max]` degrees
    pub max_rotation_degrees: f64,
    /// Inclusive range for the contrast gain
    pub alpha_range: (f64, f64),
    /// Inclusive range for the brightness offset
    pub beta_range: (i32, i32),
    /// Inclusive range for `k`; the blur kernel size is `2k + 1`
    pub blur_k_range: (usize, usize),
}

impl Default for AugmentationGenerator {
    fn default() -> Self {
        Self {
            max_rotation_degrees: 30.0,
            alpha_range: (0.8, 1.2),
            beta_range: (-50, 50),
            blur_k_range: (1, 5),
        }
    }
}

impl AugmentationGenerator {
    pub fn validate(&self) -> Result<()> {
        if !self.max_rotation_degrees.is_finite() || self.max_rotation_degrees < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "max rotation {}",
                self.max_rotation_degrees
            )));
        }
        let (lo, hi) = self.alpha_range;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(PipelineError::InvalidConfig(format!("alpha range {:?}", self.alpha_range)));
        }
        if self.beta_range.0 > self.beta_range.1 {
            return Err(PipelineError::InvalidConfig(format!("beta range {:?}", self.beta_range)));
        }
        if self.blur_k_range.0 > self.blur_k_range.1 {
            return Err(PipelineError::InvalidConfig(format!(
                "blur range {:?}",
                self.blur_k_range
            )));
        }
        Ok(())
    }

    /// Runs the five steps once and returns exactly five variants.
    pub fn generate<R: Rng + ?Sized>(&self, image: &RgbImage, rng: &mut R) -> Result<Vec<Augmented>> {
        ensure_non_empty(image)?;
        self.validate()?;

        let max = self.max_rotation_degrees;
        let angle_degrees = rng.random_range(-max..=max);
        let code = FlipCode::from_code(rng.random_range(0..=1u8))?;
        let alpha = rng.random_range(self.alpha_range.0..=self.alpha_range.1);
        let beta = rng.random_range(self.beta_range.0..=self.beta_range.1);
        let kernel_size = 2 * rng.random_range(self.blur_k_range.0..=self.blur_k_range.1) + 1;

        let steps = [
            Transform::Rotate { angle_degrees },
            Transform::Flip { code },
            Transform::BrightnessContrast { alpha, beta },
            Transform::GaussianBlur {
                kernel_size,
                sigma: gaussian_blur_sigma(kernel_size),
            },
            Transform::Sharpen,
        ];

        let mut out = Vec::with_capacity(STEPS_PER_REPETITION);
        for transform in steps {
            out.push(Augmented {
                image: transform.apply(image)?,
                transform,
            });
        }
        Ok(out)
    }

    /// Repeats [`generate`](Self::generate) `repetitions` times, returning
    /// `5 * repetitions` variants with their records in output order.
    #[instrument(skip(self, image, rng))]
    pub fn generate_many<R: Rng + ?Sized>(
        &self,
        image: &RgbImage,
        repetitions: usize,
        rng: &mut R,
    ) -> Result<Vec<(RgbImage, AugmentationRecord)>> {
        let mut all = Vec::with_capacity(repetitions * STEPS_PER_REPETITION);

        for repetition in 0..repetitions {
            for (step, augmented) in self.generate(image, rng)?.into_iter().enumerate() {
                let index = all.len();
                debug!(index, transform = augmented.transform.name(), "Augmentation generated");
                all.push((
                    augmented.image,
                    AugmentationRecord {
                        index,
                        repetition,
                        step,
                        file_name: AugmentationRecord::file_name_for(index),
                        transform: augmented.transform,
                    },
                ));
            }
        }

        Ok(all)
    }
}
