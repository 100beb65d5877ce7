//! Augmentation data types

use image::RgbImage;
use serde::Serialize;

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Flip axis, numbered the way the generator draws it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipCode {
    /// Code 0: rows reversed (mirror around the horizontal axis)
    Vertical,
    /// Code 1: columns reversed (mirror around the vertical axis)
    Horizontal,
}

impl FlipCode {
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(FlipCode::Vertical),
            1 => Ok(FlipCode::Horizontal),
            other => Err(PipelineError::InvalidConfig(format!("flip code {other}"))),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            FlipCode::Vertical => 0,
            FlipCode::Horizontal => 1,
        }
    }
}

/// A transform together with the parameters it was run with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Counter-clockwise rotation about the image centre
    Rotate { angle_degrees: f64 },
    Flip { code: FlipCode },
    /// `out = alpha * in + beta`, saturated
    BrightnessContrast { alpha: f64, beta: i32 },
    /// `sigma` is `None` when the fixed binomial weights for sizes up to 7
    /// were used
    GaussianBlur { kernel_size: usize, sigma: Option<f64> },
    Sharpen,
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Rotate { .. } => "rotate",
            Transform::Flip { .. } => "flip",
            Transform::BrightnessContrast { .. } => "brightness_contrast",
            Transform::GaussianBlur { .. } => "gaussian_blur",
            Transform::Sharpen => "sharpen",
        }
    }
}

/// One generator output
#[derive(Debug, Clone)]
pub struct Augmented {
    pub image: RgbImage,
    pub transform: Transform,
}

/// Where an augmented image came from
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentationRecord {
    /// Flat position across all repetitions, as used in the file name
    pub index: usize,
    pub repetition: usize,
    /// Position within the five-step sequence
    pub step: usize,
    pub file_name: String,
    pub transform: Transform,
}

impl AugmentationRecord {
    pub fn file_name_for(index: usize) -> String {
        format!("_aug{index}.png")
    }

    /// Whether `name` has the `_aug<i>.png` shape of a generated output.
    pub fn is_generated_name(name: &str) -> bool {
        name.strip_prefix("_aug")
            .and_then(|rest| rest.strip_suffix(".png"))
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// Flat CSV form of an [`AugmentationRecord`]; unused parameters stay empty.
#[derive(Debug, Serialize)]
pub struct AugmentationRow<'a> {
    pub index: usize,
    pub file: &'a str,
    pub repetition: usize,
    pub step: usize,
    pub transform: &'static str,
    pub angle_degrees: Option<f64>,
    pub flip_code: Option<u8>,
    pub alpha: Option<f64>,
    pub beta: Option<i32>,
    pub kernel_size: Option<usize>,
    pub sigma: Option<f64>,
}

impl<'a> From<&'a AugmentationRecord> for AugmentationRow<'a> {
    fn from(record: &'a AugmentationRecord) -> Self {
        let mut row = AugmentationRow {
            index: record.index,
            file: &record.file_name,
            repetition: record.repetition,
            step: record.step,
            transform: record.transform.name(),
            angle_degrees: None,
            flip_code: None,
            alpha: None,
            beta: None,
            kernel_size: None,
            sigma: None,
        };
        match record.transform {
            Transform::Rotate { angle_degrees } => row.angle_degrees = Some(angle_degrees),
            Transform::Flip { code } => row.flip_code = Some(code.code()),
            Transform::BrightnessContrast { alpha, beta } => {
                row.alpha = Some(alpha);
                row.beta = Some(beta);
            }
            Transform::GaussianBlur { kernel_size, sigma } => {
                row.kernel_size = Some(kernel_size);
                row.sigma = sigma;
            }
            Transform::Sharpen => {}
        }
        row
    }
}
