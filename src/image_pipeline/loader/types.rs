//! Image loading types

use std::path::PathBuf;

use image::RgbImage;

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Width and height every loaded image is resized to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn square(side: u32) -> Self {
        Self { width: side, height: side }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "target size {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::square(32)
    }
}

/// A successfully decoded and resized image
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// File the image was decoded from
    pub path: PathBuf,
    /// Pixel data, already resized to the target size
    pub image: RgbImage,
}

/// A file the loader could not use
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of loading a whole directory
#[derive(Debug, Default)]
pub struct LoadReport {
    pub images: Vec<LoadedImage>,
    pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}
