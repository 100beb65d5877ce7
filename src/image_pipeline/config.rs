//! Augmentation run configuration

use std::path::PathBuf;

use crate::image_pipeline::augment::AugmentationGenerator;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::gabor::GaborParams;
use crate::image_pipeline::loader::TargetSize;

/// Everything one augmentation run needs, gathered in one place
#[derive(Debug, Clone)]
pub struct AugmentationConfig {
    /// Directory scanned for source images
    pub input_dir: PathBuf,
    /// Directory receiving `_aug<i>.png` files
    pub output_dir: PathBuf,
    /// Accepted file extensions, without the dot
    pub extensions: Vec<String>,
    /// Size the representative image is resized to
    pub target_size: TargetSize,
    /// How many times the five-step generator runs
    pub augmentations_per_image: usize,
    /// Seed for the random source; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Create `output_dir` when missing instead of failing
    pub create_output_dir: bool,
    /// Name of the parameter sidecar written next to the outputs
    pub record_file: Option<String>,
    /// Parameter ranges for the generator
    pub generator: AugmentationGenerator,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./dataset"),
            output_dir: PathBuf::from("./augmented"),
            extensions: vec!["jpg".to_string(), "png".to_string()],
            target_size: TargetSize::default(),
            augmentations_per_image: 5,
            seed: None,
            create_output_dir: false,
            record_file: Some("augmentations.csv".to_string()),
            generator: AugmentationGenerator::default(),
        }
    }
}

impl AugmentationConfig {
    pub fn builder() -> AugmentationConfigBuilder {
        AugmentationConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.iter().all(|e| e.is_empty()) {
            return Err(PipelineError::InvalidConfig("no extensions given".to_string()));
        }
        self.target_size.validate()?;
        if let Some(name) = &self.record_file {
            if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') {
                return Err(PipelineError::InvalidConfig(format!("record file name {name:?}")));
            }
        }
        self.generator.validate()
    }
}

/// Builder for AugmentationConfig
#[derive(Default)]
pub struct AugmentationConfigBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    target_size: Option<TargetSize>,
    augmentations_per_image: Option<usize>,
    seed: Option<Option<u64>>,
    create_output_dir: Option<bool>,
    record_file: Option<Option<String>>,
    generator: Option<AugmentationGenerator>,
}

impl AugmentationConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(
            extensions
                .into_iter()
                .map(|e| {
                    let e: String = e.into();
                    e.trim_start_matches('.').to_string()
                })
                .collect(),
        );
        self
    }

    pub fn target_size(mut self, size: TargetSize) -> Self {
        self.target_size = Some(size);
        self
    }

    pub fn augmentations_per_image(mut self, count: usize) -> Self {
        self.augmentations_per_image = Some(count);
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn create_output_dir(mut self, create: bool) -> Self {
        self.create_output_dir = Some(create);
        self
    }

    pub fn record_file(mut self, name: Option<String>) -> Self {
        self.record_file = Some(name);
        self
    }

    pub fn generator(mut self, generator: AugmentationGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn build(self) -> AugmentationConfig {
        let default = AugmentationConfig::default();
        AugmentationConfig {
            input_dir: self.input_dir.unwrap_or(default.input_dir),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
            extensions: self.extensions.unwrap_or(default.extensions),
            target_size: self.target_size.unwrap_or(default.target_size),
            augmentations_per_image: self
                .augmentations_per_image
                .unwrap_or(default.augmentations_per_image),
            seed: self.seed.unwrap_or(default.seed),
            create_output_dir: self.create_output_dir.unwrap_or(default.create_output_dir),
            record_file: self.record_file.unwrap_or(default.record_file),
            generator: self.generator.unwrap_or(default.generator),
        }
    }
}

/// Settings for a Gabor feature run over a whole directory
#[derive(Debug, Clone)]
pub struct GaborRunConfig {
    pub input_dir: PathBuf,
    /// Responses are only kept in memory when unset
    pub output_dir: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub target_size: TargetSize,
    pub params: GaborParams,
}

impl GaborRunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return Err(PipelineError::InvalidConfig("no extensions given".to_string()));
        }
        self.target_size.validate()
    }
}

impl Default for GaborRunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./dataset"),
            output_dir: None,
            extensions: vec!["jpg".to_string()],
            target_size: TargetSize::default(),
            params: GaborParams::default(),
        }
    }
}
