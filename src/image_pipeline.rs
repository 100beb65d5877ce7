//! Image processing pipeline module
//!
//! This module provides a structured approach to dataset preparation, with
//! separate modules for image loading, filtering, augmentation, PNG writing,
//! manifest generation and pipeline orchestration.

pub mod augment;
pub mod common;
pub mod config;
pub mod filter;
pub mod gabor;
pub mod loader;
pub mod manifest;
pub mod pipelines;
pub mod png;

pub use common::{
    PipelineError,
    Result,
};

pub use loader::{
    ImageReader,
    StandardImageReader,
    LoadReport,
    LoadedImage,
    TargetSize,
    load_directory,
};

pub use augment::{
    AugmentationGenerator,
    AugmentationRecord,
    FlipCode,
    Transform,
};

pub use config::{
    AugmentationConfig,
    AugmentationConfigBuilder,
    GaborRunConfig,
};

pub use gabor::{
    GaborExtractor,
    GaborParams,
};

pub use png::{
    ImageWriter,
    PngWriter,
};

pub use manifest::{
    ManifestEntry,
    ManifestWriter,
};

pub use pipelines::{
    AugmentationPipeline,
    AugmentationReport,
    GaborFeaturePipeline,
    GaborReport,
};
