//! Pipeline orchestration module
//!
//! Each pipeline wires a reader and a writer around one flow: dataset
//! augmentation or Gabor feature extraction.

mod augmentation;
mod gabor_features;


pub use augmentation::{AugmentationPipeline, AugmentationReport};
pub use gabor_features::{GaborFeature, GaborFeaturePipeline, GaborReport};
