//! Image loading module
//!
//! This module enumerates dataset directories, decodes images and brings them
//! to the canonical training size.

mod reader;
mod standard_reader;
mod directory;
pub mod types;

pub use reader::ImageReader;
pub use standard_reader::StandardImageReader;
pub use directory::{enumerate, load_directory, load_directory_with, resize_to};
pub(crate) use directory::read_file;
pub use types::{LoadReport, LoadedImage, SkippedFile, TargetSize};
