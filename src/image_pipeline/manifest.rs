//! Dataset manifest module
//!
//! Writes the `Path,Label` CSV consumed by training.

mod writer;
pub mod types;

pub use types::ManifestEntry;
pub use writer::{ManifestWriter, MANIFEST_HEADER, write_manifest};
