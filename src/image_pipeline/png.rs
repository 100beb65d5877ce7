//! PNG writing module
//!
//! This module encodes pipeline outputs to PNG.

mod writer;
mod png_writer;

pub use writer::ImageWriter;
pub use png_writer::PngWriter;
