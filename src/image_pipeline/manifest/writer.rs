use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::{info, instrument};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::manifest::types::ManifestEntry;

pub const MANIFEST_HEADER: [&str; 2] = ["Path", "Label"];

/// Writes a `Path,Label` CSV, truncating the destination on every run.
///
/// Fields holding commas, quotes or newlines are quoted.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    destination: PathBuf,
}

impl ManifestWriter {
    pub fn new<P: AsRef<Path>>(destination: P) -> Self {
        Self {
            destination: destination.as_ref().to_path_buf(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Pairs `paths[i]` with `labels[i]`; both must have the same length.
    pub fn write_pairs<S: AsRef<str>>(&self, paths: &[S], labels: &[S]) -> Result<usize> {
        if paths.len() != labels.len() {
            return Err(PipelineError::LengthMismatch {
                paths: paths.len(),
                labels: labels.len(),
            });
        }
        let entries: Vec<ManifestEntry> = paths
            .iter()
            .zip(labels)
            .map(|(p, l)| ManifestEntry::new(p.as_ref(), l.as_ref()))
            .collect();
        self.write_entries(&entries)
    }

    #[instrument(skip(self, entries), fields(destination = %self.destination.display(), rows = entries.len()))]
    pub fn write_entries(&self, entries: &[ManifestEntry]) -> Result<usize> {
        let file = File::create(&self.destination).map_err(|e| {
            PipelineError::ManifestWriteError(format!("{}: {}", self.destination.display(), e))
        })?;

        let rows = write_manifest(file, entries).map_err(|e| {
            PipelineError::ManifestWriteError(format!("{}: {}", self.destination.display(), e))
        })?;

        info!(rows, "Manifest written");
        Ok(rows)
    }
}

/// Writes the header and one row per entry, in order, to any sink.
pub fn write_manifest<W: Write>(output: W, entries: &[ManifestEntry]) -> Result<usize> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output);

    wtr.write_record(MANIFEST_HEADER)?;
    for entry in entries {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;

    Ok(entries.len())
}
