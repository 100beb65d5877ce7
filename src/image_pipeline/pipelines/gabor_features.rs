use std::fs::File;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{info, instrument};

use crate::image_pipeline::{
    common::error::{PipelineError, Result},
    config::GaborRunConfig,
    gabor::GaborExtractor,
    loader::{ImageReader, SkippedFile, StandardImageReader, load_directory_with},
    png::{ImageWriter, PngWriter},
};

#[derive(Debug, Clone)]
pub struct GaborFeature {
    pub source: PathBuf,
    pub response: RgbImage,
    /// Set when the response was written to disk
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct GaborReport {
    pub features: Vec<GaborFeature>,
    pub skipped: Vec<SkippedFile>,
}

impl GaborReport {
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Loads a whole directory and computes one Gabor response per image.
pub struct GaborFeaturePipeline<R: ImageReader, W: ImageWriter> {
    reader: R,
    writer: W,
    extractor: GaborExtractor,
    config: GaborRunConfig,
}

impl GaborFeaturePipeline<StandardImageReader, PngWriter> {
    pub fn new(config: GaborRunConfig) -> Result<Self> {
        Self::with_custom(StandardImageReader, PngWriter, config)
    }
}

impl<R: ImageReader, W: ImageWriter> GaborFeaturePipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: GaborRunConfig) -> Result<Self> {
        config.validate()?;
        let extractor = GaborExtractor::new(config.params.clone())?;
        Ok(Self {
            reader,
            writer,
            extractor,
            config,
        })
    }

    fn write_response(&self, source: &Path, response: &RgbImage) -> Result<Option<PathBuf>> {
        let Some(dir) = &self.config.output_dir else {
            return Ok(None);
        };
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let path = dir.join(format!("{stem}_gabor.png"));

        let mut file = File::create(&path).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        self.writer.write_image(response, &mut file)?;
        Ok(Some(path))
    }

    #[instrument(skip(self), fields(input = %self.config.input_dir.display()))]
    pub fn run(&self) -> Result<GaborReport> {
        let loaded = load_directory_with(
            &self.reader,
            &self.config.input_dir,
            &self.config.extensions,
            self.config.target_size,
        )?;

        if loaded.images.is_empty() && loaded.skipped.is_empty() {
            return Err(PipelineError::NoInputImages {
                dir: self.config.input_dir.display().to_string(),
                extensions: self.config.extensions.clone(),
            });
        }

        if let Some(dir) = &self.config.output_dir {
            std::fs::create_dir_all(dir).map_err(|e| {
                PipelineError::OutputWriteError(format!("{}: {}", dir.display(), e))
            })?;
        }

        let mut report = GaborReport {
            features: Vec::with_capacity(loaded.images.len()),
            skipped: loaded.skipped,
        };

        for loaded_image in loaded.images {
            let response = {
                let _span = tracing::info_span!("gabor", path = %loaded_image.path.display()).entered();
                self.extractor.extract(&loaded_image.image)?
            };
            let output = self.write_response(&loaded_image.path, &response)?;
            report.features.push(GaborFeature {
                source: loaded_image.path,
                response,
                output,
            });
        }

        info!(
            features = report.features.len(),
            skipped = report.skipped.len(),
            "Gabor extraction complete"
        );
        Ok(report)
    }

    pub fn config(&self) -> &GaborRunConfig {
        &self.config
    }
}
