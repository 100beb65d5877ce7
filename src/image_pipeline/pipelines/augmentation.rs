use std::fs::File;
use std::path::{Path, PathBuf};

use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::{
    augment::{AugmentationRecord, AugmentationRow},
    common::error::{PipelineError, Result},
    config::AugmentationConfig,
    loader::{ImageReader, StandardImageReader, enumerate, read_file, resize_to},
    png::{ImageWriter, PngWriter},
};

/// Outcome of one augmentation run
#[derive(Debug, Clone)]
pub struct AugmentationReport {
    /// The representative image that was augmented
    pub source: PathBuf,
    /// Matching files in the input directory, including `source`
    pub candidates: usize,
    /// Seed the random source was built from; replays the run exactly
    pub seed: u64,
    pub outputs: Vec<PathBuf>,
    pub records: Vec<AugmentationRecord>,
    pub record_file: Option<PathBuf>,
}

pub struct AugmentationPipeline<R: ImageReader, W: ImageWriter> {
    reader: R,
    writer: W,
    config: AugmentationConfig,
}

impl AugmentationPipeline<StandardImageReader, PngWriter> {
    pub fn new(config: AugmentationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader: StandardImageReader,
            writer: PngWriter,
            config,
        })
    }
}

impl<R: ImageReader, W: ImageWriter> AugmentationPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: AugmentationConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Decodes and resizes the representative image.
    ///
    /// Any failure here is fatal for the directory: nothing downstream may run
    /// on an image that was not decoded.
    fn load_representative(&self, path: &Path) -> Result<RgbImage> {
        let decoded = {
            let _span = tracing::info_span!("decode", path = %path.display()).entered();
            read_file(&self.reader, path)
        }
        .map_err(|e| {
            PipelineError::EmptyImage(format!("representative image {}: {}", path.display(), e))
        })?;

        let _span = tracing::info_span!("resize",
            width = self.config.target_size.width,
            height = self.config.target_size.height
        ).entered();
        resize_to(&decoded, self.config.target_size)
    }

    fn prepare_output_dir(&self) -> Result<()> {
        let dir = &self.config.output_dir;
        if dir.is_dir() {
            return Ok(());
        }
        if !self.config.create_output_dir {
            return Err(PipelineError::OutputWriteError(format!(
                "{}: output directory does not exist",
                dir.display()
            )));
        }
        std::fs::create_dir_all(dir).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", dir.display(), e))
        })
    }

    /// Writes each image as `<output_dir>/<record.file_name>`.
    pub fn write_outputs(&self, outputs: &[(RgbImage, AugmentationRecord)]) -> Result<Vec<PathBuf>> {
        self.prepare_output_dir()?;

        let mut written = Vec::with_capacity(outputs.len());
        for (image, record) in outputs {
            let path = self.config.output_dir.join(&record.file_name);
            let mut file = File::create(&path).map_err(|e| {
                PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
            })?;
            self.writer.write_image(image, &mut file)?;
            debug!(path = %path.display(), "Augmented image written");
            written.push(path);
        }
        Ok(written)
    }

    fn write_records<'a, I>(&self, records: I) -> Result<Option<PathBuf>>
    where
        I: IntoIterator<Item = &'a AugmentationRecord>,
    {
        let Some(name) = &self.config.record_file else {
            return Ok(None);
        };
        let path = self.config.output_dir.join(name);

        let mut wtr = csv::Writer::from_path(&path).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        for record in records {
            wtr.serialize(AugmentationRow::from(record))?;
        }
        wtr.flush()?;

        Ok(Some(path))
    }

    /// Runs the generator `augmentations_per_image` times on `image` with a
    /// caller-provided random source.
    pub fn augment_image<G: Rng + ?Sized>(
        &self,
        image: &RgbImage,
        rng: &mut G,
    ) -> Result<Vec<(RgbImage, AugmentationRecord)>> {
        let _span = tracing::info_span!("generate").entered();
        self.config
            .generator
            .generate_many(image, self.config.augmentations_per_image, rng)
    }

    /// Augments the first enumerated image of the input directory and writes
    /// the results.
    #[instrument(skip(self), fields(input = %self.config.input_dir.display()))]
    pub fn run(&self) -> Result<AugmentationReport> {
        self.config.validate()?;

        let mut paths = {
            let _span = tracing::info_span!("enumerate").entered();
            enumerate(&self.config.input_dir, &self.config.extensions)?
        };
        // Outputs of an earlier run into the same directory are not sources
        let found = paths.len();
        paths.retain(|p| {
            !p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(AugmentationRecord::is_generated_name)
        });
        if paths.len() < found {
            debug!(excluded = found - paths.len(), "Ignoring previously generated images");
        }
        let Some(source) = paths.first().cloned() else {
            return Err(PipelineError::NoInputImages {
                dir: self.config.input_dir.display().to_string(),
                extensions: self.config.extensions.clone(),
            });
        };
        if paths.len() > 1 {
            warn!(
                candidates = paths.len(),
                source = %source.display(),
                "Only the first image of the directory is augmented"
            );
        }

        let image = self.load_representative(&source)?;

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        info!(seed, repetitions = self.config.augmentations_per_image, "Random source seeded");
        let mut rng = StdRng::seed_from_u64(seed);

        let outputs = self.augment_image(&image, &mut rng)?;

        let (written, record_file) = {
            let _span = tracing::info_span!("write_outputs", count = outputs.len()).entered();
            let written = self.write_outputs(&outputs)?;
            (written, self.write_records(outputs.iter().map(|(_, r)| r))?)
        };

        info!(
            source = %source.display(),
            outputs = written.len(),
            "Augmentation complete"
        );

        Ok(AugmentationReport {
            source,
            candidates: paths.len(),
            seed,
            outputs: written,
            records: outputs.into_iter().map(|(_, r)| r).collect(),
            record_file,
        })
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AugmentationConfig) {
        self.config = config;
    }
}
