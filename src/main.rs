use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gesture_augment_rs::image_pipeline::{
    AugmentationConfig, AugmentationPipeline, GaborFeaturePipeline, GaborParams, GaborRunConfig,
    ManifestWriter, PipelineError, TargetSize,
};
use gesture_augment_rs::logger::{self, error, info, warn};

/// Exit status when a run finished but some inputs had to be skipped.
const EXIT_PARTIAL: u8 = 2;

/// Dataset preparation for hand-gesture images
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Augment the first image of a directory and write `_aug<i>.png` files
    Augment {
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Must exist unless --create-output-dir is given
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Accepted extensions (repeatable)
        #[arg(long = "ext", default_values_t = ["jpg".to_string(), "png".to_string()])]
        extensions: Vec<String>,

        /// Side of the square the image is resized to
        #[arg(long, default_value_t = 32)]
        size: u32,

        /// How many times the five-step generator runs
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Seed for reproducible output; random when omitted
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        create_output_dir: bool,

        /// Skip writing the augmentations.csv parameter sidecar
        #[arg(long)]
        no_records: bool,
    },

    /// Compute Gabor max-response images for every image of a directory
    Gabor {
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Write `<stem>_gabor.png` files here
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[arg(long = "ext", default_values_t = ["jpg".to_string()])]
        extensions: Vec<String>,

        #[arg(long, default_value_t = 32)]
        size: u32,
    },

    /// Write a Path,Label CSV manifest
    Manifest {
        #[arg(short, long, default_value = "images.csv")]
        output: PathBuf,

        /// Image path (repeatable, paired in order with --label)
        #[arg(long = "path")]
        paths: Vec<String>,

        /// Label (repeatable, paired in order with --path)
        #[arg(long = "label")]
        labels: Vec<String>,
    },
}

/// What a successful run should report to the shell.
enum Outcome {
    Complete,
    Partial,
}

fn run(command: Command) -> Result<Outcome> {
    match command {
        Command::Augment {
            input_dir,
            output_dir,
            extensions,
            size,
            count,
            seed,
            create_output_dir,
            no_records,
        } => {
            let mut builder = AugmentationConfig::builder()
                .input_dir(input_dir)
                .output_dir(output_dir)
                .extensions(extensions)
                .target_size(TargetSize::square(size))
                .augmentations_per_image(count)
                .seed(seed)
                .create_output_dir(create_output_dir);
            if no_records {
                builder = builder.record_file(None);
            }

            let pipeline = AugmentationPipeline::new(builder.build())
                .context("invalid augmentation settings")?;
            let report = pipeline.run().context("augmentation failed")?;

            info!(
                "Wrote {} augmented images from {} (seed {})",
                report.outputs.len(),
                report.source.display(),
                report.seed
            );
            Ok(Outcome::Complete)
        }

        Command::Gabor {
            input_dir,
            output_dir,
            extensions,
            size,
        } => {
            let config = GaborRunConfig {
                input_dir,
                output_dir,
                extensions,
                target_size: TargetSize::square(size),
                params: GaborParams::default(),
            };
            let pipeline = GaborFeaturePipeline::new(config).context("invalid Gabor settings")?;
            let report = pipeline.run().context("Gabor extraction failed")?;

            for skipped in &report.skipped {
                warn!("Skipped {}: {}", skipped.path.display(), skipped.reason);
            }
            info!("Computed {} Gabor responses", report.features.len());

            Ok(if report.is_partial() {
                Outcome::Partial
            } else {
                Outcome::Complete
            })
        }

        Command::Manifest {
            output,
            paths,
            labels,
        } => {
            let writer = ManifestWriter::new(&output);
            let rows = writer
                .write_pairs(&paths, &labels)
                .with_context(|| format!("could not write manifest {}", output.display()))?;

            info!("Manifest {} written with {} rows", output.display(), rows);
            Ok(Outcome::Complete)
        }
    }
}

/// Status for a failed run: the pipeline's own code when the error chain
/// holds a [`PipelineError`], 1 otherwise.
fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<PipelineError>()
        .map(PipelineError::exit_code)
        .unwrap_or(1)
}

fn status_of(result: &Result<Outcome>) -> u8 {
    match result {
        Ok(Outcome::Complete) => 0,
        Ok(Outcome::Partial) => EXIT_PARTIAL,
        Err(e) => exit_code_for(e),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = run(cli.command);
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    ExitCode::from(status_of(&result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_survives_context() {
        let err = anyhow::Error::new(PipelineError::InvalidConfig("target size 0x0".to_string()))
            .context("invalid Gabor settings");
        assert_eq!(exit_code_for(&err), 7);

        let err: anyhow::Error = PipelineError::LengthMismatch { paths: 2, labels: 1 }.into();
        let err = err.context("could not write manifest").context("outer");
        assert_eq!(exit_code_for(&err), 7);
    }

    #[test]
    fn test_foreign_error_is_unexpected() {
        let err = anyhow::anyhow!("something else broke");
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn test_outcome_status() {
        assert_eq!(status_of(&Ok(Outcome::Complete)), 0);
        assert_eq!(status_of(&Ok(Outcome::Partial)), 2);
        let err = anyhow::Error::new(PipelineError::EmptyImage("x".to_string())).context("run");
        assert_eq!(status_of(&Err(err)), 4);
    }

    #[test]
    fn test_gabor_zero_size_exits_with_config_code() {
        let input = tempfile::tempdir().unwrap();
        let result = run(Command::Gabor {
            input_dir: input.path().to_path_buf(),
            output_dir: None,
            extensions: vec!["jpg".to_string()],
            size: 0,
        });
        assert_eq!(status_of(&result), 7);
    }
}
