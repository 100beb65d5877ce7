use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input: {0}")]
    InputReadError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Empty image: {0}")]
    EmptyImage(String),

    #[error("No images with extensions {extensions:?} found in {dir}")]
    NoInputImages { dir: String, extensions: Vec<String> },

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode PNG image: {0}")]
    EncodeError(String),

    #[error("Failed to write manifest: {0}")]
    ManifestWriteError(String),

    #[error("Length mismatch: {paths} paths but {labels} labels")]
    LengthMismatch { paths: usize, labels: usize },

    #[error("Invalid kernel: width={0}, height={1}")]
    InvalidKernel(usize, usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PipelineError {
    /// Process exit status for this error, distinct per failure category.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::ManifestWriteError(_) => 3,
            PipelineError::DecodeError(_) | PipelineError::EmptyImage(_) => 4,
            PipelineError::OutputWriteError(_)
            | PipelineError::EncodeError(_)
            | PipelineError::CsvError(_) => 5,
            PipelineError::InputReadError(_) | PipelineError::NoInputImages { .. } => 6,
            PipelineError::LengthMismatch { .. }
            | PipelineError::InvalidKernel(..)
            | PipelineError::InvalidConfig(_) => 7,
            PipelineError::IoError(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
