use thiserror::Error;

/// Per-file failure. Every variant is non-fatal to the batch: the runner
/// records it and moves on to the next file.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("could not process image: {0}")]
    Image(#[from] image::ImageError),

    #[error("could not read TIFF: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("unsupported input: {0}")]
    Unsupported(String),

    #[error("{0} encoding failed: {1}")]
    Encode(&'static str, String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
