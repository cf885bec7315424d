//! Error types for the watermark-applicator crate.

use std::path::PathBuf;

/// Errors that can occur while preparing or running a watermark batch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No watermark image was found in the watermark directory.
    #[error("no watermark image found in '{}' - add one to the watermark folder", dir.display())]
    WatermarkNotFound {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// The input directory contains no supported image files.
    #[error("no images found in '{}'", dir.display())]
    NoInputFiles {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// Input files were present but every one of them failed to process.
    #[error("none of the {total} files in the input folder could be processed")]
    AllFilesFailed {
        /// Number of input files that were attempted.
        total: usize,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during image processing (load, decode, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// A GIF stream could not be decoded while reading animation metadata.
    #[error("GIF decode error: {0}")]
    GifDecode(#[from] gif::DecodingError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
