//! Error types for icon generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for icon operations
pub type Result<T> = std::result::Result<T, IconError>;

/// Errors that abort a generator run. Font problems are not here, they fall back instead.
#[derive(Error, Debug)]
pub enum IconError {
    /// Requested a zero-sized icon
    #[error("Invalid icon size: {0}")]
    InvalidSize(u32),

    /// Could not create the output directory
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not encode or write a PNG
    #[error("Failed to save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
