use std::error::Error;
use std::fmt;
use std::io;

use image::ImageError;

/// Error type for grid rendering failures
#[derive(Debug)]
pub enum GridError {
    InvalidGrid(String),
    UnsupportedShape(Vec<usize>),
    NotEnoughImages { needed: usize, available: usize },
    Render(String),
    Io(io::Error),
    Encode(ImageError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::InvalidGrid(msg) => write!(f, "Invalid grid configuration: {}", msg),
            GridError::UnsupportedShape(shape) => write!(
                f,
                "Unsupported image batch shape {:?}; expected (N, H, W), (N, H, W, 1), (N, H, W, 3) or (N, H, W, 4)",
                shape
            ),
            GridError::NotEnoughImages { needed, available } => write!(
                f,
                "Index out of range: grid needs {} images but the batch holds {}",
                needed, available
            ),
            GridError::Render(msg) => write!(f, "Failed to render grid: {}", msg),
            GridError::Io(e) => write!(f, "Failed to write grid: {}", e),
            GridError::Encode(e) => write!(f, "Failed to encode grid: {}", e),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GridError::Io(e) => Some(e),
            GridError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GridError {
    fn from(e: io::Error) -> Self {
        GridError::Io(e)
    }
}

impl From<ImageError> for GridError {
    // The image crate wraps filesystem failures; surface those as plain I/O errors.
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::IoError(io) => GridError::Io(io),
            other => GridError::Encode(other),
        }
    }
}
