use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::Result;

/// Where a reader gets its bytes from: a file on disk or a buffer already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Normalize the source into an owned byte buffer, reading the file if needed.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            ImageSource::Path(path) => {
                log::debug!("Reading image bytes from {}", path.display());
                Ok(std::fs::read(&path)?)
            }
            ImageSource::Bytes(bytes) => Ok(bytes),
        }
    }

    /// Format implied by the file extension. Bytes carry no hint.
    pub fn format_hint(&self) -> Option<ImageFormat> {
        match self {
            ImageSource::Path(path) => ImageFormat::from_path(path).ok(),
            ImageSource::Bytes(_) => None,
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        ImageSource::Bytes(bytes.to_vec())
    }
}
