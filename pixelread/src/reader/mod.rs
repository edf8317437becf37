//! Readers turning image bytes into labelled n-dimensional arrays

mod decode;
mod default;

pub use default::DefaultReader;

use crate::error::Result;
use crate::pixels::Pixels;

/// Format-specific metadata attached to an image.
pub type Metadata = serde_json::Value;

/// Common surface of every image reader.
pub trait Reader {
    /// Decoded pixel data, computed on first access and cached.
    fn data(&self) -> Result<&Pixels>;

    /// One label per axis of [`Reader::data`].
    fn dims(&self) -> Result<&str>;

    /// Override the axis labels. Fails if `dims` does not have one label per axis.
    fn set_dims(&mut self, dims: &str) -> Result<()>;

    fn metadata(&self) -> Option<&Metadata>;

    /// Whether this reader can handle the given bytes.
    fn is_this_type(bytes: &[u8]) -> bool
    where
        Self: Sized;

    fn shape(&self) -> Result<&[usize]> {
        Ok(self.data()?.shape())
    }
}
