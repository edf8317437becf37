pub mod config;
pub mod constants;
pub mod error;
pub mod pixels;
pub mod reader;
pub mod source;

// Re-export commonly used types
pub use config::ReaderConfig;
pub use error::{InvalidDimensionOrderingError, ReaderError, Result};
pub use pixels::{DataType, Pixels};
pub use reader::{DefaultReader, Metadata, Reader};
pub use source::ImageSource;
