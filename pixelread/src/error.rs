use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReaderError>;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Decoded buffer does not match its shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error(transparent)]
    InvalidDimensionOrdering(#[from] InvalidDimensionOrderingError),
    #[error("Image has {rank} dimensions but {order:?} only labels {}", .order.chars().count())]
    TooManyDimensions { rank: usize, order: String },
    #[error("Dimension {dim:?} is missing or repeated in {dims:?}")]
    UnknownDimension { dim: char, dims: String },
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Could not locate a home directory for the config file")]
    NoConfigDir,
}

/// A dimension ordering whose length does not match the rank of the data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Provided too many dimensions for the associated file. \
     Received {received} dimensions [dims: {dims}] \
     for image with {} dimensions [shape: {shape:?}].",
    .shape.len()
)]
pub struct InvalidDimensionOrderingError {
    pub received: usize,
    pub dims: String,
    pub shape: Vec<usize>,
}

impl InvalidDimensionOrderingError {
    pub(crate) fn new(dims: &str, shape: &[usize]) -> Self {
        Self {
            received: dims.chars().count(),
            dims: dims.to_string(),
            shape: shape.to_vec(),
        }
    }
}
