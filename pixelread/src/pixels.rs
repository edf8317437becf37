//! Decoded pixel data as n-dimensional arrays

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Element type of a decoded image, named the way array libraries name them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataType {
    Uint8,
    Uint16,
    Float32,
}

/// Pixel data keeping the element type the decoder produced.
///
/// Axes are `(height, width)` for single-channel images and
/// `(height, width, channels)` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Pixels {
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    F32(ArrayD<f32>),
}

impl Pixels {
    pub fn shape(&self) -> &[usize] {
        match self {
            Pixels::U8(arr) => arr.shape(),
            Pixels::U16(arr) => arr.shape(),
            Pixels::F32(arr) => arr.shape(),
        }
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            Pixels::U8(_) => DataType::Uint8,
            Pixels::U16(_) => DataType::Uint16,
            Pixels::F32(_) => DataType::Float32,
        }
    }

    /// Copy of the data with axis `i` of the result taken from axis `axes[i]` of `self`.
    ///
    /// `axes` must be a permutation of `0..ndim`; ndarray panics otherwise.
    pub fn permuted(&self, axes: &[usize]) -> Pixels {
        match self {
            Pixels::U8(arr) => Pixels::U8(arr.view().permuted_axes(axes).to_owned()),
            Pixels::U16(arr) => Pixels::U16(arr.view().permuted_axes(axes).to_owned()),
            Pixels::F32(arr) => Pixels::F32(arr.view().permuted_axes(axes).to_owned()),
        }
    }

    pub fn as_u8(&self) -> Option<&ArrayD<u8>> {
        match self {
            Pixels::U8(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<&ArrayD<u16>> {
        match self {
            Pixels::U16(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            Pixels::F32(arr) => Some(arr),
            _ => None,
        }
    }
}
