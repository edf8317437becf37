//! Image decoding

use image::{
    load_from_memory, load_from_memory_with_format, DynamicImage, ImageBuffer, ImageFormat, Pixel,
};
use ndarray::{Array, ArrayD, IxDyn};

use crate::error::Result;
use crate::pixels::Pixels;

/// Decode image bytes into an n-dimensional array.
///
/// Wraps the image crate's `load_from_memory`; decoder errors are passed through untouched.
/// `hint` is only used when the leading bytes don't identify the format.
pub(super) fn decode(data: &[u8], hint: Option<ImageFormat>) -> Result<Pixels> {
    let img = match (image::guess_format(data), hint) {
        (Err(_), Some(format)) => load_from_memory_with_format(data, format)?,
        _ => load_from_memory(data)?,
    };
    log::debug!(
        "Decoded {}x{} image as {:?}",
        img.width(),
        img.height(),
        img.color()
    );
    to_pixels(img)
}

fn to_pixels(img: DynamicImage) -> Result<Pixels> {
    let pixels = match img {
        DynamicImage::ImageLuma8(buf) => Pixels::U8(to_array(buf)?),
        DynamicImage::ImageLumaA8(buf) => Pixels::U8(to_array(buf)?),
        DynamicImage::ImageRgb8(buf) => Pixels::U8(to_array(buf)?),
        DynamicImage::ImageRgba8(buf) => Pixels::U8(to_array(buf)?),
        DynamicImage::ImageLuma16(buf) => Pixels::U16(to_array(buf)?),
        DynamicImage::ImageLumaA16(buf) => Pixels::U16(to_array(buf)?),
        DynamicImage::ImageRgb16(buf) => Pixels::U16(to_array(buf)?),
        DynamicImage::ImageRgba16(buf) => Pixels::U16(to_array(buf)?),
        DynamicImage::ImageRgb32F(buf) => Pixels::F32(to_array(buf)?),
        DynamicImage::ImageRgba32F(buf) => Pixels::F32(to_array(buf)?),
        // DynamicImage is non_exhaustive
        other => Pixels::F32(to_array(other.into_rgba32f())?),
    };
    Ok(pixels)
}

/// Row-major `(height, width[, channels])` array over the buffer's samples.
fn to_array<P: Pixel>(buf: ImageBuffer<P, Vec<P::Subpixel>>) -> Result<ArrayD<P::Subpixel>> {
    let (width, height) = buf.dimensions();
    let channels = P::CHANNEL_COUNT as usize;

    let shape = if channels == 1 {
        vec![height as usize, width as usize]
    } else {
        vec![height as usize, width as usize, channels]
    };

    Ok(Array::from_shape_vec(IxDyn(&shape), buf.into_raw())?)
}
