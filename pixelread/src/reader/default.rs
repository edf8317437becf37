use std::cell::OnceCell;

use image::ImageFormat;

use super::{decode, Metadata, Reader};
use crate::config::ReaderConfig;
use crate::error::{InvalidDimensionOrderingError, ReaderError, Result};
use crate::pixels::Pixels;
use crate::source::ImageSource;

/// Catch-all reader for any format the image crate can decode.
///
/// No metadata is returned. Dimension order is guessed from the configured default
/// order with leading labels dropped until it matches the rank of the data. For a
/// JPEG that yields `ZYX` even though the axes are really rows, columns and channels;
/// use [`DefaultReader::set_dims`] to correct it.
#[derive(Debug)]
pub struct DefaultReader {
    bytes: Vec<u8>,
    // From the file extension, for formats without a magic number
    format_hint: Option<ImageFormat>,
    default_order: String,
    // Lazy load
    data: OnceCell<Pixels>,
    dims: OnceCell<String>,
}

impl DefaultReader {
    pub fn new(source: impl Into<ImageSource>) -> Result<Self> {
        Self::with_config(source, &ReaderConfig::default())
    }

    pub fn with_config(source: impl Into<ImageSource>, config: &ReaderConfig) -> Result<Self> {
        let source = source.into();
        let format_hint = source.format_hint();
        let bytes = source.into_bytes()?;
        Ok(Self::from_parts(
            bytes,
            format_hint,
            config.default_dimension_order.clone(),
        ))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::from_parts(bytes, None, ReaderConfig::default().default_dimension_order)
    }

    /// Format to decode with when the bytes cannot be sniffed, e.g. TGA.
    pub fn with_format_hint(mut self, format: ImageFormat) -> Self {
        self.format_hint = Some(format);
        self
    }

    fn from_parts(
        bytes: Vec<u8>,
        format_hint: Option<ImageFormat>,
        default_order: String,
    ) -> Self {
        Self {
            bytes,
            format_hint,
            default_order,
            data: OnceCell::new(),
            dims: OnceCell::new(),
        }
    }

    /// Container format sniffed from the leading bytes, falling back on the hint.
    pub fn format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.bytes).ok().or(self.format_hint)
    }

    /// Copy of the data with axes rearranged to follow `order`.
    ///
    /// `order` must use exactly the labels of [`Reader::dims`], e.g. `"CYX"` for data labelled `"YXC"`.
    pub fn data_in_order(&self, order: &str) -> Result<Pixels> {
        let data = self.data()?;
        let dims = self.dims()?;

        if order.chars().count() != data.ndim() {
            return Err(InvalidDimensionOrderingError::new(order, data.shape()).into());
        }

        let current: Vec<char> = dims.chars().collect();
        let mut axes: Vec<usize> = Vec::with_capacity(current.len());
        for dim in order.chars() {
            // repeated labels take the next unused axis
            let axis = current
                .iter()
                .enumerate()
                .find(|&(axis, &c)| c == dim && !axes.contains(&axis))
                .map(|(axis, _)| axis)
                .ok_or_else(|| ReaderError::UnknownDimension {
                    dim,
                    dims: dims.to_string(),
                })?;
            axes.push(axis);
        }

        log::debug!("Permuting {dims} -> {order} with axes {axes:?}");
        Ok(data.permuted(&axes))
    }
}

/// Trailing `rank` labels of `order`.
fn default_dims(order: &str, rank: usize) -> Result<String> {
    let len = order.chars().count();
    if rank > len {
        return Err(ReaderError::TooManyDimensions {
            rank,
            order: order.to_string(),
        });
    }
    Ok(order.chars().skip(len - rank).collect())
}

impl Reader for DefaultReader {
    fn data(&self) -> Result<&Pixels> {
        if let Some(data) = self.data.get() {
            log::trace!("Using cached pixel data");
            return Ok(data);
        }

        let data = decode::decode(&self.bytes, self.format_hint)?;
        Ok(self.data.get_or_init(|| data))
    }

    fn dims(&self) -> Result<&str> {
        if let Some(dims) = self.dims.get() {
            return Ok(dims);
        }

        let rank = self.data()?.ndim();
        let dims = default_dims(&self.default_order, rank)?;
        log::debug!("Assuming dimension order {dims} for {rank} dimensional data");
        Ok(self.dims.get_or_init(|| dims))
    }

    fn set_dims(&mut self, dims: &str) -> Result<()> {
        let data = self.data()?;
        if dims.chars().count() != data.ndim() {
            return Err(InvalidDimensionOrderingError::new(dims, data.shape()).into());
        }

        self.dims = OnceCell::from(dims.to_string());
        Ok(())
    }

    fn metadata(&self) -> Option<&Metadata> {
        None
    }

    fn is_this_type(_bytes: &[u8]) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DIMENSION_ORDER;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, RgbaImage};
    use std::io::Cursor;

    fn png(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn gray(width: u32, height: u32) -> Vec<u8> {
        png(DynamicImage::ImageLuma8(GrayImage::from_fn(
            width,
            height,
            |x, y| Luma([(x * y) as u8]),
        )))
    }

    fn rgb(width: u32, height: u32) -> Vec<u8> {
        png(DynamicImage::ImageRgb8(RgbImage::from_fn(
            width,
            height,
            |x, y| Rgb([x as u8, y as u8, 200]),
        )))
    }

    #[test]
    fn data_is_decoded_once() {
        let reader = DefaultReader::from_bytes(rgb(6, 4));

        let first = reader.data().unwrap();
        let second = reader.data().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.shape(), &[4, 6, 3]);
        assert_eq!(reader.shape().unwrap(), &[4, 6, 3]);
    }

    #[test]
    fn default_dims_are_trailing_labels() {
        let reader = DefaultReader::from_bytes(gray(3, 3));
        assert_eq!(reader.dims().unwrap(), "YX");

        let reader = DefaultReader::from_bytes(rgb(3, 3));
        assert_eq!(reader.dims().unwrap(), "ZYX");

        let rgba = png(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)));
        let reader = DefaultReader::from_bytes(rgba);
        let rank = reader.data().unwrap().ndim();
        let dims = reader.dims().unwrap();
        assert_eq!(dims.len(), rank);
        assert!(DEFAULT_DIMENSION_ORDER.ends_with(dims));
    }

    #[test]
    fn default_dims_helper() {
        assert_eq!(default_dims("STCZYX", 0).unwrap(), "");
        assert_eq!(default_dims("STCZYX", 6).unwrap(), "STCZYX");
        assert!(matches!(
            default_dims("YX", 3),
            Err(ReaderError::TooManyDimensions { rank: 3, .. })
        ));
    }

    #[test]
    fn configured_order_is_truncated_the_same_way() {
        let config = ReaderConfig {
            default_dimension_order: "TYXC".to_string(),
        };
        let reader = DefaultReader::with_config(rgb(2, 2), &config).unwrap();
        assert_eq!(reader.dims().unwrap(), "YXC");
    }

    #[test]
    fn short_configured_order_fails() {
        let config = ReaderConfig {
            default_dimension_order: "YX".to_string(),
        };
        let reader = DefaultReader::with_config(rgb(2, 2), &config).unwrap();
        assert!(matches!(
            reader.dims(),
            Err(ReaderError::TooManyDimensions { rank: 3, .. })
        ));
    }

    #[test]
    fn set_dims_with_wrong_length_fails() {
        let mut reader = DefaultReader::from_bytes(rgb(5, 2));

        let err = reader.set_dims("TZYXC").unwrap_err();
        match err {
            ReaderError::InvalidDimensionOrdering(err) => {
                assert_eq!(err.received, 5);
                assert_eq!(err.dims, "TZYXC");
                assert_eq!(err.shape, vec![2, 5, 3]);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(reader.set_dims("YX").is_err());
        // default survives a rejected override
        assert_eq!(reader.dims().unwrap(), "ZYX");
    }

    #[test]
    fn set_dims_overrides() {
        let mut reader = DefaultReader::from_bytes(rgb(5, 2));
        assert_eq!(reader.dims().unwrap(), "ZYX");

        reader.set_dims("YXC").unwrap();
        assert_eq!(reader.dims().unwrap(), "YXC");

        // no uniqueness check, only length
        reader.set_dims("AAA").unwrap();
        assert_eq!(reader.dims().unwrap(), "AAA");
    }

    #[test]
    fn set_dims_before_first_read() {
        let mut reader = DefaultReader::from_bytes(gray(2, 2));
        reader.set_dims("XY").unwrap();
        assert_eq!(reader.dims().unwrap(), "XY");
    }

    #[test]
    fn metadata_is_always_none() {
        let reader = DefaultReader::from_bytes(gray(1, 1));
        assert!(reader.metadata().is_none());
        let reader = DefaultReader::from_bytes(Vec::new());
        assert!(reader.metadata().is_none());
    }

    #[test]
    fn accepts_any_bytes() {
        assert!(DefaultReader::is_this_type(&[]));
        assert!(DefaultReader::is_this_type(b"not an image"));
        assert!(DefaultReader::is_this_type(&gray(1, 1)));
    }

    #[test]
    fn malformed_bytes_fail_on_access() {
        let reader = DefaultReader::from_bytes(b"garbage".to_vec());
        assert!(reader.format().is_none());
        assert!(matches!(reader.data(), Err(ReaderError::Decode(_))));
        assert!(matches!(reader.dims(), Err(ReaderError::Decode(_))));
    }

    #[test]
    fn reads_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, gray(7, 3)).unwrap();

        let reader = DefaultReader::new(path.as_path()).unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Png));
        assert_eq!(reader.shape().unwrap(), &[3, 7]);
    }

    #[test]
    fn data_in_order_permutes_axes() {
        let mut reader = DefaultReader::from_bytes(rgb(4, 2));
        reader.set_dims("YXC").unwrap();

        let cyx = reader.data_in_order("CYX").unwrap();
        assert_eq!(cyx.shape(), &[3, 2, 4]);
        let arr = cyx.as_u8().unwrap();
        assert_eq!(arr[[0, 1, 3]], 3);
        assert_eq!(arr[[1, 1, 3]], 1);
        assert_eq!(arr[[2, 0, 0]], 200);

        // same order is a plain copy
        assert_eq!(&reader.data_in_order("YXC").unwrap(), reader.data().unwrap());
    }

    #[test]
    fn data_in_order_rejects_bad_orders() {
        let mut reader = DefaultReader::from_bytes(rgb(4, 2));
        reader.set_dims("YXC").unwrap();

        assert!(matches!(
            reader.data_in_order("YX"),
            Err(ReaderError::InvalidDimensionOrdering(_))
        ));
        assert!(matches!(
            reader.data_in_order("YXZ"),
            Err(ReaderError::UnknownDimension { dim: 'Z', .. })
        ));
        assert!(matches!(
            reader.data_in_order("YYX"),
            Err(ReaderError::UnknownDimension { dim: 'Y', .. })
        ));
    }

    #[test]
    fn data_in_order_with_repeated_labels() {
        let mut reader = DefaultReader::from_bytes(rgb(4, 2));
        reader.set_dims("AAA").unwrap();

        let same = reader.data_in_order("AAA").unwrap();
        assert_eq!(&same, reader.data().unwrap());
        assert!(matches!(
            reader.data_in_order("AAB"),
            Err(ReaderError::UnknownDimension { dim: 'B', .. })
        ));
    }

    fn tga(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 9]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Tga)
            .unwrap();
        bytes
    }

    #[test]
    fn tga_needs_a_format_hint() {
        let reader = DefaultReader::from_bytes(tga(3, 2));
        assert!(reader.format().is_none());
        assert!(matches!(reader.data(), Err(ReaderError::Decode(_))));

        let reader = DefaultReader::from_bytes(tga(3, 2)).with_format_hint(ImageFormat::Tga);
        assert_eq!(reader.format(), Some(ImageFormat::Tga));
        assert_eq!(reader.shape().unwrap(), &[2, 3, 3]);
        assert_eq!(reader.data().unwrap().as_u8().unwrap()[[1, 2, 0]], 2);
    }

    #[test]
    fn tga_path_uses_its_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tga");
        std::fs::write(&path, tga(3, 2)).unwrap();

        let reader = DefaultReader::new(path.as_path()).unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Tga));
        assert_eq!(reader.shape().unwrap(), &[2, 3, 3]);
        assert_eq!(reader.dims().unwrap(), "ZYX");
    }

    #[test]
    fn works_as_trait_object() {
        let reader: Box<dyn Reader> = Box::new(DefaultReader::from_bytes(gray(2, 3)));
        assert_eq!(reader.shape().unwrap(), &[3, 2]);
        assert_eq!(reader.dims().unwrap(), "YX");
    }
}
