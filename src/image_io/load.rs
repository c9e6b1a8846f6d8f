use std::{
    error, fmt, fs,
    io::{self, Cursor},
    path::Path,
};

use image::{ImageError, ImageFormat, ImageReader};

use crate::util::{Image, extensions::lowercase_extension};

type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Image(ImageError),
    UnknownFormat,
}

impl fmt::Display for LoadError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LoadError::Io(ref e) => e.fmt(f),
            LoadError::Image(ref e) => e.fmt(f),
            LoadError::UnknownFormat => write!(f, "unrecognized image format"),
        }
    }
}

impl error::Error for LoadError {
    #[inline]
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            LoadError::Io(ref e) => Some(e),
            LoadError::Image(ref e) => Some(e),
            LoadError::UnknownFormat => None,
        }
    }
}

impl From<ImageError> for LoadError {
    #[inline]
    fn from(err: ImageError) -> LoadError {
        LoadError::Image(err)
    }
}

impl From<io::Error> for LoadError {
    #[inline]
    fn from(err: io::Error) -> LoadError {
        LoadError::Io(err)
    }
}

pub fn load_uncached(path: impl AsRef<Path>) -> LoadResult<Image> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let hint = lowercase_extension(path).and_then(ImageFormat::from_extension);
    load_from_bytes(&bytes, hint)
}

/// Decodes a single still image. The content is sniffed first, `hint` is only
/// consulted for formats without a magic number.
pub fn load_from_bytes(bytes: &[u8], hint: Option<ImageFormat>) -> LoadResult<Image> {
    let format = match image::guess_format(bytes) {
        Ok(format) => format,
        Err(_) => hint.ok_or(LoadError::UnknownFormat)?,
    };

    let image = ImageReader::with_format(Cursor::new(bytes), format).decode()?;
    Ok(Image::new(image))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

    use super::*;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 3, image::Rgb([10, 20, 30])));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn decodes_sniffed_formats() {
        for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp] {
            let image = load_from_bytes(&encoded(format), None).unwrap();
            assert_eq!(image.dimensions(), (5, 3), "{format:?}");
        }
    }

    #[test]
    fn decodes_first_gif_frame() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, image::Rgba([1, 2, 3, 255])));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Gif).unwrap();

        let image = load_from_bytes(bytes.get_ref(), None).unwrap();
        assert_eq!(image.dimensions(), (4, 2));
    }

    #[test]
    fn garbage_is_unknown_format() {
        let err = load_from_bytes(b"definitely not an image", None).unwrap_err();
        assert!(matches!(err, LoadError::UnknownFormat));
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let bytes = encoded(ImageFormat::Png);
        let err = load_from_bytes(&bytes[..bytes.len() / 2], None).unwrap_err();
        assert!(matches!(err, LoadError::Image(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_uncached("/this/path/does/not/exist.png").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(error::Error::source(&err).is_some());
    }
}
