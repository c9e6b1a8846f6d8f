use std::{
    borrow::Cow,
    error, fmt,
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{DynamicImage, ImageError, ImageFormat, codecs::jpeg::JpegEncoder};
use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};

use crate::util::extensions::{SAVE, lowercase_extension};

type SaveResult<T> = Result<T, SaveError>;

#[derive(Debug)]
pub enum SaveError {
    Image(ImageError),
    Io(std::io::Error),
}

impl fmt::Display for SaveError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SaveError::Image(ref e) => e.fmt(f),
            SaveError::Io(ref e) => e.fmt(f),
        }
    }
}

impl error::Error for SaveError {
    #[inline]
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            SaveError::Image(ref e) => Some(e),
            SaveError::Io(ref e) => Some(e),
        }
    }
}

impl From<ImageError> for SaveError {
    #[inline]
    fn from(err: ImageError) -> SaveError {
        SaveError::Image(err)
    }
}

impl From<std::io::Error> for SaveError {
    #[inline]
    fn from(err: std::io::Error) -> SaveError {
        SaveError::Io(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveFormat {
    Png,
    Jpeg,
    Bmp,
}

impl SaveFormat {
    pub const ALL: [SaveFormat; 3] = [SaveFormat::Png, SaveFormat::Jpeg, SaveFormat::Bmp];

    pub fn name(self) -> &'static str {
        match self {
            SaveFormat::Png => "PNG Image",
            SaveFormat::Jpeg => "JPEG Image",
            SaveFormat::Bmp => "BMP Image",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SaveFormat::Png => &["png"],
            SaveFormat::Jpeg => &["jpg", "jpeg"],
            SaveFormat::Bmp => &["bmp"],
        }
    }

    #[inline]
    pub fn canonical_extension(self) -> &'static str {
        self.extensions()[0]
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    fn image_format(self) -> ImageFormat {
        match self {
            SaveFormat::Png => ImageFormat::Png,
            SaveFormat::Jpeg => ImageFormat::Jpeg,
            SaveFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

/// Appends the canonical extension of `hint` unless the path already ends in
/// an extension we can encode. Existing unknown extensions are kept, so
/// `photo.v2` becomes `photo.v2.png`.
pub fn with_extension(path: PathBuf, hint: SaveFormat) -> PathBuf {
    let known = lowercase_extension(&path).is_some_and(|ext| SAVE.contains(ext.as_str()));
    if known {
        return path;
    }

    let mut name = path.into_os_string();
    name.push(".");
    name.push(hint.canonical_extension());
    PathBuf::from(name)
}

/// Converts the image into a color model the encoder for `format` accepts.
/// Formats without alpha get a plain color copy.
pub fn prepare_for_format(image: &DynamicImage, format: SaveFormat) -> Cow<'_, DynamicImage> {
    use DynamicImage::*;

    match format {
        SaveFormat::Jpeg => match image {
            ImageLuma8(_) | ImageRgb8(_) => Cow::Borrowed(image),
            ImageLumaA8(_) | ImageLuma16(_) | ImageLumaA16(_) => {
                Cow::Owned(ImageLuma8(image.to_luma8()))
            }
            _ => Cow::Owned(ImageRgb8(image.to_rgb8())),
        },
        SaveFormat::Bmp => match image {
            ImageLuma8(_) | ImageLumaA8(_) | ImageRgb8(_) | ImageRgba8(_) => Cow::Borrowed(image),
            _ if image.color().has_alpha() => Cow::Owned(ImageRgba8(image.to_rgba8())),
            _ => Cow::Owned(ImageRgb8(image.to_rgb8())),
        },
        SaveFormat::Png => match image {
            ImageRgb32F(_) => Cow::Owned(ImageRgb16(image.to_rgb16())),
            ImageRgba32F(_) => Cow::Owned(ImageRgba16(image.to_rgba16())),
            _ => Cow::Borrowed(image),
        },
    }
}

fn open_file(path: impl AsRef<Path>) -> Result<File, std::io::Error> {
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)
}

fn get_temp_path(path: impl AsRef<Path>) -> PathBuf {
    let mut id = String::from('.');
    id.push_str(&Alphanumeric.sample_string(&mut rand::rng(), 6));
    let mut buf = path.as_ref().to_path_buf();
    buf.set_file_name(id);
    buf
}

fn encode(
    temp_path: &Path,
    image: &DynamicImage,
    format: SaveFormat,
    jpeg_quality: u8,
) -> SaveResult<()> {
    let mut writer = BufWriter::new(open_file(temp_path)?);
    match format {
        SaveFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, jpeg_quality);
            image.write_with_encoder(encoder)?;
        }
        format => image.write_to(&mut writer, format.image_format())?,
    }
    writer.flush()?;
    Ok(())
}

/// Encodes into a hidden sibling file and renames it over `path`, so a
/// failed save never leaves a half written destination.
pub fn save_with_format(
    path: impl AsRef<Path>,
    image: &DynamicImage,
    format: SaveFormat,
    jpeg_quality: u8,
) -> SaveResult<()> {
    let image = prepare_for_format(image, format);
    let temp_path = get_temp_path(path.as_ref());

    if let Err(err) = encode(&temp_path, &image, format, jpeg_quality) {
        let _ = fs::remove_file(&temp_path);
        Err(err)?;
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        Err(err)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{ColorType, GenericImageView, RgbaImage};

    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "resizer-save-{}",
            Alphanumeric.sample_string(&mut rand::rng(), 8)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn appends_canonical_extension_when_missing() {
        assert_eq!(
            with_extension(PathBuf::from("out"), SaveFormat::Jpeg),
            PathBuf::from("out.jpg")
        );
        assert_eq!(
            with_extension(PathBuf::from("photo.v2"), SaveFormat::Png),
            PathBuf::from("photo.v2.png")
        );
    }

    #[test]
    fn keeps_recognized_extension_regardless_of_hint() {
        assert_eq!(
            with_extension(PathBuf::from("out.JPEG"), SaveFormat::Png),
            PathBuf::from("out.JPEG")
        );
        assert_eq!(
            with_extension(PathBuf::from("out.bmp"), SaveFormat::Jpeg),
            PathBuf::from("out.bmp")
        );
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(SaveFormat::from_extension("JPG"), Some(SaveFormat::Jpeg));
        assert_eq!(SaveFormat::from_extension("jpeg"), Some(SaveFormat::Jpeg));
        assert_eq!(SaveFormat::from_extension("bmp"), Some(SaveFormat::Bmp));
        assert_eq!(SaveFormat::from_extension("gif"), None);
    }

    #[test]
    fn jpeg_drops_alpha() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        let prepared = prepare_for_format(&image, SaveFormat::Jpeg);
        assert_eq!(prepared.color(), ColorType::Rgb8);

        let prepared = prepare_for_format(&image, SaveFormat::Png);
        assert!(matches!(prepared, Cow::Borrowed(_)));
    }

    #[test]
    fn writes_jpeg_from_rgba() {
        let dir = scratch_dir();
        let path = dir.join("out.jpg");
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, image::Rgba([200, 10, 10, 128])));

        save_with_format(&path, &image, SaveFormat::Jpeg, 90).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert!(!decoded.color().has_alpha());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let path = scratch_dir().join("missing").join("out.png");
        let image = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        let err = save_with_format(&path, &image, SaveFormat::Png, 90).unwrap_err();
        assert!(matches!(err, SaveError::Io(_)));
        assert!(!path.exists());
    }
}
