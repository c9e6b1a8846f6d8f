use std::{error, fmt, num::IntErrorKind, path::PathBuf};

use image::imageops::FilterType;

use crate::{
    image_io::{
        load::{self, LoadError},
        save::{self, SaveError, SaveFormat},
    },
    util::{Image, extensions::lowercase_extension},
};

/// Resampling refuses targets above this many pixels instead of aborting on
/// allocation.
const MAX_PIXELS: u64 = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    fn other(self) -> Self {
        match self {
            Dimension::Width => Dimension::Height,
            Dimension::Height => Dimension::Width,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => write!(f, "Width"),
            Dimension::Height => write!(f, "Height"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NotANumber(Dimension),
    NotPositive(Dimension),
    DerivedZero(Dimension),
    TooLarge { width: u64, height: u64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ValidationError::NotANumber(which) => write!(f, "{which} must be a whole number"),
            ValidationError::NotPositive(which) => {
                write!(f, "Dimensions must be positive numbers ({which})")
            }
            ValidationError::DerivedZero(which) => {
                write!(f, "{which} would be zero at this aspect ratio")
            }
            ValidationError::TooLarge { width, height } => {
                write!(f, "{width}x{height} is too large to resize to")
            }
        }
    }
}

impl error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Nothing to resample yet: no image, or a dimension field is empty.
    Pending,
    Resized { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
    Resized,
    Saved,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Empty => write!(f, "No image"),
            SessionState::Loaded => write!(f, "Loaded"),
            SessionState::Resized => write!(f, "Resized"),
            SessionState::Saved => write!(f, "Saved"),
        }
    }
}

/// Owns the image being worked on and everything derived from it. Every UI
/// event maps onto exactly one method here.
pub struct ResizeController {
    original: Option<Image>,
    resized: Option<Image>,
    aspect_ratio: f64,
    lock_aspect_ratio: bool,
    width: String,
    height: String,
    suggested_name: String,
    state: SessionState,
}

impl ResizeController {
    pub fn new(lock_aspect_ratio: bool) -> Self {
        Self {
            original: None,
            resized: None,
            aspect_ratio: 1.0,
            lock_aspect_ratio,
            width: String::new(),
            height: String::new(),
            suggested_name: String::new(),
            state: SessionState::Empty,
        }
    }

    pub fn load(&mut self, path: impl Into<PathBuf>) -> Result<(u32, u32), LoadError> {
        let path = path.into();
        let res = load::load_uncached(&path);
        if let Err(ref err) = res {
            log::error!("failed to load {}: {err}", path.display());
        }
        let size = self.finish_load(res)?;
        if let Some(stem) = path.file_stem() {
            self.suggested_name = format!("{}_resized", stem.to_string_lossy());
        }
        Ok(size)
    }

    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(u32, u32), LoadError> {
        let size = self.finish_load(load::load_from_bytes(bytes, None))?;
        self.suggested_name = String::from("resized");
        Ok(size)
    }

    fn finish_load(&mut self, res: Result<Image, LoadError>) -> Result<(u32, u32), LoadError> {
        match res {
            Ok(image) => Ok(self.replace(image)),
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    fn replace(&mut self, image: Image) -> (u32, u32) {
        let (width, height) = image.dimensions();
        log::info!("loaded {width}x{height} {:?} image", image.color());

        self.aspect_ratio = width as f64 / height as f64;
        self.width = width.to_string();
        self.height = height.to_string();
        self.original = Some(image);
        self.resized = None;
        self.suggested_name.clear();
        self.state = SessionState::Loaded;
        (width, height)
    }

    fn clear(&mut self) {
        self.original = None;
        self.resized = None;
        self.aspect_ratio = 1.0;
        self.width.clear();
        self.height.clear();
        self.suggested_name.clear();
        self.state = SessionState::Empty;
    }

    pub fn on_dimension_edited(
        &mut self,
        which: Dimension,
        raw_text: &str,
    ) -> Result<ResizeOutcome, ValidationError> {
        *self.field_mut(which) = raw_text.to_owned();

        if self.original.is_none() {
            return Ok(ResizeOutcome::Pending);
        }

        let Some(edited) = parse_dimension(which, raw_text)? else {
            return Ok(ResizeOutcome::Pending);
        };

        let (width, height) = if self.lock_aspect_ratio {
            let paired = derive_paired(which, edited, self.aspect_ratio);
            // An oversized target leaves the paired field as it was.
            let (width, height) = target_size(which, edited, paired)?;
            *self.field_mut(which.other()) = paired.to_string();
            if paired == 0 {
                return Err(ValidationError::DerivedZero(which.other()));
            }
            (width, height)
        } else {
            let text = self.field(which.other()).to_owned();
            match parse_dimension(which.other(), &text)? {
                Some(paired) => target_size(which, edited, paired)?,
                None => return Ok(ResizeOutcome::Pending),
            }
        };

        self.resample(width, height)
    }

    pub fn resample(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, ValidationError> {
        if width == 0 {
            return Err(ValidationError::NotPositive(Dimension::Width));
        }
        if height == 0 {
            return Err(ValidationError::NotPositive(Dimension::Height));
        }
        if width as u64 * height as u64 > MAX_PIXELS {
            return Err(ValidationError::TooLarge {
                width: width.into(),
                height: height.into(),
            });
        }

        let Some(ref original) = self.original else {
            return Ok(ResizeOutcome::Pending);
        };

        let buffer = original
            .buffer()
            .resize_exact(width, height, FilterType::Lanczos3);
        log::debug!(
            "resampled {:?} to {width}x{height}",
            original.dimensions()
        );

        self.resized = Some(Image::new(buffer));
        self.state = SessionState::Resized;
        Ok(ResizeOutcome::Resized { width, height })
    }

    pub fn toggle_aspect_lock(&mut self, enabled: bool) -> Result<ResizeOutcome, ValidationError> {
        self.lock_aspect_ratio = enabled;
        if !enabled {
            return Ok(ResizeOutcome::Pending);
        }

        let Some(ref original) = self.original else {
            return Ok(ResizeOutcome::Pending);
        };

        self.aspect_ratio = original.width() as f64 / original.height() as f64;
        let width = self.width.clone();
        self.on_dimension_edited(Dimension::Width, &width)
    }

    /// Returns the path actually written, or `None` when there is nothing to
    /// save yet.
    pub fn save(
        &mut self,
        path: impl Into<PathBuf>,
        format_hint: SaveFormat,
        jpeg_quality: u8,
    ) -> Result<Option<PathBuf>, SaveError> {
        let Some(ref resized) = self.resized else {
            return Ok(None);
        };

        let path = save::with_extension(path.into(), format_hint);
        let format = lowercase_extension(&path)
            .and_then(|ext| SaveFormat::from_extension(&ext))
            .unwrap_or(format_hint);

        if let Err(err) = save::save_with_format(&path, resized.buffer(), format, jpeg_quality) {
            log::error!("failed to save {}: {err}", path.display());
            return Err(err);
        }

        log::info!("saved {:?} as {format:?} to {}", resized.dimensions(), path.display());
        self.state = SessionState::Saved;
        Ok(Some(path))
    }

    fn field(&self, which: Dimension) -> &str {
        match which {
            Dimension::Width => &self.width,
            Dimension::Height => &self.height,
        }
    }

    fn field_mut(&mut self, which: Dimension) -> &mut String {
        match which {
            Dimension::Width => &mut self.width,
            Dimension::Height => &mut self.height,
        }
    }

    pub fn width_text(&self) -> &str {
        &self.width
    }

    pub fn height_text(&self) -> &str {
        &self.height
    }

    /// File name offered by the save dialog.
    pub fn suggested_name(&self) -> &str {
        &self.suggested_name
    }

    pub fn original(&self) -> Option<&Image> {
        self.original.as_ref()
    }

    pub fn resized(&self) -> Option<&Image> {
        self.resized.as_ref()
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn lock_aspect_ratio(&self) -> bool {
        self.lock_aspect_ratio
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_save(&self) -> bool {
        self.resized.is_some()
    }
}

/// `Ok(None)` for an empty field. Values past `u64::MAX` saturate so they
/// surface as `TooLarge` rather than as a parse failure.
fn parse_dimension(which: Dimension, text: &str) -> Result<Option<u64>, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let value = match text.parse::<i128>() {
        Ok(value) => value,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => return Ok(Some(u64::MAX)),
            IntErrorKind::NegOverflow => return Err(ValidationError::NotPositive(which)),
            _ => return Err(ValidationError::NotANumber(which)),
        },
    };
    if value <= 0 {
        return Err(ValidationError::NotPositive(which));
    }

    Ok(Some(u64::try_from(value).unwrap_or(u64::MAX)))
}

/// Truncates toward zero in both directions.
fn derive_paired(edited: Dimension, value: u64, aspect_ratio: f64) -> u64 {
    match edited {
        Dimension::Width => (value as f64 / aspect_ratio) as u64,
        Dimension::Height => (value as f64 * aspect_ratio) as u64,
    }
}

/// Orders the edited and paired values as `(width, height)` and checks them
/// against the pixel budget before anything narrows them to `u32`.
fn target_size(edited: Dimension, value: u64, paired: u64) -> Result<(u32, u32), ValidationError> {
    let (width, height) = match edited {
        Dimension::Width => (value, paired),
        Dimension::Height => (paired, value),
    };

    let too_large = ValidationError::TooLarge { width, height };
    if width.saturating_mul(height) > MAX_PIXELS {
        return Err(too_large);
    }

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(too_large),
    }
}
