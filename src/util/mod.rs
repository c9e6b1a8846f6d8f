use std::path::PathBuf;

use image::{ColorType, DynamicImage, GenericImageView};

use crate::image_io::save::SaveFormat;

pub mod extensions;

#[derive(Clone, Debug)]
pub struct Image {
    pub image: DynamicImage,
}

impl Image {
    pub fn new(image: DynamicImage) -> Self {
        Image { image }
    }

    pub fn buffer(&self) -> &DynamicImage {
        &self.image
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }
}

pub enum UserEvent {
    ErrorMessage(String),
    QueueLoad(PathBuf),
    QueueSave(PathBuf, SaveFormat),
    LoadBytes(Vec<u8>),
    RepaintRequest(egui::RequestRepaintInfo),
    Exit,
}

pub fn p2(v: impl Into<mint::Point2<f32>>) -> mint::Point2<f32> {
    v.into()
}

pub fn v2(v: impl Into<mint::Vector2<f32>>) -> mint::Vector2<f32> {
    v.into()
}
