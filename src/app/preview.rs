use std::borrow::Cow;

use cgmath::Vector2;
use egui::{Align2, Color32, ColorImage, FontId, Rect, Sense, TextureHandle, TextureOptions, pos2};
use image::{DynamicImage, GenericImageView, imageops::FilterType};

use crate::util::{Image, v2};

const PANE_FILL: Color32 = Color32::from_rgba_premultiplied(180, 180, 180, 180);
const TEXT_COLOR: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);

/// One preview pane. Holds the uploaded texture so that window resizes only
/// redraw it; the source pixels are never touched.
pub struct Preview {
    name: &'static str,
    texture: Option<TextureHandle>,
    source_size: (u32, u32),
}

impl Preview {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            texture: None,
            source_size: (0, 0),
        }
    }

    pub fn set(&mut self, ctx: &egui::Context, image: Option<&Image>) {
        let Some(image) = image else {
            self.texture = None;
            self.source_size = (0, 0);
            return;
        };

        let max_side = ctx.input(|i| i.max_texture_side);
        let display = display_copy(image.buffer(), max_side);
        let rgba = display.to_rgba8();
        let color_image = ColorImage::from_rgba_unmultiplied(
            [rgba.width() as usize, rgba.height() as usize],
            rgba.as_raw(),
        );

        self.source_size = image.dimensions();
        self.texture = Some(ctx.load_texture(self.name, color_image, TextureOptions::LINEAR));
    }

    pub fn show(&self, ui: &mut egui::Ui, placeholder: &str) {
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 10.0, PANE_FILL);

        let Some(ref texture) = self.texture else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                placeholder,
                FontId::proportional(18.0),
                TEXT_COLOR,
            );
            return;
        };

        let inner = rect.shrink(10.0);
        let (width, height) = self.source_size;
        let size = fit_size(
            Vector2::new(width as f32, height as f32),
            Vector2::new(inner.width(), inner.height()),
        );
        let size: egui::Vec2 = v2(size).into();
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        painter.image(
            texture.id(),
            Rect::from_center_size(inner.center(), size),
            uv,
            Color32::WHITE,
        );

        painter.text(
            rect.center_bottom() - egui::vec2(0.0, 4.0),
            Align2::CENTER_BOTTOM,
            format!("{width} x {height}"),
            FontId::proportional(12.0),
            TEXT_COLOR,
        );
    }
}

/// Largest size with the aspect ratio of `image` that fits inside `region`.
pub fn fit_size(image: Vector2<f32>, region: Vector2<f32>) -> Vector2<f32> {
    if image.x <= 0.0 || image.y <= 0.0 || region.x <= 0.0 || region.y <= 0.0 {
        return Vector2::new(0.0, 0.0);
    }

    let scale = (region.x / image.x).min(region.y / image.y);
    image * scale
}

fn display_copy(image: &DynamicImage, max_side: usize) -> Cow<'_, DynamicImage> {
    let max_side = max_side.min(u32::MAX as usize) as u32;
    let (width, height) = image.dimensions();
    if width <= max_side && height <= max_side {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(image.resize(max_side, max_side, FilterType::Triangle))
    }
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;

    #[test]
    fn wide_image_is_limited_by_width() {
        let size = fit_size(Vector2::new(400.0, 100.0), Vector2::new(200.0, 200.0));
        assert_eq!(size, Vector2::new(200.0, 50.0));
    }

    #[test]
    fn small_image_is_scaled_up() {
        let size = fit_size(Vector2::new(10.0, 20.0), Vector2::new(300.0, 300.0));
        assert_eq!(size, Vector2::new(150.0, 300.0));
    }

    #[test]
    fn degenerate_region_is_empty() {
        let size = fit_size(Vector2::new(10.0, 20.0), Vector2::new(0.0, 300.0));
        assert_eq!(size, Vector2::new(0.0, 0.0));
    }

    #[test]
    fn display_copy_respects_texture_limit() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(64, 16));
        assert!(matches!(display_copy(&image, 64), Cow::Borrowed(_)));

        let copy = display_copy(&image, 32);
        assert_eq!(copy.dimensions(), (32, 8));
        assert_eq!(image.dimensions(), (64, 16));
    }
}
