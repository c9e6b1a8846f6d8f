use image::{Rgba, RgbaImage};
use winit::window::Icon;

const SIZE: u32 = 32;

pub fn get_icon() -> Option<Icon> {
    let image = RgbaImage::from_fn(SIZE, SIZE, |x, y| {
        let t = (x + y) as f32 / (2 * (SIZE - 1)) as f32;
        let green = 0xA5 as f32 + (0xD7 - 0xA5) as f32 * t;
        if x < 2 || y < 2 || x >= SIZE - 2 || y >= SIZE - 2 {
            Rgba([0xFF, 0x8C, 0x00, 0xFF])
        } else {
            Rgba([0xFF, green as u8, 0x00, 0xFF])
        }
    });

    Icon::from_rgba(image.into_raw(), SIZE, SIZE).ok()
}
