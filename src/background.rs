use egui::{Color32, Mesh, Painter, Rect, Shape};

const ORANGE: Color32 = Color32::from_rgb(0xFF, 0xA5, 0x00);
const AMBER: Color32 = Color32::from_rgb(0xFF, 0xBE, 0x00);
const GOLD: Color32 = Color32::from_rgb(0xFF, 0xD7, 0x00);

/// Diagonal gradient from the top left corner to the bottom right one.
pub fn paint_gradient(painter: &Painter, rect: Rect) {
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), ORANGE);
    mesh.colored_vertex(rect.right_top(), AMBER);
    mesh.colored_vertex(rect.right_bottom(), GOLD);
    mesh.colored_vertex(rect.left_bottom(), AMBER);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));
}
