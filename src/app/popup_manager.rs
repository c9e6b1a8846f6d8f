use std::collections::BTreeMap;

use cgmath::{EuclideanSpace, Point2, Vector2};
use egui::RichText;

use crate::util::p2;

struct Popup {
    title: &'static str,
    message: String,
}

/// Blocking alerts for failures the user has to acknowledge. While any popup
/// is open the rest of the window is disabled.
#[derive(Default)]
pub struct PopupManager {
    popups: BTreeMap<usize, Popup>,
    next_id: usize,
}

impl PopupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, title: &'static str, message: impl Into<String>) {
        let message = message.into();
        log::error!("{title}: {message}");
        self.popups.insert(self.next_id, Popup { title, message });
        self.next_id += 1;
    }

    pub fn is_open(&self) -> bool {
        !self.popups.is_empty()
    }

    pub fn update(&mut self, ctx: &egui::Context, size: Vector2<f32>) {
        let mut closed = Vec::new();
        for (key, popup) in &self.popups {
            let mut open = true;
            let mut done = false;
            egui::Window::new(popup.title)
                .id(egui::Id::new(("popup", *key)))
                .collapsible(false)
                .resizable(false)
                .pivot(egui::Align2::CENTER_CENTER)
                .default_pos(p2(Point2::from_vec(size / 2.0)))
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(RichText::new(&popup.message).size(14.0));
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| done = ui.button("OK").clicked());
                });
            if !open || done {
                closed.push(*key);
            }
        }

        for key in closed {
            self.popups.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_open_popups() {
        let mut popups = PopupManager::new();
        assert!(!popups.is_open());
        popups.error("Error", "Failed to load image: broken");
        popups.error("Error", "Failed to save image: denied");
        assert!(popups.is_open());
        assert_eq!(popups.popups.len(), 2);
        assert_eq!(popups.popups[&1].message, "Failed to save image: denied");
    }
}
