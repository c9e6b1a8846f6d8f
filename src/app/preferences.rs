use serde::{Deserialize, Serialize};

use super::App;
use crate::image_io::save::SaveFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub jpeg_quality: u8,
    pub lock_aspect_ratio: bool,
    pub save_format: SaveFormat,
}

impl Preferences {
    const fn new() -> Self {
        Self {
            jpeg_quality: 90,
            lock_aspect_ratio: true,
            save_format: SaveFormat::Png,
        }
    }

    pub fn clamp(&mut self) {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn preferences_ui(&mut self, ctx: &egui::Context) {
        if self.preferences_visible {
            let mut preferences = self.preferences.clone();

            let mut open = true;
            egui::Window::new("Preferences")
                .id(egui::Id::new("preferences window"))
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    egui::Grid::new("preferences grid").show(ui, |ui| {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::RIGHT), |ui| {
                            ui.label("JPEG quality: ");
                        });
                        ui.add(egui::Slider::new(&mut preferences.jpeg_quality, 1..=100));
                        ui.end_row();

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::RIGHT), |ui| {
                            ui.label("Lock aspect ratio on start: ");
                        });
                        ui.add(egui::Checkbox::new(&mut preferences.lock_aspect_ratio, ""));
                        ui.end_row();

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::RIGHT), |ui| {
                            ui.label("Default save format: ");
                        });
                        egui::ComboBox::from_id_salt("save format")
                            .selected_text(preferences.save_format.name())
                            .show_ui(ui, |ui| {
                                for format in SaveFormat::ALL {
                                    ui.selectable_value(
                                        &mut preferences.save_format,
                                        format,
                                        format.name(),
                                    );
                                }
                            });

                        ui.end_row();
                        ui.end_row();
                        if ui.button("Reset to default").clicked() {
                            preferences = Default::default();
                        }
                    });
                });

            self.preferences = preferences;
            self.preferences_visible = open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_fixes_out_of_range_quality() {
        let mut preferences = Preferences {
            jpeg_quality: 0,
            ..Default::default()
        };
        preferences.clamp();
        assert_eq!(preferences.jpeg_quality, 1);

        preferences.jpeg_quality = 250;
        preferences.clamp();
        assert_eq!(preferences.jpeg_quality, 100);
    }

    #[test]
    fn defaults_lock_the_aspect_ratio() {
        let preferences = Preferences::default();
        assert!(preferences.lock_aspect_ratio);
        assert_eq!(preferences.save_format, SaveFormat::Png);
    }
}
