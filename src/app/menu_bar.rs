use egui::{Button, TopBottomPanel, menu};

use super::App;
use crate::{WgpuState, util::UserEvent};

impl App {
    pub fn menu_bar(&mut self, wgpu: &WgpuState, ctx: &egui::Context) {
        TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_enabled_ui(!self.popups.is_open(), |ui| {
                menu::bar(ui, |ui| {
                    menu::menu_button(ui, "File", |ui| {
                        if ui
                            .add(Button::new("Open").shortcut_text("Ctrl + O"))
                            .clicked()
                        {
                            self.open_dialog(wgpu);
                            ui.close_menu();
                        }

                        if ui
                            .add_enabled(
                                self.controller.can_save(),
                                Button::new("Save as").shortcut_text("Ctrl + S"),
                            )
                            .clicked()
                        {
                            self.save_dialog(wgpu);
                            ui.close_menu();
                        }

                        ui.separator();

                        if ui
                            .add(Button::new("Preferences").shortcut_text("Ctrl + P"))
                            .clicked()
                        {
                            self.preferences_visible = true;
                            ui.close_menu();
                        }

                        ui.separator();

                        if ui
                            .add(Button::new("Exit").shortcut_text("Ctrl + Q"))
                            .clicked()
                        {
                            let _ = self.proxy.send_event(UserEvent::Exit);
                            ui.close_menu();
                        }
                    });

                    menu::menu_button(ui, "Help", |ui| {
                        if ui.button("Shortcuts").clicked() {
                            self.help_visible = true;
                            ui.close_menu();
                        }
                    });
                });
            });
        });
    }
}
