use std::path::PathBuf;

use cgmath::Vector2;
use egui::{Button, Color32, Key, KeyboardShortcut, Modifiers, RichText, TextEdit, TopBottomPanel};
use winit::{dpi::PhysicalSize, event_loop::EventLoopProxy};

use crate::{
    WgpuState, background,
    image_io::{load::LoadError, save::SaveFormat},
    util::UserEvent,
};

mod controller;
use controller::{Dimension, ResizeController, ResizeOutcome, SessionState, ValidationError};

mod help;

mod load_image;

mod menu_bar;

mod popup_manager;
use popup_manager::PopupManager;

pub mod preferences;
use preferences::Preferences;

mod preview;
use preview::Preview;

mod save_image;

const BUTTON_FILL: Color32 = Color32::from_rgb(0xFF, 0x8C, 0x00);
const LABEL_COLOR: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);

pub struct App {
    pub size: Vector2<f32>,
    proxy: EventLoopProxy<UserEvent>,
    controller: ResizeController,
    original_preview: Preview,
    resized_preview: Preview,
    original_dirty: bool,
    resized_dirty: bool,
    status: String,
    save_format: SaveFormat,
    popups: PopupManager,
    pub preferences: Preferences,
    preferences_visible: bool,
    help_visible: bool,
}

impl App {
    pub fn new(proxy: EventLoopProxy<UserEvent>, size: [f32; 2], preferences: Preferences) -> Self {
        Self {
            size: Vector2::from(size),
            proxy,
            controller: ResizeController::new(preferences.lock_aspect_ratio),
            original_preview: Preview::new("original image"),
            resized_preview: Preview::new("resized image"),
            original_dirty: false,
            resized_dirty: false,
            status: String::new(),
            save_format: preferences.save_format,
            popups: PopupManager::new(),
            preferences,
            preferences_visible: false,
            help_visible: false,
        }
    }

    pub fn handle_user_event(&mut self, event: UserEvent) {
        match event {
            UserEvent::QueueLoad(path) => self.load_path(path),
            UserEvent::LoadBytes(bytes) => {
                let res = self.controller.load_bytes(&bytes);
                self.finish_load(res);
            }
            UserEvent::QueueSave(path, format) => self.save(path, format),
            UserEvent::ErrorMessage(message) => self.popups.error("Error", message),
            UserEvent::RepaintRequest(_) | UserEvent::Exit => (),
        }
    }

    fn load_path(&mut self, path: PathBuf) {
        let res = self.controller.load(path);
        self.finish_load(res);
    }

    fn finish_load(&mut self, res: Result<(u32, u32), LoadError>) {
        self.original_dirty = true;
        self.resized_dirty = true;
        match res {
            Ok(_) => self.status = String::from("Image loaded successfully"),
            Err(err) => {
                self.status.clear();
                self.popups
                    .error("Error", format!("Failed to load image: {err}"));
            }
        }
    }

    fn apply_resize(&mut self, res: Result<ResizeOutcome, ValidationError>) {
        match res {
            Ok(ResizeOutcome::Resized { .. }) => {
                self.resized_dirty = true;
                self.status = String::from("Image resized successfully");
            }
            Ok(ResizeOutcome::Pending) => (),
            Err(err) => {
                log::warn!("{err}");
                self.status = format!("Error: {err}");
            }
        }
    }

    fn save(&mut self, path: PathBuf, format: SaveFormat) {
        match self
            .controller
            .save(path, format, self.preferences.jpeg_quality)
        {
            Ok(Some(path)) => {
                self.status = format!("Image saved successfully to {}", path.display());
            }
            Ok(None) => (),
            Err(err) => self
                .popups
                .error("Error", format!("Failed to save image: {err}")),
        }
    }

    fn open_dialog(&self, wgpu: &WgpuState) {
        load_image::open(self.proxy.clone(), &wgpu.window);
    }

    fn save_dialog(&self, wgpu: &WgpuState) {
        if self.controller.can_save() {
            save_image::open(
                self.controller.suggested_name().to_owned(),
                self.save_format,
                self.proxy.clone(),
                &wgpu.window,
            );
        }
    }

    pub fn handle_ui(&mut self, wgpu: &WgpuState, ctx: &egui::Context) {
        self.sync_previews(ctx);
        if !self.popups.is_open() {
            self.shortcuts(wgpu, ctx);
        }

        self.menu_bar(wgpu, ctx);
        self.status_bar(ctx);
        self.main_area(wgpu, ctx);

        self.popups.update(ctx, self.size / ctx.pixels_per_point());
        self.preferences_ui(ctx);
        self.help_ui(ctx);
    }

    fn sync_previews(&mut self, ctx: &egui::Context) {
        if self.original_dirty {
            self.original_preview.set(ctx, self.controller.original());
            self.original_dirty = false;
        }

        if self.resized_dirty {
            self.resized_preview.set(ctx, self.controller.resized());
            self.resized_dirty = false;
        }
    }

    fn shortcuts(&mut self, wgpu: &WgpuState, ctx: &egui::Context) {
        let shortcut = |key| KeyboardShortcut::new(Modifiers::COMMAND, key);
        let (open, save, preferences, exit) = ctx.input_mut(|i| {
            (
                i.consume_shortcut(&shortcut(Key::O)),
                i.consume_shortcut(&shortcut(Key::S)),
                i.consume_shortcut(&shortcut(Key::P)),
                i.consume_shortcut(&shortcut(Key::Q)),
            )
        });

        if open {
            self.open_dialog(wgpu);
        }
        if save {
            self.save_dialog(wgpu);
        }
        if preferences {
            self.preferences_visible = true;
        }
        if exit {
            let _ = self.proxy.send_event(UserEvent::Exit);
        }
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.controller.state() != SessionState::Empty {
                        ui.label(format!("ratio {:.3}", self.controller.aspect_ratio()));
                        ui.separator();
                    }
                    ui.label(self.controller.state().to_string());
                });
            });
        });
    }

    fn main_area(&mut self, wgpu: &WgpuState, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                background::paint_gradient(ui.painter(), ui.max_rect());

                egui::Frame::none().inner_margin(20.0).show(ui, |ui| {
                    ui.add_enabled_ui(!self.popups.is_open(), |ui| {
                        ui.horizontal(|ui| {
                            if ui.add(action_button("Open Image")).clicked() {
                                self.open_dialog(wgpu);
                            }

                            if ui
                                .add_enabled(self.controller.can_save(), action_button("Save Image"))
                                .clicked()
                            {
                                self.save_dialog(wgpu);
                            }

                            egui::ComboBox::from_id_salt("format")
                                .selected_text(self.save_format.name())
                                .show_ui(ui, |ui| {
                                    for format in SaveFormat::ALL {
                                        ui.selectable_value(
                                            &mut self.save_format,
                                            format,
                                            format.name(),
                                        );
                                    }
                                });
                        });

                        ui.add_space(10.0);
                        ui.horizontal(|ui| self.dimension_inputs(ui));
                        ui.add_space(20.0);

                        ui.columns(2, |columns| {
                            self.original_preview.show(&mut columns[0], "Original Image");
                            self.resized_preview.show(&mut columns[1], "Resized Image");
                        });
                    });
                });
            });
    }

    fn dimension_inputs(&mut self, ui: &mut egui::Ui) {
        let mut width = self.controller.width_text().to_owned();
        let edit = TextEdit::singleline(&mut width)
            .hint_text("Width")
            .desired_width(120.0);
        if ui.add(edit).changed() {
            let res = self.controller.on_dimension_edited(Dimension::Width, &width);
            self.apply_resize(res);
        }

        let mut height = self.controller.height_text().to_owned();
        let edit = TextEdit::singleline(&mut height)
            .hint_text("Height")
            .desired_width(120.0);
        if ui.add(edit).changed() {
            let res = self
                .controller
                .on_dimension_edited(Dimension::Height, &height);
            self.apply_resize(res);
        }

        let mut lock = self.controller.lock_aspect_ratio();
        let label = RichText::new("Maintain Aspect Ratio")
            .strong()
            .color(LABEL_COLOR);
        if ui.checkbox(&mut lock, label).changed() {
            let res = self.controller.toggle_aspect_lock(lock);
            self.apply_resize(res);
        }
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = Vector2::new(size.width as f32, size.height as f32);
    }
}

fn action_button(text: &str) -> Button<'static> {
    Button::new(RichText::new(text).strong().color(Color32::WHITE))
        .fill(BUTTON_FILL)
        .min_size(egui::vec2(100.0, 28.0))
}
