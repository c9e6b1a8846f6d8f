#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![warn(clippy::all)]

use std::{
    env, fs,
    io::{self, IsTerminal, Read},
    iter, panic,
    path::PathBuf,
    sync::{Arc, Mutex},
    thread,
    time::Instant,
};

use egui::ViewportId;
use serde::{Deserialize, Serialize};
use winit::{
    dpi::LogicalSize,
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopProxy},
    window::Window,
};

mod app;
use app::{App, preferences::Preferences};
mod background;
mod cli;
mod icon;
mod image_io;
mod util;
use util::UserEvent;

const APP_NAME: &str = "resizer";

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    maximized: bool,
    preferences: Preferences,
}

pub struct WgpuState<'a> {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'a>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

pub struct WindowHandler<'a> {
    pub wgpu: WgpuState<'a>,
    pub event_loop: EventLoop<UserEvent>,
    pub proxy: EventLoopProxy<UserEvent>,
    pub egui_winit: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub app: App,
}

impl WindowHandler<'_> {
    pub async fn new(config: Config) -> Self {
        let event_loop: EventLoop<UserEvent> = EventLoop::with_user_event().build().unwrap();
        let proxy = event_loop.create_proxy();

        let attributes = Window::default_attributes()
            .with_title(String::from("Image Resizer"))
            .with_visible(false)
            .with_min_inner_size(LogicalSize::new(640f64, 480f64))
            .with_inner_size(LogicalSize::new(800f64, 600f64))
            .with_maximized(config.maximized)
            .with_window_icon(icon::get_icon());

        #[cfg(all(unix, not(target_os = "macos")))]
        let attributes = {
            use winit::platform::{wayland, x11};
            let attributes =
                wayland::WindowAttributesExtWayland::with_name(attributes, APP_NAME, APP_NAME);
            x11::WindowAttributesExtX11::with_name(attributes, APP_NAME, APP_NAME)
        };

        #[allow(deprecated)]
        let window = Arc::new(event_loop.create_window(attributes).unwrap());

        let size = window.inner_size();

        let mut backends = if cfg!(windows) {
            wgpu::Backends::DX12
        } else if cfg!(target_os = "macos") {
            wgpu::Backends::PRIMARY
        } else {
            wgpu::Backends::all()
        };

        if let Ok(gpu_backend) = env::var("WGPU_BACKEND") {
            backends = wgpu::util::parse_backends_from_comma_list(&gpu_backend);
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone()).unwrap();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Unable to create adapter");

        let limits = wgpu::Limits::default().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::default(),
                    required_limits: limits.clone(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let egui_winit = egui_winit::State::new(
            egui::Context::default(),
            ViewportId::ROOT,
            &*window,
            Some(window.scale_factor() as f32),
            None,
            Some(limits.max_texture_dimension_2d as usize),
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        {
            let repaint_proxy = Mutex::new(event_loop.create_proxy());
            egui_winit
                .egui_ctx()
                .set_request_repaint_callback(move |info| {
                    if let Ok(proxy) = repaint_proxy.lock() {
                        let _ = proxy.send_event(UserEvent::RepaintRequest(info));
                    }
                });
        }

        let wgpu = WgpuState {
            window,
            surface,
            device,
            queue,
            config: surface_config,
        };

        let app = App::new(
            proxy.clone(),
            [size.width as f32, size.height as f32],
            config.preferences,
        );

        let ctrl_proxy = proxy.clone();
        if let Err(err) = ctrlc::set_handler(move || {
            let _ = ctrl_proxy.send_event(UserEvent::Exit);
        }) {
            log::warn!("could not install ctrl-c handler: {err}");
        }

        Self {
            event_loop,
            proxy,
            app,
            wgpu,
            egui_winit,
            egui_renderer,
        }
    }

    pub fn main_loop(self) -> Config {
        let WindowHandler {
            event_loop,
            mut app,
            proxy: _,
            mut egui_winit,
            mut egui_renderer,
            mut wgpu,
        } = self;

        let mut config = Config::default();
        let config_ref = &mut config;

        #[allow(deprecated)]
        let res = event_loop.run(move |event, event_loop| match event {
            Event::Resumed => wgpu.window.set_visible(true),
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                event_loop.set_control_flow(ControlFlow::Wait);
                wgpu.window.request_redraw();
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => event_loop.exit(),
                WindowEvent::Resized(size) => {
                    if size.width > 0 && size.height > 0 {
                        wgpu.config.width = size.width;
                        wgpu.config.height = size.height;
                        wgpu.surface.configure(&wgpu.device, &wgpu.config);
                        app.resize(size);
                    }
                    let _ = egui_winit.on_window_event(&wgpu.window, &event);
                    wgpu.window.request_redraw();
                }
                WindowEvent::RedrawRequested => {
                    let raw_input = egui_winit.take_egui_input(&wgpu.window);
                    let egui_output = egui_winit.egui_ctx().run(raw_input, |ctx| {
                        app.handle_ui(&wgpu, ctx);
                    });
                    egui_winit.handle_platform_output(&wgpu.window, egui_output.platform_output);

                    for (id, image_delta) in &egui_output.textures_delta.set {
                        egui_renderer.update_texture(&wgpu.device, &wgpu.queue, *id, image_delta);
                    }

                    let pixels_per_point = egui_output.pixels_per_point;
                    let paint_jobs = egui_winit
                        .egui_ctx()
                        .tessellate(egui_output.shapes, pixels_per_point);

                    let output = match wgpu.surface.get_current_texture() {
                        Ok(output) => Some(output),
                        Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                            wgpu.surface.configure(&wgpu.device, &wgpu.config);
                            wgpu.window.request_redraw();
                            None
                        }
                        Err(err) => {
                            log::error!("failed to acquire frame: {err}");
                            None
                        }
                    };

                    if let Some(output) = output {
                        let view = output
                            .texture
                            .create_view(&wgpu::TextureViewDescriptor::default());
                        let mut encoder =
                            wgpu.device
                                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                                    label: Some("Render Encoder"),
                                });

                        let screen_descriptor = egui_wgpu::ScreenDescriptor {
                            pixels_per_point,
                            size_in_pixels: [wgpu.config.width, wgpu.config.height],
                        };

                        let cmd_buffers = egui_renderer.update_buffers(
                            &wgpu.device,
                            &wgpu.queue,
                            &mut encoder,
                            &paint_jobs,
                            &screen_descriptor,
                        );

                        {
                            let clear_color = ((44_f64) / 255.0).powf(2.2);
                            let mut pass = encoder
                                .begin_render_pass(&wgpu::RenderPassDescriptor {
                                    label: Some("Gui Render Pass"),
                                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                        view: &view,
                                        resolve_target: None,
                                        ops: wgpu::Operations {
                                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                                r: clear_color,
                                                g: clear_color,
                                                b: clear_color,
                                                a: 1.0,
                                            }),
                                            store: wgpu::StoreOp::Store,
                                        },
                                    })],
                                    depth_stencil_attachment: None,
                                    occlusion_query_set: None,
                                    timestamp_writes: None,
                                })
                                .forget_lifetime();

                            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                        }

                        wgpu.queue
                            .submit(cmd_buffers.into_iter().chain(iter::once(encoder.finish())));
                        output.present();
                    }

                    for id in &egui_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }
                event => {
                    let res = egui_winit.on_window_event(&wgpu.window, &event);
                    if res.repaint {
                        wgpu.window.request_redraw();
                    }
                }
            },
            Event::UserEvent(UserEvent::RepaintRequest(info)) => {
                if info.delay.is_zero() {
                    wgpu.window.request_redraw();
                } else if let Some(deadline) = Instant::now().checked_add(info.delay) {
                    event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
                }
            }
            Event::UserEvent(UserEvent::Exit) => event_loop.exit(),
            Event::UserEvent(event) => {
                app.handle_user_event(event);
                wgpu.window.request_redraw();
            }
            Event::LoopExiting => {
                wgpu.window.set_visible(false);
                *config_ref = Config {
                    maximized: wgpu.window.is_maximized(),
                    preferences: app.preferences.clone(),
                };
            }
            _ => (),
        });

        if let Err(err) = res {
            log::error!("event loop terminated: {err}");
        }

        config
    }
}

fn main() {
    panic::set_hook(Box::new(|panic_info| {
        let dirs = directories::UserDirs::new();
        let mut path = PathBuf::from("panic.txt");
        if let Some(dirs) = dirs {
            if let Some(desktop) = dirs.desktop_dir() {
                path = desktop.to_path_buf().join("panic.txt");
            }
        }
        eprintln!("{panic_info:?}");
        let _ = fs::write(path, format!("{panic_info:?}"));
        std::process::exit(1);
    }));

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli::get_clap_command().get_matches();
    let path: Option<&String> = matches.get_one("FILE");

    let mut config: Config = match confy::load(APP_NAME, None) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("could not load config, using defaults: {err}");
            Config::default()
        }
    };
    config.preferences.clamp();

    let window_handler = pollster::block_on(WindowHandler::new(config));

    if !io::stdin().is_terminal() {
        let proxy = window_handler.proxy.clone();
        thread::spawn(move || {
            let mut buffer = Vec::new();
            if let Err(err) = io::stdin().read_to_end(&mut buffer) {
                let _ = proxy.send_event(UserEvent::ErrorMessage(format!(
                    "Failed to read image from stdin: {err}"
                )));
            } else if !buffer.is_empty() {
                let _ = proxy.send_event(UserEvent::LoadBytes(buffer));
            }
        });
    }

    if let Some(path) = path {
        let _ = window_handler
            .proxy
            .send_event(UserEvent::QueueLoad(PathBuf::from(path)));
    }

    let config = window_handler.main_loop();
    if let Err(err) = confy::store(APP_NAME, None, config) {
        log::error!("could not store config: {err}");
    };
}
