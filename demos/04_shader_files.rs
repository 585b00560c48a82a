#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![allow(rustdoc::missing_crate_level_docs)] // it's an example
#![allow(unsafe_code)]
#![allow(clippy::undocumented_unsafe_blocks)]

//! Loads the stages from `demos/shaders/` and shows the driver diagnostics
//! when a build fails instead of drawing with a broken program.

use eframe::{egui, egui_glow, glow};

use egui::mutex::Mutex;
use glow::HasContext;
use std::sync::Arc;

const SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/shaders");

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([550.0, 700.0]),
        multisampling: 4,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };
    eframe::run_native(
        "Shader files",
        options,
        Box::new(|cc| Ok(Box::new(MyApp::new(cc)?))),
    )
}

struct MyApp {
    drawer: Arc<Mutex<glow_shader::drawer_elem2vtx_vtx2xyz::Drawer>>,
    vertex_file: &'static str,
    diagnostics: Option<String>,
    color: [f32; 3],
}

impl MyApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let gl: &glow::Context = cc
            .gl
            .as_deref()
            .ok_or("You need to run eframe with the glow backend")?;
        let mut app = Self {
            drawer: Arc::new(Mutex::new(
                glow_shader::drawer_elem2vtx_vtx2xyz::Drawer::new(),
            )),
            vertex_file: "triangle.vs",
            diagnostics: None,
            color: glow_shader::drawer_elem2vtx_vtx2xyz::ORANGE,
        };
        app.rebuild(gl)?;
        Ok(app)
    }

    /// Rebuilds the program; a rejected build keeps the previous one.
    fn rebuild(&mut self, gl: &glow::Context) -> Result<(), glow_shader::DrawerError> {
        let dir = std::path::Path::new(SHADER_DIR);
        let builder = glow_shader::ProgramBuilder::new();
        let built = builder.build_from_files(
            gl,
            dir.join(self.vertex_file),
            dir.join("triangle.frag"),
        );
        match built {
            Ok(program) => {
                self.diagnostics = None;
                let mut drawer = self.drawer.lock();
                drawer.set_program(gl, program)?;
                #[rustfmt::skip]
                let vtx2xyz: [f32; 6] = [
                    -0.5, -0.5,
                     0.5, -0.5,
                     0.0,  0.5,
                ];
                drawer.set_vtx2xyz(gl, &vtx2xyz, 2)?;
                if drawer.num_elem() == 0 {
                    drawer.add_elem2vtx(gl, glow::TRIANGLES, &[0, 1, 2], self.color)?;
                }
            }
            Err(e) => {
                log::warn!("keeping the previous program:\n{e}");
                self.diagnostics = Some(e.to_string());
            }
        }
        Ok(())
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut changed = false;
            ui.horizontal(|ui| {
                ui.label("vertex stage:");
                for file in ["triangle.vs", "broken.vs"] {
                    changed |= ui
                        .selectable_value(&mut self.vertex_file, file, file)
                        .changed();
                }
            });
            if ui.color_edit_button_rgb(&mut self.color).changed() {
                self.drawer.lock().set_color(0, &self.color);
            }
            if changed {
                if let Some(gl) = frame.gl() {
                    if let Err(e) = self.rebuild(gl) {
                        self.diagnostics = Some(e.to_string());
                    }
                }
            }
            if let Some(diagnostics) = &self.diagnostics {
                ui.colored_label(egui::Color32::RED, diagnostics);
            }
            egui::Frame::canvas(ui.style()).show(ui, |ui| {
                self.custom_painting(ui);
            });
        });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.drawer.lock().destroy(gl);
        }
    }
}

impl MyApp {
    fn custom_painting(&mut self, ui: &mut egui::Ui) {
        let (rect, _response) =
            ui.allocate_exact_size(egui::Vec2::splat(500.0), egui::Sense::hover());
        let drawer = self.drawer.clone();
        let callback = egui::PaintCallback {
            rect,
            callback: std::sync::Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                let gl = painter.gl();
                unsafe {
                    gl.clear_color(0.2, 0.3, 0.3, 1.0);
                    gl.clear(glow::COLOR_BUFFER_BIT);
                }
                drawer.lock().draw(gl);
            })),
        };
        ui.painter().add(callback);
    }
}
