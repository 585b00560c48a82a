#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![allow(rustdoc::missing_crate_level_docs)] // it's an example
#![allow(unsafe_code)]
#![allow(clippy::undocumented_unsafe_blocks)]

//! Two triangles with separate vertex arrays; the second one uses its own
//! fragment shader that outputs yellow.

use eframe::{egui, egui_glow, glow};

use egui::mutex::Mutex;
use glow::HasContext;
use std::sync::Arc;

const YELLOW_FS: &str = r#"
precision mediump float;
out vec4 FragColor;

void main() {
    FragColor = vec4(1.0, 1.0, 0.0, 1.0);
}
"#;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([550.0, 600.0]),
        multisampling: 4,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };
    eframe::run_native(
        "Two triangles, two shaders",
        options,
        Box::new(|cc| Ok(Box::new(MyApp::new(cc)?))),
    )
}

type SharedDrawer = Arc<Mutex<glow_shader::drawer_elem2vtx_vtx2xyz::Drawer>>;

struct MyApp {
    drawer_orange: SharedDrawer,
    drawer_yellow: SharedDrawer,
}

impl MyApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        use glow_shader::drawer_elem2vtx_vtx2xyz::{Drawer, VS_SRC};
        let gl: &glow::Context = cc
            .gl
            .as_deref()
            .ok_or("You need to run eframe with the glow backend")?;
        #[rustfmt::skip]
        let vtx2xyz_first: [f32; 9] = [
             0.0,  0.5, 0.0,
            -0.5, -0.5, 0.0,
             0.5, -0.5, 0.0,
        ];
        #[rustfmt::skip]
        let vtx2xyz_second: [f32; 9] = [
            -0.5, -0.5, 0.0,
             0.5, -0.5, 0.0,
             0.0, -1.0, 0.0,
        ];
        let mut drawer_orange = Drawer::new();
        drawer_orange.compile_shader(gl)?;
        drawer_orange.set_vtx2xyz(gl, &vtx2xyz_first, 3)?;

        let mut drawer_yellow = Drawer::new();
        let program = glow_shader::build_program(gl, VS_SRC, YELLOW_FS)?;
        drawer_yellow.set_program(gl, program)?;
        drawer_yellow.set_vtx2xyz(gl, &vtx2xyz_second, 3)?;
        Ok(Self {
            drawer_orange: Arc::new(Mutex::new(drawer_orange)),
            drawer_yellow: Arc::new(Mutex::new(drawer_yellow)),
        })
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::canvas(ui.style()).show(ui, |ui| {
                self.custom_painting(ui);
            });
        });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.drawer_orange.lock().destroy(gl);
            self.drawer_yellow.lock().destroy(gl);
        }
    }
}

impl MyApp {
    fn custom_painting(&mut self, ui: &mut egui::Ui) {
        let (rect, _response) =
            ui.allocate_exact_size(egui::Vec2::splat(500.0), egui::Sense::hover());
        let drawer_orange = self.drawer_orange.clone();
        let drawer_yellow = self.drawer_yellow.clone();
        let callback = egui::PaintCallback {
            rect,
            callback: std::sync::Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                let gl = painter.gl();
                unsafe {
                    gl.clear_color(0.2, 0.3, 0.3, 1.0);
                    gl.clear(glow::COLOR_BUFFER_BIT);
                }
                drawer_orange.lock().draw(gl);
                drawer_yellow.lock().draw(gl);
            })),
        };
        ui.painter().add(callback);
    }
}
