#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![allow(rustdoc::missing_crate_level_docs)] // it's an example
#![allow(unsafe_code)]
#![allow(clippy::undocumented_unsafe_blocks)]

//! Four coloured corners. `draw_arrays` walks them in order and only the
//! first three make a triangle; element indices reuse the corners to close
//! the quad.

use eframe::{egui, egui_glow, glow};

use egui::mutex::Mutex;
use glow::HasContext;
use std::sync::Arc;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([550.0, 600.0]),
        multisampling: 4,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };
    eframe::run_native(
        "Hello triangle",
        options,
        Box::new(|cc| Ok(Box::new(MyApp::new(cc)?))),
    )
}

struct MyApp {
    /// Behind an `Arc<Mutex<…>>` so we can pass it to [`egui::PaintCallback`] and paint later.
    drawer: Arc<Mutex<glow_shader::drawer_vtx2xyrgb::Drawer>>,
    use_elements: bool,
}

impl MyApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let gl: &glow::Context = cc
            .gl
            .as_deref()
            .ok_or("You need to run eframe with the glow backend")?;
        let mut drawer = glow_shader::drawer_vtx2xyrgb::Drawer::new();
        drawer.compile_shader(gl)?;
        #[rustfmt::skip]
        let vtx2xyrgb: [f32; 20] = [
            -0.5, -0.5, 1.0, 0.0, 0.0,
             0.5, -0.5, 0.0, 1.0, 0.0,
             0.5,  0.5, 0.0, 0.0, 1.0,
            -0.5,  0.5, 1.0, 1.0, 0.0,
        ];
        drawer.set_vtx2xyrgb(gl, &vtx2xyrgb)?;
        drawer.set_elem2vtx(gl, &[0, 1, 2, 0, 2, 3])?;
        Ok(Self {
            drawer: Arc::new(Mutex::new(drawer)),
            use_elements: false,
        })
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.checkbox(&mut self.use_elements, "draw through element indices");
            ui.label(if self.use_elements {
                "6 indices over 4 vertices: two triangles share a diagonal."
            } else {
                "draw_arrays over 4 vertices: the 4th one is left over."
            });
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
        // Clone locals so we can move them into the paint callback:
        let drawer = self.drawer.clone();
        let use_elements = self.use_elements;
        let callback = egui::PaintCallback {
            rect,
            callback: std::sync::Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                let gl = painter.gl();
                unsafe {
                    gl.clear_color(0.2, 0.3, 0.3, 1.0);
                    gl.clear(glow::COLOR_BUFFER_BIT);
                }
                let mut drawer = drawer.lock();
                drawer.use_elements = use_elements;
                drawer.paint(gl);
            })),
        };
        ui.painter().add(callback);
    }
}
