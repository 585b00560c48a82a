#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![allow(rustdoc::missing_crate_level_docs)] // it's an example
#![allow(unsafe_code)]
#![allow(clippy::undocumented_unsafe_blocks)]

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
        "Rectangle from an element buffer",
        options,
        Box::new(|cc| Ok(Box::new(MyApp::new(cc)?))),
    )
}

struct MyApp {
    /// Behind an `Arc<Mutex<…>>` so we can pass it to [`egui::PaintCallback`] and paint later.
    drawer: Arc<Mutex<glow_shader::drawer_elem2vtx_vtx2xyz::Drawer>>,
    wireframe: bool,
}

impl MyApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let gl: &glow::Context = cc
            .gl
            .as_deref()
            .ok_or("You need to run eframe with the glow backend")?;
        let mut drawer = glow_shader::drawer_elem2vtx_vtx2xyz::Drawer::new();
        drawer.compile_shader(gl)?;
        // four unique corners instead of six vertices
        #[rustfmt::skip]
        let vtx2xyz: [f32; 12] = [
             0.5,  0.5, 0.0, // top right
             0.5, -0.5, 0.0, // bottom right
            -0.5, -0.5, 0.0, // bottom left
            -0.5,  0.5, 0.0, // top left
        ];
        let tri2vtx: [u32; 6] = [0, 1, 3, 1, 2, 3];
        drawer.set_vtx2xyz(gl, &vtx2xyz, 3)?;
        drawer.add_elem2vtx(
            gl,
            glow::TRIANGLES,
            &tri2vtx,
            glow_shader::drawer_elem2vtx_vtx2xyz::ORANGE,
        )?;
        Ok(Self {
            drawer: Arc::new(Mutex::new(drawer)),
            wireframe: false,
        })
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.checkbox(&mut self.wireframe, "wireframe");
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
        let wireframe = self.wireframe;
        let callback = egui::PaintCallback {
            rect,
            callback: std::sync::Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                let gl = painter.gl();
                unsafe {
                    gl.clear_color(0.2, 0.3, 0.3, 1.0);
                    gl.clear(glow::COLOR_BUFFER_BIT);
                }
                if wireframe {
                    unsafe { gl.polygon_mode(glow::FRONT_AND_BACK, glow::LINE) };
                }
                drawer.lock().draw(gl);
                unsafe { gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL) };
            })),
        };
        ui.painter().add(callback);
    }
}
