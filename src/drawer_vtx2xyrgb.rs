//! draw triangles whose vertices carry their own RGB color

use glow::HasContext as _;

use crate::error::{vertex_count, DrawerError};
use crate::program::ShaderProgram;

pub const VS_SRC: &str = r#"
in vec2 xyzIn;
in vec3 rgbIn;
out vec3 v_color;
void main() {
    v_color = rgbIn;
    gl_Position = vec4(xyzIn, 0.0, 1.0);
}
"#;

pub const FS_SRC: &str = r#"
precision mediump float;
in vec3 v_color;
out vec4 out_color;
void main() {
    out_color = vec4(v_color, 1.0);
}
"#;

pub struct Drawer {
    program: Option<ShaderProgram<glow::Context>>,
    pub mode: u32,
    num_vtx: usize,
    vertex_array: Option<glow::VertexArray>,
    vertex_buffer: Option<glow::Buffer>,
    element_buffer: Option<(glow::Buffer, usize)>,
    /// draw through the element buffer when one is set
    pub use_elements: bool,
}

const XYRGB_STRIDE: usize = 5;

/// Every index must name an uploaded vertex.
fn check_elem2vtx(elem2vtx: &[u32], num_vtx: usize) -> Result<(), DrawerError> {
    match elem2vtx.iter().find(|&&i| i as usize >= num_vtx) {
        Some(&index) => Err(DrawerError::IndexOutOfRange { index, num_vtx }),
        None => Ok(()),
    }
}

impl Default for Drawer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawer {
    pub fn new() -> Self {
        Drawer {
            program: None,
            mode: glow::TRIANGLES,
            num_vtx: 0,
            vertex_array: None,
            vertex_buffer: None,
            element_buffer: None,
            use_elements: true,
        }
    }

    pub fn compile_shader(&mut self, gl: &glow::Context) -> Result<(), DrawerError> {
        if let Some(mut old) = self.program.take() {
            old.release(gl);
        }
        self.program = Some(crate::build_program(gl, VS_SRC, FS_SRC)?);
        Ok(())
    }

    /// `vtx2xyrgb` is interleaved as `[x, y, r, g, b]` per vertex.
    pub fn set_vtx2xyrgb(
        &mut self,
        gl: &glow::Context,
        vtx2xyrgb: &[f32],
    ) -> Result<(), DrawerError> {
        let program = self.program.as_ref().ok_or(DrawerError::NoProgram)?;
        let loc_xy = program
            .attrib_location(gl, "xyzIn")
            .ok_or(DrawerError::MissingAttribute("xyzIn"))?;
        let loc_rgb = program
            .attrib_location(gl, "rgbIn")
            .ok_or(DrawerError::MissingAttribute("rgbIn"))?;
        log::debug!("attribute locations xy={} rgb={}", loc_xy, loc_rgb);
        let num_vtx = vertex_count(vtx2xyrgb.len(), XYRGB_STRIDE)?;
        let stride = XYRGB_STRIDE as i32 * std::mem::size_of::<f32>() as i32;
        unsafe {
            let vertex_array = gl
                .create_vertex_array()
                .map_err(|message| DrawerError::Allocation {
                    what: "vertex array",
                    message,
                })?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(message) => {
                    gl.delete_vertex_array(vertex_array);
                    return Err(DrawerError::Allocation {
                        what: "vertex buffer",
                        message,
                    });
                }
            };
            gl.bind_vertex_array(Some(vertex_array));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vtx2xyrgb),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(loc_xy, 2, glow::FLOAT, false, stride, 0);
            gl.vertex_attrib_pointer_f32(
                loc_rgb,
                3,
                glow::FLOAT,
                false,
                stride,
                2 * std::mem::size_of::<f32>() as i32,
            );
            gl.enable_vertex_attrib_array(loc_xy);
            gl.enable_vertex_attrib_array(loc_rgb);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            //
            self.release_buffers(gl);
            self.vertex_array = Some(vertex_array);
            self.vertex_buffer = Some(vbo);
            self.num_vtx = num_vtx;
        }
        Ok(())
    }

    /// Indices into the vertices of the last `set_vtx2xyrgb`, drawn with
    /// `mode` when `use_elements` is on. Replaces a previous index buffer.
    pub fn set_elem2vtx(
        &mut self,
        gl: &glow::Context,
        elem2vtx: &[u32],
    ) -> Result<(), DrawerError> {
        check_elem2vtx(elem2vtx, self.num_vtx)?;
        unsafe {
            let ebo = gl.create_buffer().map_err(|message| DrawerError::Allocation {
                what: "element buffer",
                message,
            })?;
            gl.bind_vertex_array(self.vertex_array);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(elem2vtx),
                glow::STATIC_DRAW,
            );
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            if let Some((old, _)) = self.element_buffer.replace((ebo, elem2vtx.len())) {
                gl.delete_buffer(old);
            }
        }
        Ok(())
    }

    fn release_buffers(&mut self, gl: &glow::Context) {
        unsafe {
            if let Some(vao) = self.vertex_array.take() {
                gl.delete_vertex_array(vao);
            }
            if let Some(vbo) = self.vertex_buffer.take() {
                gl.delete_buffer(vbo);
            }
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut program) = self.program.take() {
            program.release(gl);
        }
        self.release_buffers(gl);
        if let Some((ebo, _)) = self.element_buffer.take() {
            unsafe { gl.delete_buffer(ebo) };
        }
    }

    pub fn paint(&self, gl: &glow::Context) {
        let Some(program) = self.program.as_ref() else {
            return;
        };
        program.activate(gl);
        unsafe {
            gl.bind_vertex_array(self.vertex_array);
            match self.element_buffer {
                Some((ebo, num_idx)) if self.use_elements => {
                    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                    gl.draw_elements(self.mode, num_idx as i32, glow::UNSIGNED_INT, 0);
                }
                _ => gl.draw_arrays(self.mode, 0, self.num_vtx as i32),
            }
            gl.bind_vertex_array(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_buffer_must_hold_whole_vertices() {
        assert_eq!(vertex_count(20, XYRGB_STRIDE).unwrap(), 4);
        assert!(matches!(
            vertex_count(17, XYRGB_STRIDE),
            Err(DrawerError::InvalidLayout { len: 17, ndim: 5 })
        ));
    }

    #[test]
    fn indices_stay_within_the_vertices() {
        assert!(check_elem2vtx(&[0, 1, 2, 0, 2, 3], 4).is_ok());
        assert!(check_elem2vtx(&[], 0).is_ok());
        assert!(matches!(
            check_elem2vtx(&[0, 1, 4], 4),
            Err(DrawerError::IndexOutOfRange { index: 4, num_vtx: 4 })
        ));
    }
}
