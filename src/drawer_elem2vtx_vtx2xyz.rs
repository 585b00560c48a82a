//! draw indexed geometry. The RGB color is set per element buffer

use glow::HasContext;

use crate::error::{vertex_count, DrawerError};
use crate::program::ShaderProgram;

pub const VS_SRC: &str = r#"
layout (location = 0) in vec3 position;

void main() {
    gl_Position = vec4(position.x, position.y, position.z, 1.0);
}
"#;

pub const FS_SRC: &str = r#"
precision mediump float;
uniform vec3 color;
out vec4 FragColor;

void main() {
    FragColor = vec4(color, 1.0);
}
"#;

pub const ORANGE: [f32; 3] = [1.0, 0.5, 0.2];

struct ElementBufferObject {
    mode: u32,
    elem_size: usize,
    ebo: glow::Buffer,
    color: [f32; 3],
}

/// Number of positions in a buffer of 2D or 3D coordinates.
fn position_count(len: usize, ndim: usize) -> Result<usize, DrawerError> {
    if !(2..=3).contains(&ndim) {
        return Err(DrawerError::InvalidLayout { len, ndim });
    }
    vertex_count(len, ndim)
}

pub struct Drawer {
    program: Option<ShaderProgram<glow::Context>>,
    pub ndim: usize,
    num_vtx: usize,
    vertex_array: Option<glow::VertexArray>,
    vertex_buffer: Option<glow::Buffer>,
    loc_color: Option<glow::UniformLocation>,
    /// used when there is no element buffer
    pub color: [f32; 3],
    ebos: Vec<ElementBufferObject>,
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
            ndim: 0,
            num_vtx: 0,
            vertex_array: None,
            vertex_buffer: None,
            loc_color: None,
            color: ORANGE,
            ebos: Vec::<ElementBufferObject>::new(),
        }
    }

    /// Uses the built-in single-color program.
    pub fn compile_shader(&mut self, gl: &glow::Context) -> Result<(), DrawerError> {
        let program = crate::build_program(gl, VS_SRC, FS_SRC)?;
        self.set_program(gl, program)
    }

    /// Uses a program built by the caller. Its vertex stage must read
    /// `position` at location 0; a `vec3 color` uniform is optional.
    pub fn set_program(
        &mut self,
        gl: &glow::Context,
        program: ShaderProgram<glow::Context>,
    ) -> Result<(), DrawerError> {
        if let Some(mut old) = self.program.take() {
            old.release(gl);
        }
        self.loc_color = program.uniform_location(gl, "color");
        self.program = Some(program);
        if self.vertex_array.is_none() {
            let vao = unsafe { gl.create_vertex_array() }.map_err(|message| {
                DrawerError::Allocation {
                    what: "vertex array",
                    message,
                }
            })?;
            self.vertex_array = Some(vao);
        }
        Ok(())
    }

    pub fn set_vtx2xyz(
        &mut self,
        gl: &glow::Context,
        vtx2xyz: &[f32],
        ndim: usize,
    ) -> Result<(), DrawerError> {
        let num_vtx = position_count(vtx2xyz.len(), ndim)?;
        let program = self.program.as_ref().ok_or(DrawerError::NoProgram)?;
        let loc_position = program
            .attrib_location(gl, "position")
            .ok_or(DrawerError::MissingAttribute("position"))?;
        self.ndim = ndim;
        self.num_vtx = num_vtx;
        unsafe {
            gl.bind_vertex_array(self.vertex_array);
            let vbo = gl.create_buffer().map_err(|message| DrawerError::Allocation {
                what: "vertex buffer",
                message,
            })?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vtx2xyz),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(
                loc_position,
                ndim as i32,
                glow::FLOAT,
                false,
                (ndim * std::mem::size_of::<f32>()) as i32,
                0,
            );
            gl.enable_vertex_attrib_array(loc_position);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            if let Some(old) = self.vertex_buffer.replace(vbo) {
                gl.delete_buffer(old);
            }
        }
        Ok(())
    }

    pub fn add_elem2vtx(
        &mut self,
        gl: &glow::Context,
        mode: u32,
        elem2vtx: &[u32],
        color: [f32; 3],
    ) -> Result<(), DrawerError> {
        unsafe {
            gl.bind_vertex_array(self.vertex_array);
            let ebo = gl.create_buffer().map_err(|message| DrawerError::Allocation {
                what: "element buffer",
                message,
            })?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(elem2vtx),
                glow::STATIC_DRAW,
            );
            // the VAO keeps the element binding, unbind it first
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            self.ebos.push(ElementBufferObject {
                mode,
                elem_size: elem2vtx.len(),
                ebo,
                color,
            });
        }
        Ok(())
    }

    pub fn num_elem(&self) -> usize {
        self.ebos.len()
    }

    pub fn set_color(&mut self, i_elem: usize, rgb: &[f32; 3]) {
        if let Some(ebo) = self.ebos.get_mut(i_elem) {
            ebo.color = *rgb;
        }
    }

    /// Draws every element buffer; without any, draws the vertices as triangles.
    pub fn draw(&self, gl: &glow::Context) {
        let Some(program) = self.program.as_ref() else {
            return;
        };
        program.activate(gl);
        unsafe {
            gl.bind_vertex_array(self.vertex_array);
            if self.ebos.is_empty() {
                let [r, g, b] = self.color;
                gl.uniform_3_f32(self.loc_color.as_ref(), r, g, b);
                gl.draw_arrays(glow::TRIANGLES, 0, self.num_vtx as i32);
            }
            for ebo in &self.ebos {
                let [r, g, b] = ebo.color;
                gl.uniform_3_f32(self.loc_color.as_ref(), r, g, b);
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo.ebo));
                gl.draw_elements(ebo.mode, ebo.elem_size as i32, glow::UNSIGNED_INT, 0);
            }
            gl.bind_vertex_array(None);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mut program) = self.program.take() {
            program.release(gl);
        }
        unsafe {
            for ebo in self.ebos.drain(..) {
                gl.delete_buffer(ebo.ebo);
            }
            if let Some(vbo) = self.vertex_buffer.take() {
                gl.delete_buffer(vbo);
            }
            if let Some(vao) = self.vertex_array.take() {
                gl.delete_vertex_array(vao);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_have_two_or_three_components() {
        assert_eq!(position_count(12, 3).unwrap(), 4);
        assert_eq!(position_count(6, 2).unwrap(), 3);
        for ndim in [0, 1, 4] {
            assert!(matches!(
                position_count(12, ndim),
                Err(DrawerError::InvalidLayout { len: 12, .. })
            ));
        }
    }

    #[test]
    fn trailing_partial_position_is_rejected() {
        assert!(matches!(
            position_count(10, 3),
            Err(DrawerError::InvalidLayout { len: 10, ndim: 3 })
        ));
    }
}
