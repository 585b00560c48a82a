//! The driver calls needed to compile and link a program.
//!
//! `glow::HasContext` has hundreds of entry points; the builder only needs the
//! handful below, so it talks to the driver through this trait. The methods
//! are safe to call as long as the context is current on the calling thread.

use crate::source::ShaderStage;

pub trait ShaderDevice {
    type Shader: Copy + std::fmt::Debug;
    type Program: Copy + std::fmt::Debug;
    type UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn get_shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn get_program_link_status(&self, program: Self::Program) -> bool;
    fn get_program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
}

impl ShaderDevice for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { glow::HasContext::create_shader(self, shader_type) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { glow::HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { glow::HasContext::compile_shader(self, shader) }
    }

    fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { glow::HasContext::get_shader_compile_status(self, shader) }
    }

    fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { glow::HasContext::get_shader_info_log(self, shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { glow::HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { glow::HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { glow::HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { glow::HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { glow::HasContext::link_program(self, program) }
    }

    fn get_program_link_status(&self, program: Self::Program) -> bool {
        unsafe { glow::HasContext::get_program_link_status(self, program) }
    }

    fn get_program_info_log(&self, program: Self::Program) -> String {
        unsafe { glow::HasContext::get_program_info_log(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { glow::HasContext::use_program(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { glow::HasContext::delete_program(self, program) }
    }

    fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { glow::HasContext::get_uniform_location(self, program, name) }
    }

    fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { glow::HasContext::get_attrib_location(self, program, name) }
    }
}
