pub mod device;
pub mod drawer_elem2vtx_vtx2xyz;
pub mod drawer_vtx2xyrgb;
pub mod error;
pub mod program;
pub mod source;

pub use device::ShaderDevice;
pub use error::{BuildError, DrawerError, StageError};
pub use program::{BuildConfig, ProgramBuilder, ProgramState, ShaderProgram};
pub use source::{FileSource, InlineSource, ShaderSource, ShaderStage, SourceProvider};

/// Builds a program from two inline sources, prefixing `shader_version`
/// unless a source carries its own `#version` line.
pub fn compile_shaders<D: ShaderDevice>(
    gl: &D,
    shader_version: &str,
    vertex_shader_source: &str,
    fragment_shader_source: &str,
) -> Result<ShaderProgram<D>, BuildError> {
    let vertex = ShaderSource::vertex(vertex_shader_source)?;
    let fragment = ShaderSource::fragment(fragment_shader_source)?;
    ProgramBuilder::new()
        .shader_version(shader_version)
        .build(gl, &vertex, &fragment)
}

/// [`compile_shaders`] with the version header of the current target.
pub fn build_program<D: ShaderDevice>(
    gl: &D,
    vertex_shader_source: &str,
    fragment_shader_source: &str,
) -> Result<ShaderProgram<D>, BuildError> {
    compile_shaders(
        gl,
        program::native_shader_version(),
        vertex_shader_source,
        fragment_shader_source,
    )
}
