//! Compile two stages, link them, hand back an owned program.

use crate::device::ShaderDevice;
use crate::error::{BuildError, StageError};
use crate::source::{FileSource, ShaderSource, ShaderStage};

/// Knobs of [`ProgramBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Prepended to sources that do not start with their own `#version`.
    pub shader_version: Option<String>,
    /// Maximum number of characters kept from a driver info log.
    pub info_log_limit: Option<usize>,
}

pub const DEFAULT_INFO_LOG_LIMIT: usize = 512;

pub fn native_shader_version() -> &'static str {
    if cfg!(target_arch = "wasm32") {
        "#version 300 es"
    } else {
        "#version 330"
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            shader_version: Some(native_shader_version().to_string()),
            info_log_limit: Some(DEFAULT_INFO_LOG_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    config: BuildConfig,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn shader_version(mut self, version: impl Into<String>) -> Self {
        self.config.shader_version = Some(version.into());
        self
    }

    /// Send the sources to the driver untouched.
    pub fn no_shader_version(mut self) -> Self {
        self.config.shader_version = None;
        self
    }

    pub fn info_log_limit(mut self, limit: Option<usize>) -> Self {
        self.config.info_log_limit = limit;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Loads both stages from files, then [`build`](Self::build)s.
    pub fn build_from_files<D: ShaderDevice>(
        &self,
        gl: &D,
        vertex_path: impl AsRef<std::path::Path>,
        fragment_path: impl AsRef<std::path::Path>,
    ) -> Result<ShaderProgram<D>, BuildError> {
        let vertex = ShaderSource::load(ShaderStage::Vertex, &FileSource::new(vertex_path))?;
        let fragment = ShaderSource::load(ShaderStage::Fragment, &FileSource::new(fragment_path))?;
        self.build(gl, &vertex, &fragment)
    }

    /// Compiles both stages and links them.
    ///
    /// Both stages are always compiled so that every failure shows up in one
    /// pass, and the link is attempted with whatever compiled. Stage objects
    /// are deleted before returning. A program is only returned when
    /// everything succeeded; otherwise its handle is deleted here and the
    /// collected driver logs come back as [`BuildError::Rejected`].
    pub fn build<D: ShaderDevice>(
        &self,
        gl: &D,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<ShaderProgram<D>, BuildError> {
        for (source, expected) in [
            (vertex, ShaderStage::Vertex),
            (fragment, ShaderStage::Fragment),
        ] {
            if source.stage() != expected {
                return Err(BuildError::StageMismatch {
                    expected,
                    found: source.stage(),
                });
            }
        }

        let mut errors = Vec::<StageError>::new();
        let mut stages = Vec::with_capacity(2);
        for source in [vertex, fragment] {
            let stage = StageGuard::create(gl, source.stage())?;
            gl.shader_source(stage.shader, &self.versioned_text(source));
            gl.compile_shader(stage.shader);
            if gl.get_shader_compile_status(stage.shader) {
                stages.push(stage);
            } else {
                let log = self.bounded_log(gl.get_shader_info_log(stage.shader));
                log::error!("{} shader failed to compile:\n{}", source.stage(), log);
                errors.push(StageError::Compile {
                    stage: source.stage(),
                    log,
                });
            }
        }

        let program = ProgramGuard::create(gl)?;
        for stage in &stages {
            gl.attach_shader(program.program, stage.shader);
        }
        gl.link_program(program.program);
        let linked = gl.get_program_link_status(program.program);
        if !linked {
            let log = self.bounded_log(gl.get_program_info_log(program.program));
            log::error!("shader program failed to link:\n{}", log);
            errors.push(StageError::Link { log });
        }
        for stage in &stages {
            gl.detach_shader(program.program, stage.shader);
        }
        drop(stages);

        if !errors.is_empty() {
            return Err(BuildError::Rejected(errors));
        }
        let handle = program.into_inner();
        log::debug!("linked shader program {:?}", handle);
        Ok(ShaderProgram {
            handle: Some(handle),
        })
    }

    fn versioned_text(&self, source: &ShaderSource) -> String {
        match &self.config.shader_version {
            Some(version) if !source.has_version_directive() => {
                format!("{version}\n{}", source.text())
            }
            _ => source.text().to_owned(),
        }
    }

    fn bounded_log(&self, log: String) -> String {
        match self.config.info_log_limit {
            Some(limit) => log.chars().take(limit).collect(),
            None => log,
        }
    }
}

/// Deletes the stage object however `build` returns.
struct StageGuard<'a, D: ShaderDevice> {
    gl: &'a D,
    shader: D::Shader,
}

impl<'a, D: ShaderDevice> StageGuard<'a, D> {
    fn create(gl: &'a D, stage: ShaderStage) -> Result<Self, BuildError> {
        let shader = gl
            .create_shader(stage)
            .map_err(|message| BuildError::Allocation {
                what: match stage {
                    ShaderStage::Vertex => "vertex shader",
                    ShaderStage::Fragment => "fragment shader",
                },
                message,
            })?;
        Ok(Self { gl, shader })
    }
}

impl<D: ShaderDevice> Drop for StageGuard<'_, D> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.shader);
    }
}

/// Deletes the program unless it is handed over with `into_inner`.
struct ProgramGuard<'a, D: ShaderDevice> {
    gl: &'a D,
    program: D::Program,
    armed: bool,
}

impl<'a, D: ShaderDevice> ProgramGuard<'a, D> {
    fn create(gl: &'a D) -> Result<Self, BuildError> {
        let program = gl
            .create_program()
            .map_err(|message| BuildError::Allocation {
                what: "program",
                message,
            })?;
        Ok(Self {
            gl,
            program,
            armed: true,
        })
    }

    fn into_inner(mut self) -> D::Program {
        self.armed = false;
        self.program
    }
}

impl<D: ShaderDevice> Drop for ProgramGuard<'_, D> {
    fn drop(&mut self) {
        if self.armed {
            self.gl.delete_program(self.program);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    Linked,
    Released,
}

/// A linked program owned by the caller.
///
/// The driver handle stays inside; use [`activate`](Self::activate) before
/// drawing and [`release`](Self::release) when done. Dropping a program that
/// was never released leaks the driver object, and a warning is logged.
pub struct ShaderProgram<D: ShaderDevice> {
    handle: Option<D::Program>,
}

impl<D: ShaderDevice> std::fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("state", &self.state())
            .finish()
    }
}

impl<D: ShaderDevice> ShaderProgram<D> {
    pub fn state(&self) -> ProgramState {
        match self.handle {
            Some(_) => ProgramState::Linked,
            None => ProgramState::Released,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.handle.is_some()
    }

    pub fn activate(&self, gl: &D) {
        match self.handle {
            Some(program) => gl.use_program(Some(program)),
            None => log::warn!("activate() called on a released shader program"),
        }
    }

    /// Unbinds whatever program is current.
    pub fn deactivate(&self, gl: &D) {
        gl.use_program(None);
    }

    /// Deletes the driver program. Calling it again does nothing.
    pub fn release(&mut self, gl: &D) {
        if let Some(program) = self.handle.take() {
            gl.delete_program(program);
        }
    }

    pub fn uniform_location(&self, gl: &D, name: &str) -> Option<D::UniformLocation> {
        gl.get_uniform_location(self.handle?, name)
    }

    pub fn attrib_location(&self, gl: &D, name: &str) -> Option<u32> {
        gl.get_attrib_location(self.handle?, name)
    }
}

impl<D: ShaderDevice> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        if let Some(program) = self.handle {
            log::warn!("shader program {:?} dropped without release()", program);
        }
    }
}
