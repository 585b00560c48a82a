//! A fake GL driver that validates GLSL just enough for the tests and keeps
//! count of every object it hands out.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use glow_shader::{ShaderDevice, ShaderStage};

pub const PASS_THROUGH_VS: &str = r#"#version 330 core
layout (location = 0) in vec3 position;
uniform mat4 Mvp;

void main()
{
    gl_Position = vec4(position.x, position.y, position.z, 1.0);
}
"#;

pub const SOLID_COLOR_FS: &str = r#"#version 330 core
out vec4 color;

void main()
{
    color = vec4(1.0f, 0.5f, 0.2f, 1.0f);
}
"#;

/// `gl_Position` line lacks its semicolon.
pub const MISSING_SEMICOLON_VS: &str = r#"#version 330 core
layout (location = 0) in vec3 position;

void main()
{
    gl_Position = vec4(position.x, position.y, position.z, 1.0)
}
"#;

pub const MISSING_SEMICOLON_FS: &str = r#"#version 330 core
out vec4 color;

void main()
{
    color = vec4(1.0f, 1.0f, 0.0f, 1.0f)
}
"#;

pub const NO_OUTPUT_FS: &str = r#"#version 330 core

void main()
{
    float unused = 1.0;
}
"#;

struct MockShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct MockProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
    attribs: Vec<String>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, MockShader>,
    programs: HashMap<u32, MockProgram>,
    active: Option<u32>,
    draws: Vec<Option<u32>>,
    compiled: Vec<(ShaderStage, String)>,
    shaders_created: usize,
    programs_created: usize,
    compile_log_override: Option<String>,
    refuse_programs: bool,
}

#[derive(Default)]
pub struct MockDevice {
    state: RefCell<State>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every failing compilation reports `log` instead of the computed one.
    pub fn with_compile_log(log: String) -> Self {
        let device = Self::default();
        device.state.borrow_mut().compile_log_override = Some(log);
        device
    }

    /// `create_program` fails like a driver out of object names.
    pub fn refusing_programs() -> Self {
        let device = Self::default();
        device.state.borrow_mut().refuse_programs = true;
        device
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn shaders_created(&self) -> usize {
        self.state.borrow().shaders_created
    }

    pub fn programs_created(&self) -> usize {
        self.state.borrow().programs_created
    }

    pub fn active_program(&self) -> Option<u32> {
        self.state.borrow().active
    }

    /// Sources in the order they were compiled, as the driver saw them.
    pub fn compiled_sources(&self) -> Vec<(ShaderStage, String)> {
        self.state.borrow().compiled.clone()
    }

    /// Stands in for `glDrawArrays`; remembers which program was current.
    pub fn draw(&self) {
        let mut state = self.state.borrow_mut();
        let active = state.active;
        state.draws.push(active);
    }

    pub fn draws(&self) -> Vec<Option<u32>> {
        self.state.borrow().draws.clone()
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    for (i_line, line) in source.lines().enumerate() {
        let line = line.trim();
        let is_structural = line.is_empty()
            || line.starts_with('#')
            || line.starts_with("//")
            || line.ends_with('{')
            || line.ends_with('}')
            || line.ends_with(')') && !line.contains('=');
        if !is_structural && !line.ends_with(';') {
            return Err(format!(
                "0:{}({}): error: syntax error, unexpected NEW_IDENTIFIER, expecting ',' or ';'\n",
                i_line + 1,
                1
            ));
        }
    }
    Ok(())
}

/// Names declared by lines such as `uniform mat4 Mvp;` or `layout (...) in vec3 position;`.
fn declared(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.ends_with(';'))
        .filter(|line| line.split_whitespace().any(|token| token == qualifier))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_string)
        .collect()
}

impl ShaderDevice for MockDevice {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.shaders_created += 1;
        state.shaders.insert(
            id,
            MockShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        let s = state.shaders.get_mut(&shader).expect("unknown shader");
        s.source = source.to_string();
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        let log_override = state.compile_log_override.clone();
        let s = state.shaders.get_mut(&shader).expect("unknown shader");
        match check_syntax(&s.source) {
            Ok(()) => {
                s.compiled = true;
                s.log.clear();
            }
            Err(log) => {
                s.compiled = false;
                s.log = log_override.unwrap_or(log);
            }
        }
        let entry = (s.stage, s.source.clone());
        state.compiled.push(entry);
    }

    fn get_shader_compile_status(&self, shader: u32) -> bool {
        self.state.borrow().shaders[&shader].compiled
    }

    fn get_shader_info_log(&self, shader: u32) -> String {
        self.state.borrow().shaders[&shader].log.clone()
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.shaders.remove(&shader).is_some(),
            "shader {shader} deleted twice"
        );
        for program in state.programs.values() {
            assert!(
                !program.attached.contains(&shader),
                "shader {shader} deleted while attached"
            );
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.refuse_programs {
            return Err("GL_OUT_OF_MEMORY".to_string());
        }
        state.next_id += 1;
        let id = state.next_id;
        state.programs_created += 1;
        state.programs.insert(id, MockProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        assert!(state.shaders.contains_key(&shader), "attaching unknown shader");
        let p = state.programs.get_mut(&program).expect("unknown program");
        p.attached.push(shader);
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        let p = state.programs.get_mut(&program).expect("unknown program");
        p.attached.retain(|s| *s != shader);
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let attached: Vec<&MockShader> = state.programs[&program]
            .attached
            .iter()
            .map(|id| &state.shaders[id])
            .collect();
        let vertex = attached.iter().find(|s| s.stage == ShaderStage::Vertex && s.compiled);
        let fragment = attached
            .iter()
            .find(|s| s.stage == ShaderStage::Fragment && s.compiled);
        let (linked, log, uniforms, attribs) = match (vertex, fragment) {
            (None, _) => (false, "error: no vertex shader attached\n".to_string(), vec![], vec![]),
            (_, None) => (false, "error: no fragment shader attached\n".to_string(), vec![], vec![]),
            (Some(_), Some(fs)) if declared(&fs.source, "out").is_empty() => (
                false,
                "error: fragment shader does not write to any output\n".to_string(),
                vec![],
                vec![],
            ),
            (Some(vs), Some(fs)) => {
                let mut uniforms = declared(&vs.source, "uniform");
                uniforms.extend(declared(&fs.source, "uniform"));
                (true, String::new(), uniforms, declared(&vs.source, "in"))
            }
        };
        let p = state.programs.get_mut(&program).expect("unknown program");
        p.linked = linked;
        p.log = log;
        p.uniforms = uniforms;
        p.attribs = attribs;
    }

    fn get_program_link_status(&self, program: u32) -> bool {
        self.state.borrow().programs[&program].linked
    }

    fn get_program_info_log(&self, program: u32) -> String {
        self.state.borrow().programs[&program].log.clone()
    }

    fn use_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        if let Some(id) = program {
            assert!(state.programs.contains_key(&id), "using deleted program {id}");
        }
        state.active = program;
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.programs.remove(&program).is_some(),
            "program {program} deleted twice"
        );
        if state.active == Some(program) {
            state.active = None;
        }
    }

    fn get_uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let p = &state.programs[&program];
        p.uniforms.iter().position(|u| u == name).map(|i| i as u32)
    }

    fn get_attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let p = &state.programs[&program];
        p.attribs.iter().position(|a| a == name).map(|i| i as u32)
    }
}
