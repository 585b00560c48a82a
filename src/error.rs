use crate::source::ShaderStage;

/// One compile or link failure, carrying the driver's info log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("ERROR::SHADER::{stage}::COMPILATION_FAILED\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("ERROR::SHADER::PROGRAM::LINKING_FAILED\n{log}")]
    Link { log: String },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot read {stage} shader source: {source}")]
    SourceRead {
        stage: ShaderStage,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader source is empty")]
    EmptySource { stage: ShaderStage },
    #[error("expected a {expected} shader source, got a {found} one")]
    StageMismatch {
        expected: ShaderStage,
        found: ShaderStage,
    },
    #[error("cannot create {what}: {message}")]
    Allocation { what: &'static str, message: String },
    #[error("{}", display_all(.0))]
    Rejected(Vec<StageError>),
}

fn display_all(errors: &[StageError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl BuildError {
    pub fn stage_errors(&self) -> &[StageError] {
        match self {
            Self::Rejected(errors) => errors,
            _ => &[],
        }
    }

    /// Driver log of the failed compilation of `stage`, if it failed.
    pub fn compile_log(&self, stage: ShaderStage) -> Option<&str> {
        self.stage_errors().iter().find_map(|e| match e {
            StageError::Compile { stage: s, log } if *s == stage => Some(log.as_str()),
            _ => None,
        })
    }

    pub fn link_log(&self) -> Option<&str> {
        self.stage_errors().iter().find_map(|e| match e {
            StageError::Link { log } => Some(log.as_str()),
            _ => None,
        })
    }

    /// Stages whose compilation failed, in pipeline order.
    pub fn failed_stages(&self) -> Vec<ShaderStage> {
        self.stage_errors()
            .iter()
            .filter_map(|e| match e {
                StageError::Compile { stage, .. } => Some(*stage),
                StageError::Link { .. } => None,
            })
            .collect()
    }
}

/// Setup failures of the tutorial drawers.
#[derive(Debug, thiserror::Error)]
pub enum DrawerError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("cannot create {what}: {message}")]
    Allocation { what: &'static str, message: String },
    #[error("vertex attribute `{0}` is not active in the program")]
    MissingAttribute(&'static str),
    #[error("shader program is not built")]
    NoProgram,
    #[error("{len} floats do not make whole vertices of {ndim} components")]
    InvalidLayout { len: usize, ndim: usize },
    #[error("element index {index} is out of range for {num_vtx} vertices")]
    IndexOutOfRange { index: u32, num_vtx: usize },
}

/// Number of vertices in a tightly packed buffer of `ndim`-component vertices.
pub(crate) fn vertex_count(len: usize, ndim: usize) -> Result<usize, DrawerError> {
    if ndim == 0 || len % ndim != 0 {
        return Err(DrawerError::InvalidLayout { len, ndim });
    }
    Ok(len / ndim)
}
