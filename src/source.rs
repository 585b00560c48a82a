//! GLSL source text and where it comes from.

use std::path::{Path, PathBuf};

use crate::error::BuildError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => write!(f, "VERTEX"),
            Self::Fragment => write!(f, "FRAGMENT"),
        }
    }
}

/// Anything that can hand out the text of one shader stage.
pub trait SourceProvider {
    fn read(&self) -> std::io::Result<String>;
}

/// Reads the text from a file every time it is asked.
#[derive(Debug, Clone)]
pub struct FileSource(pub PathBuf);

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().to_path_buf())
    }
}

impl SourceProvider for FileSource {
    fn read(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.0)
    }
}

/// Text embedded in the program, e.g. an `r#"..."#` literal.
#[derive(Debug, Clone, Copy)]
pub struct InlineSource<'a>(pub &'a str);

impl SourceProvider for InlineSource<'_> {
    fn read(&self) -> std::io::Result<String> {
        Ok(self.0.to_owned())
    }
}

impl<F> SourceProvider for F
where
    F: Fn() -> std::io::Result<String>,
{
    fn read(&self) -> std::io::Result<String> {
        self()
    }
}

/// GLSL text tagged with the stage it is written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    stage: ShaderStage,
    text: String,
}

impl ShaderSource {
    pub fn load(stage: ShaderStage, provider: &impl SourceProvider) -> Result<Self, BuildError> {
        let text = provider
            .read()
            .map_err(|source| BuildError::SourceRead { stage, source })?;
        Self::new(stage, text)
    }

    pub fn new(stage: ShaderStage, text: impl Into<String>) -> Result<Self, BuildError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(BuildError::EmptySource { stage });
        }
        Ok(Self { stage, text })
    }

    pub fn vertex(text: &str) -> Result<Self, BuildError> {
        Self::new(ShaderStage::Vertex, text)
    }

    pub fn fragment(text: &str) -> Result<Self, BuildError> {
        Self::new(ShaderStage::Fragment, text)
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// true if the first non-blank line is a `#version` directive
    pub fn has_version_directive(&self) -> bool {
        self.text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .is_some_and(|line| line.starts_with("#version"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_source_is_loaded_verbatim() {
        let src = ShaderSource::load(ShaderStage::Vertex, &InlineSource("void main() {}\n")).unwrap();
        assert_eq!(src.stage(), ShaderStage::Vertex);
        assert_eq!(src.text(), "void main() {}\n");
    }

    #[test]
    fn blank_source_is_rejected() {
        let err = ShaderSource::fragment("  \n\t\n").unwrap_err();
        assert!(matches!(
            err,
            BuildError::EmptySource {
                stage: ShaderStage::Fragment
            }
        ));
    }

    #[test]
    fn unreadable_provider_becomes_source_read_error() {
        let failing = || -> std::io::Result<String> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "shader.vs"))
        };
        let err = ShaderSource::load(ShaderStage::Vertex, &failing).unwrap_err();
        match err {
            BuildError::SourceRead { stage, source } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_reported_not_swallowed() {
        let provider = FileSource::new("no/such/dir/shader.frag");
        let err = ShaderSource::load(ShaderStage::Fragment, &provider).unwrap_err();
        assert!(matches!(err, BuildError::SourceRead { .. }));
    }

    #[test]
    fn version_directive_detection() {
        let with = ShaderSource::vertex("\n  #version 330 core\nvoid main() {}").unwrap();
        let without = ShaderSource::vertex("in vec3 position;\nvoid main() {}").unwrap();
        assert!(with.has_version_directive());
        assert!(!without.has_version_directive());
    }

    #[test]
    fn stage_names_match_error_banners() {
        assert_eq!(ShaderStage::Vertex.to_string(), "VERTEX");
        assert_eq!(ShaderStage::Fragment.to_string(), "FRAGMENT");
    }
}
