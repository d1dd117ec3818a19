//! Error types for template parsing and chunk conversion runs.

use std::io;
use std::path::PathBuf;

/// Template source could not be parsed into a [`crate::ChunkTemplate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` opener without a matching `}}`.
    UnterminatedPlaceholder {
        /// Byte offset of the opening braces in the template source.
        offset: usize,
    },
    /// A placeholder naming a field the renderer does not provide.
    UnknownField {
        /// Field name as written between the braces (trimmed).
        name: String,
        /// Byte offset of the opening braces in the template source.
        offset: usize,
    },
    /// The template never references `{{content}}`.
    MissingContent,
}

impl core::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnterminatedPlaceholder { offset } => {
                write!(f, "unterminated placeholder at byte {}", offset)
            }
            Self::UnknownField { name, offset } => {
                write!(f, "unknown template field '{}' at byte {}", name, offset)
            }
            Self::MissingContent => write!(f, "template has no {{{{content}}}} placeholder"),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Conversion run error.
#[derive(Debug)]
pub enum ConvertError {
    /// No input path was supplied.
    Usage,
    /// Input path does not exist.
    InputNotFound(PathBuf),
    /// Encoding name is not one of the recognized labels.
    UnsupportedEncoding(String),
    /// Input file exists but could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// Reading or decoding the input failed mid-stream.
    Read(io::Error),
    /// Rewinding the input between the counting and planning passes failed.
    Seek(io::Error),
    /// Output directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },
    /// A chunk file could not be created or written.
    Write { path: PathBuf, source: io::Error },
    /// The rendering template failed to parse.
    Template(TemplateError),
}

impl core::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Usage => write!(f, "missing input file path"),
            Self::InputNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::UnsupportedEncoding(name) => write!(f, "unsupported encoding: {}", name),
            Self::Open { path, source } => {
                write!(f, "cannot open {}: {}", path.display(), source)
            }
            Self::Read(err) => write!(f, "read failed: {}", err),
            Self::Seek(err) => write!(f, "cannot rewind input: {}", err),
            Self::CreateDir { path, source } => {
                write!(
                    f,
                    "cannot create output directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::Write { path, source } => {
                write!(f, "cannot write {}: {}", path.display(), source)
            }
            Self::Template(err) => write!(f, "template parse failed: {}", err),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Write { source, .. } => Some(source),
            Self::Read(err) | Self::Seek(err) => Some(err),
            Self::Template(err) => Some(err),
            Self::Usage | Self::InputNotFound(_) | Self::UnsupportedEncoding(_) => None,
        }
    }
}

impl From<TemplateError> for ConvertError {
    fn from(value: TemplateError) -> Self {
        Self::Template(value)
    }
}
