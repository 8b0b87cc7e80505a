//! YAML loader error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog loading
pub type YamlResult<T> = std::result::Result<T, YamlError>;

/// Errors that can occur while loading formula files
///
/// Every variant that concerns one definition names the file it came from.
#[derive(Debug, Error)]
pub enum YamlError {
    /// IO error
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formulas directory does not exist
    #[error("Formulas directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// File is not valid YAML
    #[error("{file}: Invalid YAML syntax - {source}")]
    Syntax {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// File contains no document
    #[error("{file}: File is empty")]
    EmptyFile { file: String },

    /// Required field absent
    #[error("{file}: Missing required field '{field}'")]
    MissingField { file: String, field: &'static str },

    /// Required field present but blank
    #[error("{file}: Required field '{field}' is empty")]
    EmptyField { file: String, field: &'static str },

    /// Field has the wrong YAML type
    #[error("{file}: Field '{field}' must be {expected}")]
    InvalidField {
        file: String,
        field: &'static str,
        expected: &'static str,
    },

    /// A parameter entry is malformed
    #[error("{file}: Parameter {index} {message}")]
    Parameter {
        file: String,
        index: usize,
        message: String,
    },

    /// Two files define the same name
    #[error("{file}: Duplicate formula name '{name}'")]
    DuplicateName { file: String, name: String },

    /// Core error
    #[error("{file}: {source}")]
    Core {
        file: String,
        #[source]
        source: formulary_core::Error,
    },
}

impl YamlError {
    /// File name the error concerns, if any
    pub fn file(&self) -> Option<&str> {
        match self {
            YamlError::Io { .. } | YamlError::DirectoryNotFound(_) => None,
            YamlError::Syntax { file, .. }
            | YamlError::EmptyFile { file }
            | YamlError::MissingField { file, .. }
            | YamlError::EmptyField { file, .. }
            | YamlError::InvalidField { file, .. }
            | YamlError::Parameter { file, .. }
            | YamlError::DuplicateName { file, .. }
            | YamlError::Core { file, .. } => Some(file),
        }
    }
}
