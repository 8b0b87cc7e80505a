//! Error types for formulary-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in formulary-core
#[derive(Debug, Error)]
pub enum Error {
    /// A definition without a name
    #[error("Formula definition has an empty name")]
    EmptyName,

    /// Two definitions share the same name
    #[error("Formula name already exists in catalog: {0}")]
    DuplicateName(String),
}
