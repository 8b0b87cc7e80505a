//! Build and rendering error types

use formulary_formula::{Cycle, ExpandError, FormulaError};
use thiserror::Error;

/// Result type for catalog builds
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Reasons a catalog build is rejected
#[derive(Debug, Error)]
pub enum BuildError {
    /// The catalog has circular dependencies; nothing was expanded
    #[error("Circular dependencies detected:{}", list_cycles(.0))]
    Cycles(Vec<Cycle>),

    /// Expansion hit an error that invalidates the whole build
    #[error("Formula expansion aborted: {0}")]
    Expansion(#[source] ExpandError),

    /// One or more formulas could not be parsed or expanded
    #[error(
        "Formula expansion failures detected ({} formula(s)):{}",
        .0.len(),
        list_failures(.0)
    )]
    Formulas(Vec<FormulaFailure>),

    /// The requested formula is not in the catalog
    #[error("Unknown formula: {0}")]
    UnknownFormula(String),
}

impl BuildError {
    /// Formulas named by the error, in report order
    pub fn formulas(&self) -> Vec<&str> {
        match self {
            BuildError::Cycles(cycles) => cycles
                .iter()
                .flat_map(|cycle| cycle.members())
                .map(String::as_str)
                .collect(),
            BuildError::Expansion(err) => vec![err.formula.as_str()],
            BuildError::Formulas(failures) => {
                failures.iter().map(|f| f.formula.as_str()).collect()
            }
            BuildError::UnknownFormula(name) => vec![name.as_str()],
        }
    }
}

fn list_cycles(cycles: &[Cycle]) -> String {
    cycles.iter().map(|c| format!("\n  - {c}")).collect()
}

fn list_failures(failures: &[FormulaFailure]) -> String {
    failures.iter().map(|f| format!("\n  - {f}")).collect()
}

/// A formula-level failure collected during a build
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{formula}: {error}")]
pub struct FormulaFailure {
    /// Formula name
    pub formula: String,
    /// File the formula was loaded from, if known
    pub file: Option<String>,
    #[source]
    pub error: FormulaError,
}

/// README template errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadmeError {
    /// Template lacks the generated-content markers
    #[error("Template missing AUTO-GENERATED CONTENT markers")]
    MissingMarkers,
}
