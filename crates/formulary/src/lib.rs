//! # formulary
//!
//! Build, document and lint catalogs of spreadsheet named functions.
//!
//! A named function is a parameterized formula body that other bodies call by
//! name. Spreadsheets that cannot import such definitions need each formula
//! pasted with every call already inlined; formulary produces those expanded
//! bodies and the reference documentation around them.
//!
//! ## Features
//!
//! - Load one formula per YAML file from a directory
//! - Reject circular dependencies before expanding anything
//! - Inline named calls deepest first, with hygienic parameter substitution
//! - Render a Markdown reference into a README template
//! - Lint formula files for common mistakes
//!
//! ## Example
//!
//! ```rust
//! use formulary::prelude::*;
//!
//! let catalog = Catalog::from_definitions([
//!     FormulaDefinition::new("BLANK", "IF(,,)"),
//!     FormulaDefinition::new("ORBLANK", "IF(ISBLANK(x), BLANK(), x)").with_parameters(["x"]),
//! ])
//! .unwrap();
//!
//! let output = catalog.build().unwrap();
//! assert_eq!(
//!     output.get("ORBLANK").unwrap().expanded,
//!     "IF(ISBLANK(x), (IF(,,)), x)"
//! );
//!
//! let list = render_formula_list(&output.formulas);
//! assert!(list.starts_with("### Quick Reference"));
//! ```

pub mod build;
pub mod error;
pub mod lint;
pub mod prelude;
pub mod readme;

// Re-export build types
pub use build::{
    build, expand_formula, BuildOptions, BuildOutput, BuildStats, CatalogBuildExt, DocumentedFormula,
};
pub use error::{BuildError, BuildResult, FormulaFailure, ReadmeError};

// Re-export documentation and lint types
pub use lint::{
    LintOptions, LintReport, LintRule, LintSummary, Linter, NoLeadingEquals, NoTopLevelLambda,
    RequireParameterExamples, ValidFormulaSyntax,
};
pub use readme::{render_formula_list, render_readme, END_MARKER, START_MARKER};

// Re-export core types
pub use formulary_core::{Catalog, Error, FormulaDefinition, ParameterSpec, Result};

// Re-export formula types
pub use formulary_formula::{
    extract_calls, parse_formula, parse_formula_with, reconstruct_call, AstNode, CallSite,
    Cycle, DependencyGraph, ExpandError, ExpandOptions, Expander, FormulaError, FormulaResult,
    ParserOptions, Span,
};

// Re-export I/O types
pub use formulary_yaml::{strip_comments, YamlError, YamlReadOptions, YamlReader, YamlResult};

use std::path::Path;

/// Extension trait for Catalog to add directory loading
pub trait CatalogExt {
    /// Load every formula file in a directory with default options
    fn open<P: AsRef<Path>>(dir: P) -> YamlResult<Catalog>;

    /// Load with custom options
    fn open_with_options<P: AsRef<Path>>(dir: P, options: &YamlReadOptions)
        -> YamlResult<Catalog>;
}

impl CatalogExt for Catalog {
    fn open<P: AsRef<Path>>(dir: P) -> YamlResult<Catalog> {
        YamlReader::read_dir(dir, &YamlReadOptions::default())
    }

    fn open_with_options<P: AsRef<Path>>(
        dir: P,
        options: &YamlReadOptions,
    ) -> YamlResult<Catalog> {
        YamlReader::read_dir(dir, options)
    }
}
