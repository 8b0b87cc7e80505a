//! Prelude module - common imports for formulary users
//!
//! ```rust
//! use formulary::prelude::*;
//! ```

pub use crate::{
    // Build types
    BuildError,
    BuildOptions,
    BuildOutput,
    BuildStats,
    // Main types
    Catalog,
    // Extension traits
    CatalogBuildExt,
    CatalogExt,
    DocumentedFormula,

    // Error types
    Error,
    ExpandOptions,
    FormulaDefinition,
    FormulaError,

    // Lint types
    LintOptions,
    Linter,
    ParameterSpec,
    Result,

    // Rendering
    render_formula_list,
    render_readme,

    // I/O types
    YamlReadOptions,
    YamlReader,
};
