//! Catalog build
//!
//! Validates a whole catalog and expands every formula in it: parse all
//! bodies, build the dependency graph, reject cycles, then expand in catalog
//! order. Formula-level failures are collected so one run reports all of them.
//!
//! # Example
//!
//! ```rust
//! use formulary::prelude::*;
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(FormulaDefinition::new("BLANK", "IF(,,)")).unwrap();
//! catalog
//!     .insert(FormulaDefinition::new("WRAP", "VSTACK(x, BLANK())").with_parameters(["x"]))
//!     .unwrap();
//!
//! let output = catalog.build().unwrap();
//! assert_eq!(output.get("WRAP").unwrap().expanded, "VSTACK(x, (IF(,,)))");
//! assert_eq!(output.stats.formulas, 2);
//! ```

use crate::error::{BuildError, BuildResult, FormulaFailure};
use formulary_core::{Catalog, ParameterSpec};
use formulary_formula::{DependencyGraph, ExpandOptions, Expander};
use serde::Serialize;

/// Options for a catalog build
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Expansion and grammar options
    pub expand: ExpandOptions,
}

/// Statistics from a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Number of formulas in the catalog
    pub formulas: usize,
    /// Number of caller → callee edges
    pub dependency_edges: usize,
    /// Number of formulas whose body called at least one named function
    pub composed: usize,
    /// Number of bodies the expander produced
    pub expansions: usize,
}

/// One formula, ready for documentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentedFormula {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<ParameterSpec>,
    pub notes: Option<String>,
    /// File the definition came from
    pub source: Option<String>,
    /// Named functions called directly, sorted
    pub dependencies: Vec<String>,
    /// Body with every named call inlined
    pub expanded: String,
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Formulas in catalog order
    pub formulas: Vec<DocumentedFormula>,
    pub graph: DependencyGraph,
    pub stats: BuildStats,
}

impl BuildOutput {
    /// Get a formula by name
    pub fn get(&self, name: &str) -> Option<&DocumentedFormula> {
        self.formulas.iter().find(|f| f.name == name)
    }
}

/// Extension trait for Catalog to add build methods
pub trait CatalogBuildExt {
    /// Build with default options
    fn build(&self) -> BuildResult<BuildOutput>;

    /// Build with custom options
    fn build_with_options(&self, options: &BuildOptions) -> BuildResult<BuildOutput>;

    /// Build, then return one formula
    fn expand_formula(&self, name: &str, options: &BuildOptions) -> BuildResult<DocumentedFormula>;
}

impl CatalogBuildExt for Catalog {
    fn build(&self) -> BuildResult<BuildOutput> {
        build(self, &BuildOptions::default())
    }

    fn build_with_options(&self, options: &BuildOptions) -> BuildResult<BuildOutput> {
        build(self, options)
    }

    fn expand_formula(&self, name: &str, options: &BuildOptions) -> BuildResult<DocumentedFormula> {
        expand_formula(self, name, options)
    }
}

/// Validate and expand a catalog
///
/// Circular dependencies are rejected before anything is expanded. Parse
/// errors, argument count mismatches and formulas depending on those are
/// collected and reported together in [`BuildError::Formulas`]. An expansion
/// that leaves a composed body unchanged aborts at once.
pub fn build(catalog: &Catalog, options: &BuildOptions) -> BuildResult<BuildOutput> {
    let mut stats = BuildStats {
        formulas: catalog.len(),
        ..BuildStats::default()
    };

    // Phase 1: Parse every body
    let mut expander = Expander::with_options(catalog, options.expand.clone());
    let mut failures = Vec::new();
    let mut parsed = vec![false; catalog.len()];
    for (idx, definition) in catalog.iter().enumerate() {
        match expander.parsed(idx) {
            Some(Ok(_)) => parsed[idx] = true,
            Some(Err(err)) => {
                tracing::warn!("{}: {}", definition.name, err);
                failures.push(FormulaFailure {
                    formula: definition.name.clone(),
                    file: definition.source.clone(),
                    error: err.clone(),
                });
            }
            None => {}
        }
    }

    // Phase 2: Dependency graph; unparseable formulas have no edges
    let graph = DependencyGraph::build(
        catalog
            .names()
            .enumerate()
            .map(|(idx, name)| (name, expander.parsed(idx).and_then(Result::ok))),
        catalog,
    );
    stats.dependency_edges = graph.edge_count();
    stats.composed = graph
        .nodes()
        .filter(|name| graph.dependencies(name).next().is_some())
        .count();

    // Phase 3: Cycles make expansion meaningless
    let cycles = graph.find_cycles();
    if !cycles.is_empty() {
        for cycle in &cycles {
            tracing::error!("Circular dependency: {}", cycle);
        }
        return Err(BuildError::Cycles(cycles));
    }

    // Phase 4: Expand in catalog order
    let mut formulas = Vec::with_capacity(catalog.len());
    for (idx, definition) in catalog.iter().enumerate() {
        if !parsed[idx] {
            continue;
        }
        match expander.expand_index(idx) {
            Ok(expanded) => {
                tracing::debug!("Expanded {}", definition.name);
                formulas.push(DocumentedFormula {
                    name: definition.name.clone(),
                    version: definition.version.clone(),
                    description: definition.description.clone(),
                    parameters: definition.parameters.clone(),
                    notes: definition.notes.clone(),
                    source: definition.source.clone(),
                    dependencies: graph
                        .dependencies(&definition.name)
                        .map(String::from)
                        .collect(),
                    expanded,
                });
            }
            Err(err) if err.source.is_fatal() => {
                tracing::error!("{}", err);
                return Err(BuildError::Expansion(err));
            }
            Err(err) => {
                tracing::warn!("Failed to expand {}", err);
                failures.push(FormulaFailure {
                    formula: err.formula,
                    file: definition.source.clone(),
                    error: err.source,
                });
            }
        }
    }
    stats.expansions = expander.expansions();

    if !failures.is_empty() {
        return Err(BuildError::Formulas(failures));
    }

    tracing::info!(
        "Built {} formula(s), {} composed",
        stats.formulas,
        stats.composed
    );
    Ok(BuildOutput {
        formulas,
        graph,
        stats,
    })
}

/// Expand a single formula
///
/// The whole catalog is built first, so a cycle or failure anywhere in it
/// rejects the request the same way [`build`] does.
pub fn expand_formula(
    catalog: &Catalog,
    name: &str,
    options: &BuildOptions,
) -> BuildResult<DocumentedFormula> {
    if !catalog.contains(name) {
        return Err(BuildError::UnknownFormula(name.to_string()));
    }

    build(catalog, options)?
        .formulas
        .into_iter()
        .find(|f| f.name == name)
        .ok_or_else(|| BuildError::UnknownFormula(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formulary_core::FormulaDefinition;
    use formulary_formula::FormulaError;
    use pretty_assertions::assert_eq;

    fn catalog(defs: &[(&str, &[&str], &str)]) -> Catalog {
        Catalog::from_definitions(defs.iter().map(|(name, params, body)| {
            FormulaDefinition::new(*name, *body).with_parameters(params.iter().copied())
        }))
        .unwrap()
    }

    #[test]
    fn test_build_expands_everything() {
        let cat = catalog(&[
            ("BLANK", &[], "IF(,,)"),
            ("WRAP", &["x"], "VSTACK(x, BLANK())"),
            ("TWICE", &["x"], "WRAP(WRAP(x))"),
        ]);
        let output = cat.build().unwrap();

        assert_eq!(output.formulas.len(), 3);
        assert_eq!(output.get("BLANK").unwrap().expanded, "IF(,,)");
        assert_eq!(
            output.get("TWICE").unwrap().expanded,
            "VSTACK((VSTACK(x, (IF(,,)))), (IF(,,)))"
        );
        assert_eq!(output.get("TWICE").unwrap().dependencies, vec!["WRAP"]);
        assert_eq!(
            output.stats,
            BuildStats {
                formulas: 3,
                dependency_edges: 2,
                composed: 2,
                expansions: 3,
            }
        );
    }

    #[test]
    fn test_cycles_abort_before_expansion() {
        let cat = catalog(&[("A", &[], "B()"), ("B", &[], "A()"), ("C", &[], "1")]);
        match cat.build() {
            Err(BuildError::Cycles(cycles)) => {
                assert_eq!(cycles.len(), 1);
                assert_eq!(cycles[0].to_string(), "A → B → A");
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_expand_formula_runs_cycle_check() {
        let cat = catalog(&[
            ("A", &[], "B()"),
            ("B", &[], "A()"),
            ("LEAF", &[], "1"),
            ("TOP", &[], "LEAF() + 1"),
        ]);
        let options = BuildOptions::default();

        let err = cat.expand_formula("TOP", &options).unwrap_err();
        assert!(matches!(err, BuildError::Cycles(_)));
        assert_eq!(err.formulas(), vec!["A", "B"]);

        let err = cat.expand_formula("NOPE", &options).unwrap_err();
        assert_eq!(err.formulas(), vec!["NOPE"]);

        let fine = catalog(&[("LEAF", &[], "1"), ("TOP", &[], "LEAF() + 1")]);
        let top = fine.expand_formula("TOP", &options).unwrap();
        assert_eq!(top.expanded, "(1) + 1");
        assert_eq!(top.dependencies, vec!["LEAF"]);
    }

    #[test]
    fn test_failures_are_collected() {
        let cat = catalog(&[
            ("BROKEN", &[], "SUM(("),
            ("ONE", &["x"], "x"),
            ("MISUSE", &[], "ONE(1, 2)"),
            ("USER", &[], "BROKEN()"),
            ("FINE", &[], "ONE(1)"),
        ]);

        let Err(BuildError::Formulas(failures)) = cat.build() else {
            panic!("expected collected failures");
        };
        let names: Vec<&str> = failures.iter().map(|f| f.formula.as_str()).collect();
        assert_eq!(names, vec!["BROKEN", "MISUSE", "USER"]);
        assert!(matches!(failures[0].error, FormulaError::Parse { .. }));
        assert!(matches!(failures[1].error, FormulaError::ArgumentCount { .. }));
        assert_eq!(failures[2].error, FormulaError::DependencyFailed("BROKEN".into()));
    }

    #[test]
    fn test_equals_prefix_option_flows_through() {
        let cat = catalog(&[
            ("SQ", &["n"], "LET(s, n, s * s)"),
            ("NINE", &[], "SQ(3)"),
        ]);

        let output = cat.build().unwrap();
        assert_eq!(output.get("NINE").unwrap().expanded, "=LET(s, 3, s * s)");

        let options = BuildOptions {
            expand: ExpandOptions::new().with_equals_prefixes(Vec::<String>::new()),
        };
        let output = cat.build_with_options(&options).unwrap();
        assert_eq!(output.get("NINE").unwrap().expanded, "LET(s, 3, s * s)");
    }

    #[test]
    fn test_empty_catalog() {
        let output = Catalog::new().build().unwrap();
        assert!(output.formulas.is_empty());
        assert_eq!(output.stats, BuildStats::default());
    }
}
