//! Formula file linter
//!
//! Rules look at one definition at a time and return errors and warnings.
//! The linter runs every enabled rule and prefixes messages with the file the
//! definition came from.

use std::path::Path;

use formulary_core::{Catalog, FormulaDefinition};
use formulary_formula::{parse_formula_with, AstNode, FormulaError, ParserOptions};
use formulary_yaml::{strip_comments, YamlReadOptions, YamlReader, YamlResult};

/// Messages produced by one rule for one definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LintReport {
    fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            warnings: vec![message.into()],
        }
    }

    /// True if there is nothing to report
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// A check applied to every formula definition
pub trait LintRule: Send + Sync {
    /// Rule identifier, e.g. `no-leading-equals`
    fn name(&self) -> &'static str;

    /// One-line summary
    fn description(&self) -> &'static str;

    /// Check one definition; `body` is expected to still contain comments
    fn check(&self, definition: &FormulaDefinition) -> LintReport;
}

/// Formula must not start with `=`
#[derive(Debug, Default)]
pub struct NoLeadingEquals;

impl LintRule for NoLeadingEquals {
    fn name(&self) -> &'static str {
        "no-leading-equals"
    }

    fn description(&self) -> &'static str {
        "Formula field must not start with '=' character"
    }

    fn check(&self, definition: &FormulaDefinition) -> LintReport {
        if definition.has_leading_equals() {
            LintReport::error(
                "Formula starts with '=' character. Remove the leading '=' from the formula field.",
            )
        } else {
            LintReport::default()
        }
    }
}

/// Formula must not be wrapped in `LAMBDA(...)`
///
/// Spreadsheets add the wrapper themselves when parameters are declared. A
/// self-executing `LAMBDA(...)(...)` is only a warning.
#[derive(Debug, Default)]
pub struct NoTopLevelLambda;

impl NoTopLevelLambda {
    fn is_lambda(node: &AstNode) -> bool {
        node.function_name()
            .map_or(false, |name| name.eq_ignore_ascii_case("LAMBDA"))
    }

    /// Leading operand of the formula
    fn head(node: &AstNode) -> &AstNode {
        match node {
            AstNode::Sequence { items, .. } => items
                .first()
                .filter(|item| item.prefixes.is_empty())
                .map_or(node, |item| Self::head(&item.operand)),
            _ => node,
        }
    }
}

impl LintRule for NoTopLevelLambda {
    fn name(&self) -> &'static str {
        "no-top-level-lambda"
    }

    fn description(&self) -> &'static str {
        "Formula field must not start with uninvoked LAMBDA wrapper"
    }

    fn check(&self, definition: &FormulaDefinition) -> LintReport {
        let cleaned = strip_comments(&definition.body);
        let options = ParserOptions {
            allow_immediate_invocation: true,
        };

        let starts_with_lambda = match parse_formula_with(&cleaned, &options) {
            Ok(ast) => match Self::head(&ast) {
                AstNode::Invocation { callee, .. } if Self::is_lambda(Self::head(callee)) => {
                    return LintReport::warning(
                        "Formula uses self-executing LAMBDA pattern. For parameterless \
                         functions this is unnecessary. Consider removing the LAMBDA wrapper.",
                    );
                }
                head => Self::is_lambda(head),
            },
            // Unparseable bodies are reported by valid-formula-syntax
            Err(_) => {
                let text = cleaned.trim_start();
                text.get(..7)
                    .map_or(false, |prefix| prefix.eq_ignore_ascii_case("LAMBDA("))
            }
        };

        if starts_with_lambda {
            LintReport::error(
                "Formula starts with uninvoked LAMBDA wrapper. Spreadsheets add the LAMBDA \
                 wrapper automatically when you define parameters. Only include the formula \
                 body in the formula field.",
            )
        } else {
            LintReport::default()
        }
    }
}

/// Every parameter needs a non-empty example
#[derive(Debug, Default)]
pub struct RequireParameterExamples;

impl LintRule for RequireParameterExamples {
    fn name(&self) -> &'static str {
        "require-parameter-examples"
    }

    fn description(&self) -> &'static str {
        "All parameters must have non-empty example values"
    }

    fn check(&self, definition: &FormulaDefinition) -> LintReport {
        let mut report = LintReport::default();
        for param in &definition.parameters {
            match param.example.as_deref() {
                None => report.errors.push(format!(
                    "Parameter '{}' is missing 'example' field. Provide a concrete example \
                     value (e.g., '\"A1:B10\"', '0', 'BLANK()', etc.)",
                    param.name
                )),
                Some("") => report.errors.push(format!(
                    "Parameter '{}' has empty example. Provide a concrete example value \
                     (e.g., '\"A1:B10\"', '0', '\"\"', 'BLANK()', etc.)",
                    param.name
                )),
                Some(_) => {}
            }
        }
        report
    }
}

/// Formula must parse once comments are removed
#[derive(Debug, Default)]
pub struct ValidFormulaSyntax;

impl LintRule for ValidFormulaSyntax {
    fn name(&self) -> &'static str {
        "valid-formula-syntax"
    }

    fn description(&self) -> &'static str {
        "Formula must be parseable by the formula grammar"
    }

    fn check(&self, definition: &FormulaDefinition) -> LintReport {
        let cleaned = strip_comments(&definition.body);
        let options = ParserOptions {
            allow_immediate_invocation: true,
        };

        match parse_formula_with(&cleaned, &options) {
            Ok(_) => LintReport::default(),
            Err(FormulaError::Parse { message, position }) => {
                let line = cleaned
                    .lines()
                    .nth(position.line.saturating_sub(1))
                    .unwrap_or_default();
                LintReport::error(format!(
                    "Formula syntax error at {}: {}\n  Line: {}\n  Location: {}^",
                    position,
                    message,
                    line,
                    " ".repeat(position.column.saturating_sub(1))
                ))
            }
            Err(err) => LintReport::error(format!("Unexpected error while parsing formula: {}", err)),
        }
    }
}

/// Linter configuration
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Names of rules to skip
    pub disabled_rules: Vec<String>,
}

impl LintOptions {
    /// Create default options (every rule enabled)
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip a rule by name
    pub fn disable(mut self, rule: impl Into<String>) -> Self {
        self.disabled_rules.push(rule.into());
        self
    }
}

/// Aggregated results of a lint run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintSummary {
    pub files_checked: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LintSummary {
    /// True if any error was found
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record a file that could not be linted at all
    pub fn push_file_error(&mut self, file: &str, message: impl std::fmt::Display) {
        self.files_checked += 1;
        self.errors.push(format!("{}: {}", file, message));
    }
}

/// Runs lint rules over formula definitions
pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

impl Linter {
    /// Linter with every built-in rule
    pub fn new() -> Self {
        Self::with_options(&LintOptions::default())
    }

    /// Linter with the built-in rules not disabled by `options`
    pub fn with_options(options: &LintOptions) -> Self {
        let all: Vec<Box<dyn LintRule>> = vec![
            Box::new(NoLeadingEquals),
            Box::new(NoTopLevelLambda),
            Box::new(RequireParameterExamples),
            Box::new(ValidFormulaSyntax),
        ];
        let rules = all
            .into_iter()
            .filter(|rule| !options.disabled_rules.iter().any(|d| d == rule.name()))
            .collect();
        Self { rules }
    }

    /// Add a custom rule
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Active rules, in run order
    pub fn rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Run every rule on one definition; messages are not prefixed
    pub fn lint_definition(&self, definition: &FormulaDefinition) -> LintReport {
        let mut report = LintReport::default();
        for rule in &self.rules {
            let found = rule.check(definition);
            if !found.is_clean() {
                tracing::debug!("{}: {} reported issues", definition.name, rule.name());
            }
            report.errors.extend(found.errors);
            report.warnings.extend(found.warnings);
        }
        report
    }

    /// Lint every definition; messages are prefixed with the source file
    /// (or the formula name when the source is unknown)
    pub fn lint_catalog(&self, catalog: &Catalog) -> LintSummary {
        let mut summary = LintSummary::default();
        for definition in catalog.iter() {
            self.record(&mut summary, definition);
        }
        summary
    }

    /// Lint every formula file in a directory
    ///
    /// Bodies are read with comments kept. A file that fails to load is
    /// reported as an error for that file; only a missing or unreadable
    /// directory fails the run.
    pub fn lint_dir<P: AsRef<Path>>(&self, dir: P, options: &YamlReadOptions) -> YamlResult<LintSummary> {
        let options = options.clone().keep_comments();
        let mut summary = LintSummary::default();

        for path in YamlReader::formula_files(dir.as_ref(), &options)? {
            match YamlReader::read_file(&path, &options) {
                Ok(definition) => self.record(&mut summary, &definition),
                Err(err) => {
                    let file = match err.file() {
                        Some(file) => file.to_string(),
                        None => path.display().to_string(),
                    };
                    let message = err.to_string();
                    // Loader messages already start with the file name
                    let message = message
                        .strip_prefix(&format!("{}: ", file))
                        .unwrap_or(&message)
                        .to_string();
                    summary.push_file_error(&file, message);
                }
            }
        }

        Ok(summary)
    }

    fn record(&self, summary: &mut LintSummary, definition: &FormulaDefinition) {
        let file = definition.source.as_deref().unwrap_or(&definition.name);
        let report = self.lint_definition(definition);
        summary.files_checked += 1;
        summary
            .errors
            .extend(report.errors.into_iter().map(|e| format!("{}: {}", file, e)));
        summary
            .warnings
            .extend(report.warnings.into_iter().map(|w| format!("{}: {}", file, w)));
    }
}
