//! Recursive inlining of named function calls
//!
//! Every named call in a body is replaced by the callee's own expansion, with
//! the call's arguments substituted for the callee's parameters and the result
//! wrapped in parentheses. Callees are expanded before their callers, each at
//! most once, driven by an explicit work stack rather than recursion.
//!
//! Replacements are bound to the byte spans the parser recorded for each call
//! site, so the output keeps the caller's own text around every call.

use crate::ast::{AstNode, Span};
use crate::error::{ExpandError, FormulaError, FormulaResult};
use crate::extract::{extract_calls, CallSite};
use crate::parser::{parse_formula_with, ParserOptions};
use crate::render::reconstruct_call;
use crate::substitute::substitute;
use formulary_core::{Catalog, FormulaDefinition};
use std::collections::BTreeSet;

/// Prefixes after which an expanded formula gets its `=` back
pub const DEFAULT_EQUALS_PREFIXES: &[&str] = &[
    "LET(",
    "LAMBDA(",
    "BYROW(",
    "BYCOL(",
    "MAKEARRAY(",
    "FILTER(",
    "DENSIFY(",
];

/// Expansion options
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// An expanded formula starting with one of these gets a leading `=`.
    /// Empty disables the rule.
    pub equals_prefixes: Vec<String>,
    /// Grammar options used when parsing bodies
    pub parser: ParserOptions,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            equals_prefixes: DEFAULT_EQUALS_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            parser: ParserOptions::default(),
        }
    }
}

impl ExpandOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the `=` prefix list
    pub fn with_equals_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equals_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Set grammar options
    pub fn with_parser_options(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Unexpanded,
    Expanding,
    Expanded(String),
    Failed(FormulaError),
}

/// Memoizing expander over one catalog
///
/// # Example
/// ```rust
/// use formulary_core::{Catalog, FormulaDefinition};
/// use formulary_formula::Expander;
///
/// let mut catalog = Catalog::new();
/// catalog.insert(FormulaDefinition::new("BLANK", "IF(,,)")).unwrap();
/// catalog
///     .insert(FormulaDefinition::new("WRAP", "IF(ISBLANK(x), BLANK(), x)").with_parameters(["x"]))
///     .unwrap();
///
/// let mut expander = Expander::new(&catalog);
/// assert_eq!(expander.expand("WRAP").unwrap(), "IF(ISBLANK(x), (IF(,,)), x)");
/// ```
#[derive(Debug)]
pub struct Expander<'c> {
    catalog: &'c Catalog,
    options: ExpandOptions,
    /// Parsed `expression()` of each definition, by catalog index
    asts: Vec<FormulaResult<AstNode>>,
    slots: Vec<Slot>,
    expansions: usize,
}

impl<'c> Expander<'c> {
    /// Create an expander with default options
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_options(catalog, ExpandOptions::default())
    }

    /// Create an expander; every body is parsed up front
    pub fn with_options(catalog: &'c Catalog, options: ExpandOptions) -> Self {
        let asts = catalog
            .iter()
            .map(|def| parse_formula_with(def.expression(), &options.parser))
            .collect();
        Self {
            catalog,
            options,
            asts,
            slots: vec![Slot::Unexpanded; catalog.len()],
            expansions: 0,
        }
    }

    /// The catalog being expanded
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Parsed body of the definition at `idx`
    ///
    /// Spans index into [`FormulaDefinition::expression`].
    pub fn parsed(&self, idx: usize) -> Option<Result<&AstNode, &FormulaError>> {
        self.asts.get(idx).map(Result::as_ref)
    }

    /// Number of bodies expanded so far (cache hits are not counted)
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Cached expansion, if `name` has been expanded successfully
    pub fn expanded(&self, name: &str) -> Option<&str> {
        let idx = self.catalog.index_of(name)?;
        match &self.slots[idx] {
            Slot::Expanded(text) => Some(text),
            _ => None,
        }
    }

    /// Expand a formula by name
    pub fn expand(&mut self, name: &str) -> Result<String, ExpandError> {
        let idx = self.catalog.index_of(name).ok_or_else(|| {
            ExpandError::new(name, FormulaError::UnknownFunction(name.to_string()))
        })?;
        self.expand_index(idx)
    }

    /// Expand the formula at catalog index `root`, and everything it calls
    ///
    /// A circular reference or an expansion that left its body unchanged is
    /// reported against the formula it was found in, which may be a callee of
    /// `root`. Other failures of a callee surface as
    /// [`FormulaError::DependencyFailed`] for `root`.
    pub fn expand_index(&mut self, root: usize) -> Result<String, ExpandError> {
        let mut stack: Vec<(usize, bool)> = vec![(root, false)];
        // Formulas in the Expanding state, outermost first
        let mut path: Vec<usize> = Vec::new();

        while let Some((idx, ready)) = stack.pop() {
            if ready {
                // All callees are settled
                path.pop();
                match self.inline_calls(idx) {
                    Ok(text) => {
                        self.expansions += 1;
                        self.slots[idx] = Slot::Expanded(text);
                    }
                    Err(err) if err.is_fatal() => {
                        self.slots[idx] = Slot::Failed(err.clone());
                        self.abandon(&path);
                        return Err(ExpandError::new(self.name(idx), err));
                    }
                    Err(err) => {
                        tracing::debug!("{}: expansion failed: {}", self.name(idx), err);
                        self.slots[idx] = Slot::Failed(err);
                    }
                }
                continue;
            }

            if matches!(self.slots[idx], Slot::Expanded(_) | Slot::Failed(_)) {
                tracing::trace!("{}: cached", self.name(idx));
                continue;
            }

            if matches!(self.slots[idx], Slot::Expanding) {
                let start = path.iter().position(|&p| p == idx).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|&p| self.name(p).to_string()).collect();
                cycle.push(self.name(idx).to_string());
                self.abandon(&path);
                return Err(ExpandError::new(
                    self.name(root),
                    FormulaError::CircularReference { path: cycle },
                ));
            }

            let callees = match self.callees(idx) {
                Ok(callees) => callees,
                Err(err) => {
                    self.slots[idx] = Slot::Failed(err);
                    continue;
                }
            };

            self.slots[idx] = Slot::Expanding;
            path.push(idx);
            stack.push((idx, true));
            for callee in callees.into_iter().rev() {
                if matches!(self.slots[callee], Slot::Unexpanded | Slot::Expanding) {
                    stack.push((callee, false));
                }
            }
        }

        match &self.slots[root] {
            Slot::Expanded(text) => Ok(text.clone()),
            Slot::Failed(err) => Err(ExpandError::new(self.name(root), err.clone())),
            Slot::Unexpanded | Slot::Expanding => Err(ExpandError::new(
                self.name(root),
                FormulaError::DependencyFailed(self.name(root).to_string()),
            )),
        }
    }

    fn name(&self, idx: usize) -> &'c str {
        self.catalog
            .get_index(idx)
            .map_or("", |def| def.name.as_str())
    }

    /// Reset formulas left mid-expansion by an aborted run
    fn abandon(&mut self, path: &[usize]) {
        for &idx in path {
            if matches!(self.slots[idx], Slot::Expanding) {
                self.slots[idx] = Slot::Unexpanded;
            }
        }
    }

    /// Distinct catalog indices called by the body at `idx`, in source order
    fn callees(&self, idx: usize) -> FormulaResult<Vec<usize>> {
        let ast = self.asts[idx].as_ref().map_err(Clone::clone)?;
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        let mut sites = extract_calls(ast, self.catalog);
        sites.sort_by_key(|site| site.span.start);
        for site in sites {
            if let Some(callee) = self.catalog.index_of(site.function_name) {
                if seen.insert(callee) {
                    ordered.push(callee);
                }
            }
        }
        Ok(ordered)
    }

    /// Build the expansion of `idx`; every callee must already be settled
    fn inline_calls(&self, idx: usize) -> FormulaResult<String> {
        let def = self
            .catalog
            .get_index(idx)
            .ok_or_else(|| FormulaError::UnknownFunction(idx.to_string()))?;
        let source = def.expression();
        let ast = self.asts[idx].as_ref().map_err(Clone::clone)?;

        let sites = extract_calls(ast, self.catalog);
        if sites.is_empty() {
            return Ok(def.body.trim().to_string());
        }

        let mut replacements: Vec<(Span, String)> = Vec::with_capacity(sites.len());
        for site in &sites {
            let substituted = self.inline_site(def, source, site, &replacements)?;
            replacements.push((site.span, format!("({})", substituted)));
        }

        // The whole body was one call: drop the wrapping parentheses
        let root = ast.span();
        let mut result = match replacements.iter().find(|(span, _)| *span == root) {
            Some((_, text)) => text[1..text.len() - 1].to_string(),
            None => splice(source, root, &replacements),
        };

        let needs_equals = !result.starts_with('=')
            && self
                .options
                .equals_prefixes
                .iter()
                .any(|prefix| result.starts_with(prefix.as_str()));
        if needs_equals {
            result.insert(0, '=');
        }

        verify_changed(source, &result, &sites)?;
        Ok(result)
    }

    fn inline_site(
        &self,
        caller: &FormulaDefinition,
        source: &str,
        site: &CallSite<'_>,
        replacements: &[(Span, String)],
    ) -> FormulaResult<String> {
        let name = site.function_name;
        let callee_idx = self
            .catalog
            .index_of(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;
        let callee = self
            .catalog
            .get_index(callee_idx)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;
        let body = match &self.slots[callee_idx] {
            Slot::Expanded(text) => text.trim().trim_start_matches('=').trim(),
            _ => return Err(FormulaError::DependencyFailed(name.to_string())),
        };

        let args: Vec<String> = site
            .args
            .iter()
            .map(|arg| splice(source, arg.span(), replacements).trim().to_string())
            .collect();

        tracing::debug!(
            "{}: inlining {} at depth {}",
            caller.name,
            reconstruct_call(name, site.args),
            site.depth
        );

        let parameters: Vec<&str> = callee.parameter_names().collect();
        substitute(name, body, &parameters, &args)
    }
}

/// Text of `range` in `source` with replacements applied
///
/// Only replacements lying entirely inside `range` are used. Where two
/// overlap, the outer one wins; it already contains the inner expansion.
pub fn splice(source: &str, range: Span, replacements: &[(Span, String)]) -> String {
    let mut chosen: Vec<&(Span, String)> = replacements
        .iter()
        .filter(|(span, _)| range.contains(span))
        .collect();
    chosen.sort_by(|a, b| a.0.start.cmp(&b.0.start).then(b.0.end.cmp(&a.0.end)));

    let mut out = String::with_capacity(range.len());
    let mut cursor = range.start;
    for (span, text) in chosen {
        if span.start < cursor {
            continue;
        }
        out.push_str(&source[cursor..span.start]);
        out.push_str(text);
        cursor = span.end;
    }
    out.push_str(&source[cursor..range.end]);
    out
}

/// A body that calls named functions must change when expanded
fn verify_changed(original: &str, expanded: &str, sites: &[CallSite<'_>]) -> FormulaResult<()> {
    let expanded = expanded.trim_start_matches('=').trim();
    if sites.is_empty() || expanded != original.trim() {
        return Ok(());
    }
    let dependencies: BTreeSet<&str> = sites.iter().map(|site| site.function_name).collect();
    Err(FormulaError::ExpansionConsistency {
        dependencies: dependencies.into_iter().map(String::from).collect(),
    })
}
