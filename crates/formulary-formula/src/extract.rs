//! Named call extraction
//!
//! Walks an AST and collects every call to a known named function, tagged with
//! how many named calls enclose it.

use crate::ast::{AstNode, Span};
use ahash::AHashSet;
use formulary_core::Catalog;
use std::collections::{BTreeSet, HashSet};

/// A set of names that count as named functions during extraction
pub trait FunctionNames {
    /// Check if `name` is a named function
    fn is_named_function(&self, name: &str) -> bool;
}

impl<S: std::hash::BuildHasher> FunctionNames for HashSet<String, S> {
    fn is_named_function(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<S: std::hash::BuildHasher> FunctionNames for HashSet<&str, S> {
    fn is_named_function(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FunctionNames for AHashSet<String> {
    fn is_named_function(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FunctionNames for BTreeSet<String> {
    fn is_named_function(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FunctionNames for BTreeSet<&str> {
    fn is_named_function(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FunctionNames for [&str] {
    fn is_named_function(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

impl<const N: usize> FunctionNames for [&str; N] {
    fn is_named_function(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

impl FunctionNames for Catalog {
    fn is_named_function(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<T: FunctionNames + ?Sized> FunctionNames for &T {
    fn is_named_function(&self, name: &str) -> bool {
        (**self).is_named_function(name)
    }
}

/// One occurrence of a named call inside a parsed formula
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite<'a> {
    pub function_name: &'a str,
    pub args: &'a [AstNode],
    /// Number of named calls enclosing this one (0 = not nested)
    pub depth: usize,
    /// Source span of the whole call, name through closing parenthesis
    pub span: Span,
}

/// Collect calls to named functions, deepest first
///
/// Builtin calls are not recorded but their arguments are still searched.
/// Sites at equal depth keep source order.
///
/// # Example
/// ```rust
/// use formulary_formula::{extract_calls, parse_formula};
///
/// let ast = parse_formula("OUTER(INNER(x))").unwrap();
/// let calls = extract_calls(&ast, &["OUTER", "INNER"]);
/// assert_eq!(calls[0].function_name, "INNER");
/// assert_eq!(calls[1].function_name, "OUTER");
/// ```
pub fn extract_calls<'a, N>(ast: &'a AstNode, known: &N) -> Vec<CallSite<'a>>
where
    N: FunctionNames + ?Sized,
{
    let mut sites = Vec::new();
    collect(ast, known, 0, &mut sites);
    // Stable: equal depths stay in source order
    sites.sort_by(|a, b| b.depth.cmp(&a.depth));
    sites
}

fn collect<'a, N>(node: &'a AstNode, known: &N, depth: usize, sites: &mut Vec<CallSite<'a>>)
where
    N: FunctionNames + ?Sized,
{
    match node {
        AstNode::FunctionCall { name, args, span } => {
            let child_depth = if known.is_named_function(name) {
                sites.push(CallSite {
                    function_name: name,
                    args,
                    depth,
                    span: *span,
                });
                depth + 1
            } else {
                depth
            };
            for arg in args {
                collect(arg, known, child_depth, sites);
            }
        }
        AstNode::Invocation { callee, args, .. } => {
            collect(callee, known, depth, sites);
            for arg in args {
                collect(arg, known, depth, sites);
            }
        }
        AstNode::Parenthesized { inner, .. } => collect(inner, known, depth, sites),
        AstNode::Sequence { items, .. } => {
            for item in items {
                collect(&item.operand, known, depth, sites);
            }
        }
        AstNode::StringLiteral { .. }
        | AstNode::Number { .. }
        | AstNode::ArrayLiteral { .. }
        | AstNode::Identifier { .. }
        | AstNode::EmptyArgument { .. } => {}
    }
}

/// Distinct named functions called anywhere in `ast`, sorted by name
pub fn called_names<N>(ast: &AstNode, known: &N) -> BTreeSet<String>
where
    N: FunctionNames + ?Sized,
{
    extract_calls(ast, known)
        .into_iter()
        .map(|site| site.function_name.to_string())
        .collect()
}
