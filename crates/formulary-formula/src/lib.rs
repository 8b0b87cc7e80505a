//! # formulary-formula
//!
//! Formula grammar and expansion engine for formulary.
//!
//! This crate provides:
//! - Formula parsing (text → AST with source spans)
//! - Named call extraction, deepest call first
//! - Call reconstruction (AST → text)
//! - Whole-token parameter substitution
//! - Memoized inlining of named functions into their callers
//! - Dependency graph and cycle detection
//!
//! ## Example
//!
//! ```rust
//! use formulary_formula::{extract_calls, parse_formula};
//!
//! let ast = parse_formula("=OUTER(INNER(A1:A10), 2)").unwrap();
//! let calls = extract_calls(&ast, &["OUTER", "INNER"]);
//! assert_eq!(calls[0].function_name, "INNER");
//! assert_eq!(ast.to_string(), "OUTER(INNER(A1:A10), 2)");
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod expand;
pub mod extract;
pub mod parser;
pub mod render;
pub mod substitute;

pub use ast::{AstNode, BinaryOperator, QuoteStyle, SequenceItem, Span, UnaryOperator};
pub use dependency::{Cycle, DependencyGraph};
pub use error::{ExpandError, FormulaError, FormulaResult, Position};
pub use expand::{splice, ExpandOptions, Expander, DEFAULT_EQUALS_PREFIXES};
pub use extract::{called_names, extract_calls, CallSite, FunctionNames};
pub use parser::{parse_formula, parse_formula_with, ParserOptions, MAX_NESTING};
pub use render::reconstruct_call;
pub use substitute::substitute;
