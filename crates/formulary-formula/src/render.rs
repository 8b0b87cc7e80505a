//! Formula text reconstruction
//!
//! Turns AST nodes back into formula text. Output matches the parsed source
//! up to whitespace: arguments are joined with `", "` (just `","` before an
//! elided argument) and operator chains with single spaces.

use crate::ast::{AstNode, SequenceItem};
use std::fmt::{self, Write};

/// Reconstruct `NAME(arg, ...)` from a function name and its arguments
///
/// # Example
/// ```rust
/// use formulary_formula::{parse_formula, reconstruct_call, AstNode};
///
/// let ast = parse_formula("IF(,,)").unwrap();
/// if let AstNode::FunctionCall { name, args, .. } = &ast {
///     assert_eq!(reconstruct_call(name, args), "IF(,,)");
/// }
/// ```
pub fn reconstruct_call(name: &str, args: &[AstNode]) -> String {
    let mut out = String::with_capacity(name.len() + 2 + args.len() * 8);
    out.push_str(name);
    // Writing into a String cannot fail
    let _ = write_argument_list(&mut out, args);
    out
}

fn write_argument_list(out: &mut impl Write, args: &[AstNode]) -> fmt::Result {
    out.write_char('(')?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.write_str(if arg.is_empty_argument() { "," } else { ", " })?;
        }
        write_node(out, arg)?;
    }
    out.write_char(')')
}

fn write_node(out: &mut impl Write, node: &AstNode) -> fmt::Result {
    match node {
        AstNode::FunctionCall { name, args, .. } => {
            out.write_str(name)?;
            write_argument_list(out, args)
        }
        AstNode::Invocation { callee, args, .. } => {
            write_node(out, callee)?;
            write_argument_list(out, args)
        }
        AstNode::StringLiteral { value, quote, .. } => {
            let q = quote.char();
            out.write_char(q)?;
            for c in value.chars() {
                if c == q {
                    out.write_char(q)?;
                }
                out.write_char(c)?;
            }
            out.write_char(q)
        }
        AstNode::Number { raw, .. } | AstNode::ArrayLiteral { raw, .. } => out.write_str(raw),
        AstNode::Identifier { name, .. } => out.write_str(name),
        AstNode::Parenthesized { inner, .. } => {
            out.write_char('(')?;
            write_node(out, inner)?;
            out.write_char(')')
        }
        AstNode::EmptyArgument { .. } => Ok(()),
        AstNode::Sequence { items, .. } => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(' ')?;
                }
                write_item(out, item)?;
            }
            Ok(())
        }
    }
}

fn write_item(out: &mut impl Write, item: &SequenceItem) -> fmt::Result {
    if let Some(op) = item.operator {
        out.write_str(op.symbol())?;
        out.write_char(' ')?;
    }
    for prefix in &item.prefixes {
        out.write_str(prefix.symbol())?;
    }
    write_node(out, &item.operand)
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;
    use pretty_assertions::assert_eq;

    fn roundtrip(text: &str) -> String {
        parse_formula(text).unwrap().to_string()
    }

    #[test]
    fn test_empty_arguments() {
        assert_eq!(roundtrip("IF(,,)"), "IF(,,)");
        assert_eq!(roundtrip("FUNC(,)"), "FUNC(,)");
        assert_eq!(roundtrip("FUNC()"), "FUNC()");
        assert_eq!(roundtrip("FUNC(a,,b)"), "FUNC(a,, b)");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(
            roundtrip(r#"FUNC("Say ""Hello""")"#),
            r#"FUNC("Say ""Hello""")"#
        );
        assert_eq!(roundtrip("'it''s'"), "'it''s'");
        assert_eq!(roundtrip(r#"'say "hi"'"#), r#"'say "hi"'"#);
    }

    #[test]
    fn test_whitespace_normalization() {
        assert_eq!(roundtrip("SUM( A1:A10 ,B1 )"), "SUM(A1:A10, B1)");
        assert_eq!(roundtrip("A1+B1*2"), "A1 + B1 * 2");
        assert_eq!(roundtrip("( a - b )"), "(a - b)");
    }

    #[test]
    fn test_operators_and_prefixes() {
        assert_eq!(roundtrip("--A1"), "--A1");
        assert_eq!(roundtrip("x>=1 and y<>2"), "x >= 1 AND y <> 2");
        assert_eq!(roundtrip("A1 * -B1"), "A1 * -B1");
        assert_eq!(roundtrip("\"a\"&B1"), "\"a\" & B1");
    }

    #[test]
    fn test_literals_kept_verbatim() {
        assert_eq!(roundtrip("{1,2;3,4}"), "{1,2;3,4}");
        assert_eq!(roundtrip("2.50E-3"), "2.50E-3");
        assert_eq!(roundtrip("$A$1:$B$2"), "$A$1:$B$2");
    }

    #[test]
    fn test_reconstruct_call_from_args() {
        let ast = parse_formula(r#"ERROR("Expected " & (num_cols - 1) & " cols")"#).unwrap();
        let AstNode::FunctionCall { name, args, .. } = &ast else {
            panic!("Expected FunctionCall");
        };
        assert_eq!(
            reconstruct_call(name, args),
            r#"ERROR("Expected " & (num_cols - 1) & " cols")"#
        );
    }
}
