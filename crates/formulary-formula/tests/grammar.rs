//! Parser, extractor and reconstructor behaviour on whole formulas.

use formulary_formula::{
    extract_calls, parse_formula, reconstruct_call, AstNode, FormulaError, QuoteStyle,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_rejection_set() {
    for text in ["A1 B1", "A1::", "((", "FUNC(", ")", "A1+", "+", "{}", "{,}"] {
        let result = parse_formula(text);
        assert!(
            matches!(result, Err(FormulaError::Parse { .. })),
            "{text:?} should not parse, got {result:?}"
        );
    }
}

#[test]
fn test_acceptance_set() {
    for text in ["=A1+B1", "FUNC()", "FUNC(,)", "--A1"] {
        assert!(parse_formula(text).is_ok(), "{text:?} should parse");
    }
}

#[test]
fn test_empty_argument_round_trip() {
    let ast = parse_formula("IF(,,)").unwrap();
    let AstNode::FunctionCall { name, args, .. } = &ast else {
        panic!("expected a call, got {ast:?}");
    };
    assert!(args.iter().all(AstNode::is_empty_argument));
    assert_eq!(reconstruct_call(name, args), "IF(,,)");
}

#[test]
fn test_string_escaping() {
    let ast = parse_formula(r#"FUNC("Say ""Hello""")"#).unwrap();
    let AstNode::FunctionCall { args, .. } = &ast else {
        panic!("expected a call, got {ast:?}");
    };
    assert_eq!(args.len(), 1);
    let AstNode::StringLiteral { value, quote, .. } = &args[0] else {
        panic!("expected a string, got {:?}", args[0]);
    };
    assert_eq!(value, "Say \"Hello\"");
    assert_eq!(*quote, QuoteStyle::Double);
    assert_eq!(args[0].to_string(), r#""Say ""Hello""""#);
}

#[test]
fn test_depth_ordering() {
    let ast = parse_formula("OUTER(INNER(x))").unwrap();
    let calls = extract_calls(&ast, &["OUTER", "INNER"]);

    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].function_name, "INNER");
    assert_eq!(calls[1].function_name, "OUTER");
    assert!(calls[0].depth > calls[1].depth);
}

#[test]
fn test_realistic_body_round_trips() {
    let body = r#"LET(num_cols, COLUMNS(range), IF(num_cols <> 2, ERROR("Expected 2 columns, got " & num_cols), BYROW(range, LAMBDA(row, INDEX(row, 1) & ": " & INDEX(row, 2)))))"#;
    assert_eq!(parse_formula(body).unwrap().to_string(), body);
}

#[test]
fn test_multiline_body_normalizes_whitespace() {
    let body = "LET(\n  total, SUM(A1:A10),\n  IF(total > 0, total, 0)\n)";
    assert_eq!(
        parse_formula(body).unwrap().to_string(),
        "LET(total, SUM(A1:A10), IF(total > 0, total, 0))"
    );
}

#[test]
fn test_calls_inside_lambda_bodies_are_found() {
    let ast = parse_formula("BYROW(data, LAMBDA(r, WRAP(INDEX(r, 1))))").unwrap();
    let calls = extract_calls(&ast, &["WRAP"]);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].depth, 0);
    assert_eq!(reconstruct_call(calls[0].function_name, calls[0].args), "WRAP(INDEX(r, 1))");
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z]{1,2}[1-9][0-9]{0,2}",
        "[a-z][a-z_]{0,6}",
        "[0-9]{1,3}",
        "[a-z ,()\"]{0,8}".prop_map(|v| format!("\"{}\"", v.replace('"', "\"\""))),
    ]
}

/// Formula text already in the form the reconstructor emits
fn canonical_formula() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        let arg = prop_oneof![1 => Just(String::new()), 4 => inner.clone()];
        let op = prop_oneof![
            Just("+"),
            Just("-"),
            Just("*"),
            Just("/"),
            Just("^"),
            Just("&"),
            Just("="),
            Just("<>"),
            Just("<="),
            Just(">="),
            Just("AND"),
            Just("OR"),
        ];
        prop_oneof![
            ("[A-Z][A-Z0-9]{1,5}", prop::collection::vec(arg, 1..4)).prop_map(|(name, args)| {
                let mut text = format!("{name}(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        text.push_str(if arg.is_empty() { "," } else { ", " });
                    }
                    text.push_str(arg);
                }
                text.push(')');
                text
            }),
            inner.clone().prop_map(|e| format!("({e})")),
            (inner.clone(), op, any::<bool>(), inner)
                .prop_map(|(a, op, neg, b)| format!("{a} {op} {}{b}", if neg { "-" } else { "" })),
        ]
    })
}

proptest! {
    #[test]
    fn prop_reconstruct_inverts_parse(text in canonical_formula()) {
        let ast = parse_formula(&text).map_err(|e| TestCaseError::fail(format!("{text}: {e}")))?;
        prop_assert_eq!(ast.to_string(), text);
    }

    #[test]
    fn prop_nested_calls_sorted_deepest_first(depth in 1usize..8) {
        let names: Vec<String> = (0..depth).map(|i| format!("F{i}")).collect();
        let mut text = String::from("x");
        for name in names.iter().rev() {
            text = format!("{name}({text})");
        }

        let ast = parse_formula(&text).unwrap();
        let known: Vec<&str> = names.iter().map(String::as_str).collect();
        let calls = extract_calls(&ast, known.as_slice());

        prop_assert_eq!(calls.len(), depth);
        for (i, call) in calls.iter().enumerate() {
            prop_assert_eq!(call.depth, depth - 1 - i);
            prop_assert_eq!(call.function_name, names[depth - 1 - i].as_str());
        }
    }
}
