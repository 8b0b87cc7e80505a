//! Formula parser
//!
//! A recursive descent parser for the spreadsheet formula dialect used in named
//! function bodies. It is structural only: it recognizes calls, literals,
//! references and operator chains well enough to find named calls at any depth
//! and to reproduce the source text, without assigning operator precedence.
//!
//! Term alternatives are tried in order: parenthesized expression, function
//! call, string, array, range, number, cell reference / bare identifier.

use crate::ast::{AstNode, BinaryOperator, QuoteStyle, SequenceItem, Span, UnaryOperator};
use crate::error::{FormulaError, FormulaResult, Position};

/// Deepest allowed nesting of parentheses and argument lists
pub const MAX_NESTING: usize = 256;

/// Grammar switches
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Accept a call followed directly by an argument list, `LAMBDA(x, x)(1)`
    pub allow_immediate_invocation: bool,
}

/// Parse a formula string into an AST
///
/// A leading `=` is optional. Spans in the returned tree index into `formula`.
///
/// # Example
/// ```rust
/// use formulary_formula::parse_formula;
///
/// let ast = parse_formula("=A1+B1").unwrap();
/// let ast = parse_formula("IF(,,)").unwrap();
/// let ast = parse_formula("FUNC(\"Say \"\"Hello\"\"\")").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<AstNode> {
    parse_formula_with(formula, &ParserOptions::default())
}

/// Parse a formula string with explicit grammar options
pub fn parse_formula_with(formula: &str, options: &ParserOptions) -> FormulaResult<AstNode> {
    let mut parser = FormulaParser::new(formula, options);

    parser.skip_whitespace();
    while parser.peek_char() == Some('=') {
        parser.advance();
    }
    parser.skip_whitespace();

    if parser.is_at_end() {
        return Err(parser.error("Empty formula"));
    }

    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    parser.skip_whitespace();
    if !parser.is_at_end() {
        return Err(parser.error(format!(
            "Unexpected characters after expression: '{}'",
            parser.remaining_preview()
        )));
    }

    Ok(expr)
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    options: &'a ParserOptions,
    /// Open parentheses and argument lists around the current position
    depth: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str, options: &'a ParserOptions) -> Self {
        Self {
            input,
            pos: 0,
            options,
            depth: 0,
        }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while self.peek_char().map_or(false, &pred) {
            self.advance();
        }
        self.pos - start
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(char::is_whitespace);
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn remaining_preview(&self) -> String {
        self.input[self.pos..].chars().take(20).collect()
    }

    fn error(&self, message: impl Into<String>) -> FormulaError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> FormulaError {
        FormulaError::Parse {
            message: message.into(),
            position: Position::locate(self.input, offset),
        }
    }

    /// Open one nesting level; `at` is the opening parenthesis
    fn enter(&mut self, at: usize) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error_at(
                at,
                format!("Nesting deeper than {} levels", MAX_NESTING),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn expect(&mut self, expected: char) -> FormulaResult<()> {
        match self.peek_char() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(self.error(format!("Expected '{}', got '{}'", expected, c))),
            None => Err(self.error(format!("Expected '{}', got end of formula", expected))),
        }
    }

    // === Expressions ===

    /// expression := unary_term (binary_operator unary_term)*
    fn parse_expression(&mut self) -> FormulaResult<AstNode> {
        self.skip_whitespace();
        let start = self.pos;

        let (prefixes, operand) = self.parse_unary_term()?;
        let mut items = vec![SequenceItem {
            operator: None,
            prefixes,
            operand,
        }];

        loop {
            let checkpoint = self.pos;
            self.skip_whitespace();
            let Some(op) = self.scan_binary_operator() else {
                self.pos = checkpoint;
                break;
            };
            let (prefixes, operand) = self.parse_unary_term()?;
            items.push(SequenceItem {
                operator: Some(op),
                prefixes,
                operand,
            });
        }

        if items.len() == 1 && items[0].prefixes.is_empty() {
            if let Some(item) = items.pop() {
                return Ok(item.operand);
            }
        }

        Ok(AstNode::Sequence {
            items,
            span: Span::new(start, self.pos),
        })
    }

    /// unary_term := ('+' | '-')* term
    fn parse_unary_term(&mut self) -> FormulaResult<(Vec<UnaryOperator>, AstNode)> {
        let mut prefixes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some('+') => prefixes.push(UnaryOperator::Plus),
                Some('-') => prefixes.push(UnaryOperator::Minus),
                _ => break,
            }
            self.advance();
        }

        let operand = self.parse_term()?;
        Ok((prefixes, operand))
    }

    /// Scan a binary operator at the current position, consuming it on success
    fn scan_binary_operator(&mut self) -> Option<BinaryOperator> {
        let c = self.peek_char()?;
        let next = self.peek_char_at(1);

        // Two-character operators first
        let two = match (c, next) {
            ('<', Some('=')) => Some(BinaryOperator::LessEqual),
            ('<', Some('>')) => Some(BinaryOperator::NotEqual),
            ('>', Some('=')) => Some(BinaryOperator::GreaterEqual),
            _ => None,
        };
        if let Some(op) = two {
            self.advance();
            self.advance();
            return Some(op);
        }

        let single = match c {
            '+' => Some(BinaryOperator::Add),
            '-' => Some(BinaryOperator::Subtract),
            '*' => Some(BinaryOperator::Multiply),
            '/' => Some(BinaryOperator::Divide),
            '^' => Some(BinaryOperator::Power),
            '&' => Some(BinaryOperator::Concat),
            '=' => Some(BinaryOperator::Equal),
            '<' => Some(BinaryOperator::LessThan),
            '>' => Some(BinaryOperator::GreaterThan),
            _ => None,
        };
        if let Some(op) = single {
            self.advance();
            return Some(op);
        }

        if self.scan_keyword("AND") {
            return Some(BinaryOperator::And);
        }
        if self.scan_keyword("OR") {
            return Some(BinaryOperator::Or);
        }

        None
    }

    /// Case-insensitive keyword that is not the prefix of a longer identifier
    fn scan_keyword(&mut self, keyword: &str) -> bool {
        let rest = &self.input[self.pos..];
        let Some(candidate) = rest.get(..keyword.len()) else {
            return false;
        };
        if !candidate.eq_ignore_ascii_case(keyword) {
            return false;
        }
        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |c| !is_identifier_char(c));
        if boundary {
            self.pos += keyword.len();
        }
        boundary
    }

    // === Terms ===

    fn parse_term(&mut self) -> FormulaResult<AstNode> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Err(self.error("Unexpected end of formula"));
        };

        if c == '(' {
            return self.parse_parenthesized();
        }

        if let Some(call) = self.try_parse_function_call()? {
            return self.parse_invocations(call);
        }

        match c {
            '"' => return self.parse_string(QuoteStyle::Double),
            '\'' => return self.parse_string(QuoteStyle::Single),
            '{' => return self.parse_array(),
            _ => {}
        }

        if let Some(range) = self.try_parse_range() {
            return Ok(range);
        }

        if let Some(number) = self.try_parse_number() {
            return Ok(number);
        }

        if let Some(identifier) = self.try_parse_identifier() {
            return Ok(identifier);
        }

        Err(self.error(format!("Unexpected character '{}'", c)))
    }

    fn parse_parenthesized(&mut self) -> FormulaResult<AstNode> {
        let start = self.pos;
        self.expect('(')?;
        self.enter(start)?;
        let inner = self.parse_expression()?;
        self.skip_whitespace();
        if self.is_at_end() {
            return Err(self.error_at(start, "Unbalanced parentheses: '(' is never closed"));
        }
        self.expect(')')?;
        self.leave();

        Ok(AstNode::Parenthesized {
            inner: Box::new(inner),
            span: Span::new(start, self.pos),
        })
    }

    /// NAME immediately followed by '('; returns `None` (without consuming) otherwise
    fn try_parse_function_call(&mut self) -> FormulaResult<Option<AstNode>> {
        let start = self.pos;
        match self.peek_char() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Ok(None),
        }
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if self.peek_char() != Some('(') {
            self.pos = start;
            return Ok(None);
        }

        let name = self.input[start..self.pos].to_string();
        let args = self.parse_argument_list(&name)?;

        Ok(Some(AstNode::FunctionCall {
            name,
            args,
            span: Span::new(start, self.pos),
        }))
    }

    /// '(' [arg (',' arg)*] ')', where an arg may be elided before ',' or ')'
    fn parse_argument_list(&mut self, owner: &str) -> FormulaResult<Vec<AstNode>> {
        let open = self.pos;
        self.expect('(')?;
        self.enter(open)?;

        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek_char() == Some(')') {
            self.advance();
            self.leave();
            return Ok(args);
        }

        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some(',') | Some(')') => args.push(AstNode::EmptyArgument {
                    span: Span::empty_at(self.pos),
                }),
                None => {
                    return Err(self.error_at(open, format!("Unclosed call to {}", owner)));
                }
                _ => args.push(self.parse_expression()?),
            }

            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => self.advance(),
                Some(')') => {
                    self.advance();
                    self.leave();
                    break;
                }
                None => {
                    return Err(self.error_at(open, format!("Unclosed call to {}", owner)));
                }
                Some(c) => {
                    return Err(self.error(format!(
                        "Expected ',' or ')' in arguments of {}, got '{}'",
                        owner, c
                    )));
                }
            }
        }

        Ok(args)
    }

    /// `CALL(...)(args)(args)...` when immediate invocation is enabled
    fn parse_invocations(&mut self, mut node: AstNode) -> FormulaResult<AstNode> {
        if !self.options.allow_immediate_invocation {
            return Ok(node);
        }

        while self.peek_char() == Some('(') {
            let start = node.span().start;
            let args = self.parse_argument_list("invocation")?;
            node = AstNode::Invocation {
                callee: Box::new(node),
                args,
                span: Span::new(start, self.pos),
            };
        }

        Ok(node)
    }

    /// Double- or single-quoted string with doubled-quote escaping
    fn parse_string(&mut self, quote: QuoteStyle) -> FormulaResult<AstNode> {
        let start = self.pos;
        let delimiter = quote.char();
        self.advance(); // Skip opening quote

        let mut value = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error_at(start, "Unterminated string literal"));
                }
                Some(c) if c == delimiter => {
                    // Check for escaped quote ("")
                    if self.peek_char_at(1) == Some(delimiter) {
                        value.push(delimiter);
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        break;
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Ok(AstNode::StringLiteral {
            value,
            quote,
            span: Span::new(start, self.pos),
        })
    }

    /// `{...}` up to the first '}', with at least one non-delimiter element
    fn parse_array(&mut self) -> FormulaResult<AstNode> {
        let start = self.pos;
        let Some(close) = self.input[start..].find('}').map(|i| start + i) else {
            return Err(self.error_at(start, "Unterminated array literal"));
        };

        let content = &self.input[start + 1..close];
        let has_element = content
            .chars()
            .any(|c| c != ',' && c != ';' && !c.is_whitespace());
        if !has_element {
            return Err(self.error_at(start, "Array literal must contain at least one element"));
        }

        self.pos = close + 1;
        Ok(AstNode::ArrayLiteral {
            raw: self.input[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        })
    }

    /// `[A-Za-z$]*[0-9$]*:[A-Za-z$]*[0-9$]*` (A1:B10, A:A, 1:1, $A$1:$B$2)
    fn try_parse_range(&mut self) -> Option<AstNode> {
        let start = self.pos;
        let column = |c: char| c.is_ascii_alphabetic() || c == '$';
        let row = |c: char| c.is_ascii_digit() || c == '$';

        self.advance_while(column);
        self.advance_while(row);
        if self.peek_char() != Some(':') {
            self.pos = start;
            return None;
        }
        self.advance();
        self.advance_while(column);
        self.advance_while(row);

        Some(AstNode::Identifier {
            name: self.input[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        })
    }

    /// Integer, decimal (`1.`, `.5`, `3.14`) or scientific (`1e10`, `2.5E-3`)
    fn try_parse_number(&mut self) -> Option<AstNode> {
        let start = self.pos;

        let int_digits = self.advance_while(|c| c.is_ascii_digit());
        let mut frac_digits = 0;
        if self.peek_char() == Some('.') {
            let dot = self.pos;
            self.advance();
            frac_digits = self.advance_while(|c| c.is_ascii_digit());
            if int_digits == 0 && frac_digits == 0 {
                self.pos = dot;
            }
        }
        if int_digits == 0 && frac_digits == 0 {
            self.pos = start;
            return None;
        }

        // Exponent part, only when digits follow
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let mark = self.pos;
            self.advance();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.advance();
            }
            if self.advance_while(|c| c.is_ascii_digit()) == 0 {
                self.pos = mark;
            }
        }

        Some(AstNode::Number {
            raw: self.input[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        })
    }

    /// Cell reference (`A1`, `$B$2`) or bare identifier (`range`, `TRUE`, `_x`)
    fn try_parse_identifier(&mut self) -> Option<AstNode> {
        let start = self.pos;
        match self.peek_char() {
            Some(c) if c.is_ascii_alphabetic() || c == '$' || c == '_' => {}
            _ => return None,
        }
        self.advance_while(is_identifier_char);

        Some(AstNode::Identifier {
            name: self.input[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        })
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call_parts(ast: &AstNode) -> (&str, &[AstNode]) {
        match ast {
            AstNode::FunctionCall { name, args, .. } => (name.as_str(), args.as_slice()),
            other => panic!("Expected FunctionCall, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_call() {
        let ast = parse_formula("FUNC(arg1, arg2)").unwrap();
        let (name, args) = call_parts(&ast);
        assert_eq!(name, "FUNC");
        assert_eq!(args.len(), 2);
        assert!(matches!(&args[0], AstNode::Identifier { name, .. } if name == "arg1"));
    }

    #[test]
    fn test_parse_zero_and_empty_arguments() {
        let ast = parse_formula("BLANK()").unwrap();
        assert_eq!(call_parts(&ast).1.len(), 0);

        let ast = parse_formula("BLANK( )").unwrap();
        assert_eq!(call_parts(&ast).1.len(), 0);

        let ast = parse_formula("FUNC(,)").unwrap();
        let (_, args) = call_parts(&ast);
        assert_eq!(args.len(), 2);
        assert!(args.iter().all(AstNode::is_empty_argument));

        let ast = parse_formula("IF(,,)").unwrap();
        let (_, args) = call_parts(&ast);
        assert_eq!(args.len(), 3);
        assert!(args.iter().all(AstNode::is_empty_argument));

        let ast = parse_formula("FUNC(a,,b)").unwrap();
        let (_, args) = call_parts(&ast);
        assert_eq!(args.len(), 3);
        assert!(args[1].is_empty_argument());
    }

    #[test]
    fn test_parse_string_escaping() {
        let ast = parse_formula(r#"FUNC("Say ""Hello""")"#).unwrap();
        let (_, args) = call_parts(&ast);
        assert_eq!(args.len(), 1);
        match &args[0] {
            AstNode::StringLiteral { value, quote, .. } => {
                assert_eq!(value, "Say \"Hello\"");
                assert_eq!(*quote, QuoteStyle::Double);
            }
            other => panic!("Expected StringLiteral, got {:?}", other),
        }

        let ast = parse_formula("'it''s'").unwrap();
        assert!(matches!(
            ast,
            AstNode::StringLiteral { ref value, quote: QuoteStyle::Single, .. } if value == "it's"
        ));
    }

    #[test]
    fn test_delimiters_inside_strings() {
        let ast = parse_formula(r#"FUNC("value, with, commas", arg2)"#).unwrap();
        assert_eq!(call_parts(&ast).1.len(), 2);

        let ast = parse_formula(r#"FUNC("value (with parens)")"#).unwrap();
        assert_eq!(call_parts(&ast).1.len(), 1);
    }

    #[test]
    fn test_parse_ranges_and_references() {
        for text in ["A1:B10", "A:A", "1:1", "$A$1:$B$2"] {
            let ast = parse_formula(text).unwrap();
            assert!(
                matches!(&ast, AstNode::Identifier { name, .. } if name == text),
                "{text} parsed as {ast:?}"
            );
        }

        let ast = parse_formula("header_rows").unwrap();
        assert!(matches!(ast, AstNode::Identifier { ref name, .. } if name == "header_rows"));
    }

    #[test]
    fn test_parse_numbers() {
        for text in ["42", "3.14", ".5", "1e10", "2.5E-3"] {
            let ast = parse_formula(text).unwrap();
            assert!(
                matches!(&ast, AstNode::Number { raw, .. } if raw == text),
                "{text} parsed as {ast:?}"
            );
        }
    }

    #[test]
    fn test_parse_array() {
        let ast = parse_formula("{1,2;3,4}").unwrap();
        assert!(matches!(ast, AstNode::ArrayLiteral { ref raw, .. } if raw == "{1,2;3,4}"));
    }

    #[test]
    fn test_parse_operator_chain() {
        let ast = parse_formula("A1 + B1 * 2").unwrap();
        match ast {
            AstNode::Sequence { items, span } => {
                assert_eq!(span, Span::new(0, 11));
                let ops: Vec<_> = items.iter().map(|i| i.operator).collect();
                assert_eq!(
                    ops,
                    vec![
                        None,
                        Some(BinaryOperator::Add),
                        Some(BinaryOperator::Multiply)
                    ]
                );
            }
            other => panic!("Expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_keyword_operators() {
        let ast = parse_formula("x > 1 and y < 2").unwrap();
        let AstNode::Sequence { items, .. } = ast else {
            panic!("Expected Sequence");
        };
        assert_eq!(items[2].operator, Some(BinaryOperator::And));

        // Not an operator when part of a longer identifier
        assert!(parse_formula("x ANDROID").is_err());
    }

    #[test]
    fn test_parse_unary_prefixes() {
        let ast = parse_formula("--A1").unwrap();
        let AstNode::Sequence { items, .. } = ast else {
            panic!("Expected Sequence");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].prefixes,
            vec![UnaryOperator::Minus, UnaryOperator::Minus]
        );

        assert!(parse_formula("A1 * -B1").is_ok());
        assert!(parse_formula("A1 + + B1").is_ok());
        assert!(parse_formula("+-(A1)").is_ok());
    }

    #[test]
    fn test_parse_parenthesized() {
        let ast = parse_formula(r#"ERROR("text" & (num_cols - 1))"#).unwrap();
        let (_, args) = call_parts(&ast);
        let AstNode::Sequence { items, .. } = &args[0] else {
            panic!("Expected Sequence");
        };
        assert!(matches!(items[1].operand, AstNode::Parenthesized { .. }));
    }

    #[test]
    fn test_spans_index_source() {
        let text = "  =OUTER(x, INNER(y))";
        let ast = parse_formula(text).unwrap();
        assert_eq!(ast.span().slice(text), "OUTER(x, INNER(y))");
        let (_, args) = call_parts(&ast);
        assert_eq!(args[1].span().slice(text), "INNER(y)");
    }

    #[test]
    fn test_multiline_let() {
        let formula = "LET(\n  x, SUM(A1:A10),\n  y, x * 2,\n  y\n)";
        let ast = parse_formula(formula).unwrap();
        assert_eq!(call_parts(&ast).1.len(), 5);
    }

    #[test]
    fn test_accepts_valid_formulas() {
        for text in ["=A1+B1", "FUNC()", "FUNC(,)", "--A1", "NORM.DIST(x, 0, 1, TRUE)"] {
            assert!(parse_formula(text).is_ok(), "{text} should parse");
        }
    }

    #[test]
    fn test_rejects_invalid_formulas() {
        for text in [
            "A1 B1", "A1::", "((", "FUNC(", ")", "A1+", "+", "{}", "{,}", "", "   ", "1.2.3",
            "\"hello", "'hello", "FUNC)", "OUTER(INNER(", ":::", "{1,2,3", "A1 * / B1", "*A1",
            "/A1", "FUNC (x)",
        ] {
            assert!(
                matches!(parse_formula(text), Err(FormulaError::Parse { .. })),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_position() {
        let err = parse_formula("LET(\n  x, 1,\n  y +)").unwrap_err();
        match err {
            FormulaError::Parse { position, .. } => {
                assert_eq!(position.line, 3);
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parse_formula(&at_limit).is_ok());

        let calls = format!("{}1{}", "F(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parse_formula(&calls).is_ok());

        let deep = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        match parse_formula(&deep) {
            Err(FormulaError::Parse { message, position }) => {
                assert!(message.starts_with("Nesting deeper than"), "{message}");
                assert_eq!(position.offset, MAX_NESTING);
                assert_eq!(position.column, MAX_NESTING + 1);
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }

        let mixed = format!("{}1{}", "SUM((".repeat(10_000), "))".repeat(10_000));
        assert!(matches!(
            parse_formula(&mixed),
            Err(FormulaError::Parse { .. })
        ));
    }

    #[test]
    fn test_immediate_invocation_is_configurable() {
        let text = "LAMBDA(x, x + 1)(2)";
        assert!(parse_formula(text).is_err());

        let options = ParserOptions {
            allow_immediate_invocation: true,
        };
        let ast = parse_formula_with(text, &options).unwrap();
        match ast {
            AstNode::Invocation { callee, args, span } => {
                assert_eq!(callee.function_name(), Some("LAMBDA"));
                assert_eq!(args.len(), 1);
                assert_eq!(span.slice(text), text);
            }
            other => panic!("Expected Invocation, got {:?}", other),
        }
    }
}
