//! Formula Abstract Syntax Tree types
//!
//! The tree is structural, not semantic: operator chains are kept flat as a
//! [`AstNode::Sequence`] in source order, because nothing downstream evaluates
//! them. Every node records the byte [`Span`] it was parsed from so callers can
//! splice replacement text into the exact source location.

use std::fmt;

/// Byte range into the text that was handed to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a position
    pub fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is zero-width
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if `other` lies entirely within this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Slice the source text covered by this span
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Delimiter used by a string literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"text"`
    Double,
    /// `'text'`
    Single,
}

impl QuoteStyle {
    /// The delimiter character
    pub fn char(self) -> char {
        match self {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Text
    Concat,

    // Logical keywords
    And,
    Or,
}

impl BinaryOperator {
    /// Source spelling (keyword operators are upper-case)
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Concat => "&",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl UnaryOperator {
    /// Source spelling
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
        }
    }
}

/// One element of an operator chain
///
/// The first item of a [`AstNode::Sequence`] has no binary operator; every
/// following item carries the operator that joins it to its predecessor.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceItem {
    pub operator: Option<BinaryOperator>,
    /// Unary prefixes applied to the operand, outermost first (`--x` has two)
    pub prefixes: Vec<UnaryOperator>,
    pub operand: AstNode,
}

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // === Calls ===
    /// `NAME(arg, ...)`
    FunctionCall {
        name: String,
        args: Vec<AstNode>,
        span: Span,
    },
    /// A call result invoked immediately: `LAMBDA(x, x + 1)(2)`
    ///
    /// Only produced when [`crate::ParserOptions::allow_immediate_invocation`] is set.
    Invocation {
        callee: Box<AstNode>,
        args: Vec<AstNode>,
        span: Span,
    },

    // === Literals ===
    /// String literal, `value` has doubled quotes already collapsed
    StringLiteral {
        value: String,
        quote: QuoteStyle,
        span: Span,
    },
    /// Numeric literal, kept as written
    Number { raw: String, span: Span },
    /// Array literal including its braces (`{1,2;3,4}`)
    ArrayLiteral { raw: String, span: Span },

    // === References ===
    /// Cell reference, range reference or bare name
    Identifier { name: String, span: Span },

    // === Structure ===
    /// `( inner )`
    Parenthesized { inner: Box<AstNode>, span: Span },
    /// Elided argument, such as each slot of `IF(,,)`
    EmptyArgument { span: Span },
    /// Operator chain, or a single operand with unary prefixes
    Sequence { items: Vec<SequenceItem>, span: Span },
}

impl AstNode {
    /// Source span of this node
    pub fn span(&self) -> Span {
        match self {
            AstNode::FunctionCall { span, .. }
            | AstNode::Invocation { span, .. }
            | AstNode::StringLiteral { span, .. }
            | AstNode::Number { span, .. }
            | AstNode::ArrayLiteral { span, .. }
            | AstNode::Identifier { span, .. }
            | AstNode::Parenthesized { span, .. }
            | AstNode::EmptyArgument { span }
            | AstNode::Sequence { span, .. } => *span,
        }
    }

    /// Check if this is an elided argument
    pub fn is_empty_argument(&self) -> bool {
        matches!(self, AstNode::EmptyArgument { .. })
    }

    /// Name of the function if this node is a call
    pub fn function_name(&self) -> Option<&str> {
        match self {
            AstNode::FunctionCall { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Numeric value of a number literal
    pub fn number_value(&self) -> Option<f64> {
        match self {
            AstNode::Number { raw, .. } => raw.parse().ok(),
            _ => None,
        }
    }

    /// Direct child nodes in source order
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            AstNode::FunctionCall { args, .. } => args.iter().collect(),
            AstNode::Invocation { callee, args, .. } => {
                std::iter::once(callee.as_ref()).chain(args.iter()).collect()
            }
            AstNode::Parenthesized { inner, .. } => vec![inner.as_ref()],
            AstNode::Sequence { items, .. } => items.iter().map(|item| &item.operand).collect(),
            AstNode::StringLiteral { .. }
            | AstNode::Number { .. }
            | AstNode::ArrayLiteral { .. }
            | AstNode::Identifier { .. }
            | AstNode::EmptyArgument { .. } => Vec::new(),
        }
    }
}
