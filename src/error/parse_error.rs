use thiserror::Error;

use crate::{
    error::Diagnostics,
    interpreter::lexer::{Token, TokenKind},
};

/// Result type used by the tokenizer and the evaluator.
pub type ParseResult<T> = Result<T, ParseError>;

/// Represents all errors that can occur while tokenizing or evaluating a
/// statement.
///
/// Lexical and syntax errors abort the current statement. Arithmetic errors
/// on integers are reported the same way instead of terminating the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A string literal reached the end of input without its closing quote.
    #[error("expected '\"' before end of input to close the string starting at byte {}",
            .token.span.start)]
    UnterminatedString {
        /// The partial string token, spanning to the end of input.
        token: Token,
    },
    /// A character that starts no token, or a byte that is not valid UTF-8.
    #[error("unexpected character: '{}' (0x{byte:02x})", .character.escape_default())]
    UnexpectedCharacter {
        /// The `Unknown` token covering the character.
        token:     Token,
        /// The offending character, escaped when rendered. A byte that is not
        /// valid UTF-8 is reported as `char::REPLACEMENT_CHARACTER`.
        character: char,
        /// Its first byte in the source.
        byte:      u8,
    },
    /// A numeric literal whose text cannot be represented.
    #[error("failed to parse {kind} `{text}`: {reason}")]
    MalformedLiteral {
        /// `Integer` or `Float`.
        kind:   TokenKind,
        /// The literal text.
        text:   String,
        /// Why parsing failed.
        reason: String,
    },
    /// A `)` without a matching `(`, or a `(` that was never closed.
    #[error("mismatched parentheses: {detail}")]
    MismatchedParentheses {
        /// Which side is unmatched.
        detail: &'static str,
    },
    /// An expression was not followed by `;`.
    #[error("expected semicolon, found {found}")]
    ExpectedTerminator {
        /// The token found instead.
        found: TokenKind,
    },
    /// A token that cannot start a statement.
    #[error("syntax error: unexpected token {found} (`{text}`)")]
    UnexpectedToken {
        /// Kind of the token.
        found: TokenKind,
        /// Its source text.
        text:  String,
    },
    /// A construct that the language reserves but does not implement.
    #[error("{construct}: not implemented")]
    Unsupported {
        /// Description of the construct, e.g. ``keyword `while` ``.
        construct: String,
    },
    /// The operand and operator stacks did not reduce to a single value.
    #[error("bad expression: {detail}")]
    BadExpression {
        /// What was left over or missing.
        detail: String,
    },
    /// A reduction was attempted with something other than an operator.
    #[error("type mismatch: cannot apply {operator} to {left} and {right}")]
    TypeMismatch {
        /// Kind of the token in operator position.
        operator: TokenKind,
        /// Kind of the left operand.
        left:     &'static str,
        /// Kind of the right operand.
        right:    &'static str,
    },
    /// An expression nested deeper than the configured stack depth.
    #[error("expression too complex: more than {limit} pending operands or operators")]
    TooComplex {
        /// The depth limit that was exceeded.
        limit: usize,
    },
    /// Integer division with a zero divisor.
    #[error("integer division by zero")]
    DivisionByZero,
    /// Integer arithmetic left the `i64` range.
    #[error("integer overflow computing {left} {operator} {right}")]
    Overflow {
        /// Left operand.
        left:     i64,
        /// Operator symbol.
        operator: char,
        /// Right operand.
        right:    i64,
    },
}

impl ParseError {
    /// Records this error as the origin of a failure and returns it.
    ///
    /// # Example
    /// ```
    /// use stackcalc::error::{Diagnostics, ParseError, ParseResult};
    ///
    /// let mut diagnostics = Diagnostics::new();
    /// let result: ParseResult<()> = ParseError::DivisionByZero.report(&mut diagnostics);
    ///
    /// assert!(result.is_err());
    /// assert_eq!(diagnostics.render(), "integer division by zero");
    /// ```
    pub fn report<T>(self, diagnostics: &mut Diagnostics) -> ParseResult<T> {
        diagnostics.push(self.to_string());
        Err(self)
    }
}
