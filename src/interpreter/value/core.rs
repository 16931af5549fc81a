use std::fmt;

use crate::{
    error::{Diagnostics, ParseError, ParseResult},
    interpreter::lexer::{Token, TokenKind},
};

/// Represents a computed number.
///
/// Literals produce values and every reduction produces a new one. The only
/// mutation is [`Value::promote_to_float`], applied to the integer side of a
/// mixed reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double-precision float.
    Float(f64),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl Value {
    /// Parses the literal covered by `token`.
    ///
    /// Integers use a base-10 signed parse, floats a decimal parse. Overflow
    /// is an error, never a clamp: an integer outside `i64` fails, and so does
    /// a float whose digits round to infinity.
    ///
    /// # Errors
    /// `MalformedLiteral` when the text does not fit, `UnexpectedToken` when
    /// `token` is not a literal.
    ///
    /// # Example
    /// ```
    /// use stackcalc::{
    ///     error::Diagnostics,
    ///     interpreter::{
    ///         lexer::{Span, Token, TokenKind},
    ///         value::core::Value,
    ///     },
    /// };
    ///
    /// let mut diagnostics = Diagnostics::new();
    /// let source = b"-42;";
    /// let token = Token::new(TokenKind::Integer, Span::new(0, 3));
    ///
    /// let value = Value::parse_literal(token, source, &mut diagnostics).unwrap();
    /// assert_eq!(value, Value::Integer(-42));
    /// ```
    pub fn parse_literal(token: Token,
                         source: &[u8],
                         diagnostics: &mut Diagnostics)
                         -> ParseResult<Self> {
        let text = token.text(source);
        let malformed = |reason: String| ParseError::MalformedLiteral { kind: token.kind,
                                                                         text: text.to_string(),
                                                                         reason };

        match token.kind {
            TokenKind::Integer => match text.parse::<i64>() {
                Ok(n) => Ok(Self::Integer(n)),
                Err(e) => malformed(e.to_string()).report(diagnostics),
            },
            TokenKind::Float => match text.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Self::Float(f)),
                Ok(_) => malformed("number too large".to_string()).report(diagnostics),
                Err(e) => malformed(e.to_string()).report(diagnostics),
            },
            kind => ParseError::UnexpectedToken { found: kind,
                                                  text:  text.to_string(), }.report(diagnostics),
        }
    }

    /// Converts an integer to a float in place. Floats are left untouched.
    ///
    /// Magnitudes above 2^53 round to the nearest representable double.
    ///
    /// # Example
    /// ```
    /// use stackcalc::interpreter::value::core::Value;
    ///
    /// let mut value = Value::Integer(3);
    /// value.promote_to_float();
    /// assert_eq!(value, Value::Float(3.0));
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn promote_to_float(&mut self) {
        if let Self::Integer(n) = *self {
            log::debug!("promoting {n} to float");
            *self = Self::Float(n as f64);
        }
    }

    /// Name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}
