use std::fmt;

use crate::{
    error::{Diagnostics, ParseError, ParseResult},
    interpreter::{
        lexer::{Token, TokenKind},
        value::core::Value,
    },
};

/// Binding strength of the tokens that can sit on the operator stack.
///
/// Ordered from weakest to strongest. `Grouping` is a sentinel for `(` and
/// `)`: it outranks every operator and only bounds a reduction scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// `+` and `-`.
    Additive,
    /// `*` and `/`.
    Multiplicative,
    /// Parenthesis markers.
    Grouping,
}

impl Precedence {
    /// Looks up the rank of an operator-stack token.
    ///
    /// Returns `None` for tokens that are neither parentheses nor one of the
    /// four arithmetic operators.
    ///
    /// # Example
    /// ```
    /// use stackcalc::interpreter::{
    ///     evaluator::binary::Precedence,
    ///     lexer::{Span, Token, TokenKind},
    /// };
    ///
    /// let source = b"1 + 2 * 3";
    /// let plus = Token::new(TokenKind::Operator, Span::new(2, 3));
    /// let star = Token::new(TokenKind::Operator, Span::new(6, 7));
    ///
    /// assert!(Precedence::of(plus, source) < Precedence::of(star, source));
    /// ```
    #[must_use]
    pub fn of(token: Token, source: &[u8]) -> Option<Self> {
        match token.kind {
            TokenKind::ParenOpen | TokenKind::ParenClose => Some(Self::Grouping),
            TokenKind::Operator => BinaryOperator::from_token(token, source).map(BinaryOperator::precedence),
            _ => None,
        }
    }
}

/// Represents the four arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOperator {
    /// Resolves an operator token by its first character.
    ///
    /// Operator tokens are maximal runs of symbols. Only single-symbol tokens
    /// are resolved; a longer run such as `+=` or `*-` yields `None`.
    #[must_use]
    pub fn from_token(token: Token, source: &[u8]) -> Option<Self> {
        if token.kind != TokenKind::Operator {
            return None;
        }
        match token.text(source).as_bytes() {
            [b'+'] => Some(Self::Add),
            [b'-'] => Some(Self::Sub),
            [b'*'] => Some(Self::Mul),
            [b'/'] => Some(Self::Div),
            _ => None,
        }
    }

    /// Returns the rank of this operator.
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Add | Self::Sub => Precedence::Additive,
            Self::Mul | Self::Div => Precedence::Multiplicative,
        }
    }

    /// The operator's symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Applies the operator to two integers.
    ///
    /// Division truncates toward zero.
    ///
    /// # Errors
    /// `DivisionByZero` for a zero divisor and `Overflow` when the result
    /// leaves the `i64` range.
    pub fn apply_integer(self, left: i64, right: i64) -> ParseResult<i64> {
        let result = match self {
            Self::Add => left.checked_add(right),
            Self::Sub => left.checked_sub(right),
            Self::Mul => left.checked_mul(right),
            Self::Div => {
                if right == 0 {
                    return Err(ParseError::DivisionByZero);
                }
                left.checked_div(right)
            },
        };
        result.ok_or(ParseError::Overflow { left,
                                            operator: self.symbol(),
                                            right })
    }

    /// Applies the operator to two floats.
    ///
    /// Never fails: dividing by zero yields an infinity or NaN.
    #[must_use]
    pub fn apply_float(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Reduces `left operator right` to a single value.
///
/// The token in operator position must be an `Operator`. When exactly one
/// operand is a float the integer operand is promoted first, so the result
/// always has the common kind.
///
/// # Parameters
/// - `left`, `right`: The operands, in source order.
/// - `operator`: The operator token popped from the operator stack.
/// - `source`: The bytes `operator` points into.
/// - `diagnostics`: Receives the failure message.
///
/// # Errors
/// - `TypeMismatch` if `operator` is not an operator token.
/// - `Unsupported` for operator runs other than `+ - * /`.
/// - `DivisionByZero` and `Overflow` from integer arithmetic.
///
/// # Example
/// ```
/// use stackcalc::{
///     error::Diagnostics,
///     interpreter::{
///         evaluator::binary::apply,
///         lexer::{Span, Token, TokenKind},
///         value::core::Value,
///     },
/// };
///
/// let mut diagnostics = Diagnostics::new();
/// let plus = Token::new(TokenKind::Operator, Span::new(2, 3));
///
/// let result = apply(Value::Integer(1), Value::Float(2.5), plus, b"1 + 2.5", &mut diagnostics);
/// assert_eq!(result, Ok(Value::Float(3.5)));
/// ```
pub fn apply(mut left: Value,
             mut right: Value,
             operator: Token,
             source: &[u8],
             diagnostics: &mut Diagnostics)
             -> ParseResult<Value> {
    if operator.kind != TokenKind::Operator {
        return ParseError::TypeMismatch { operator: operator.kind,
                                          left:     left.kind_name(),
                                          right:    right.kind_name(), }.report(diagnostics);
    }
    let Some(op) = BinaryOperator::from_token(operator, source) else {
        return ParseError::Unsupported { construct: format!("operator `{}`",
                                                            operator.text(source)) }.report(diagnostics);
    };

    match (left, right) {
        (Value::Integer(_), Value::Float(_)) => left.promote_to_float(),
        (Value::Float(_), Value::Integer(_)) => right.promote_to_float(),
        _ => {},
    }

    let result = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => match op.apply_integer(a, b) {
            Ok(n) => Value::Integer(n),
            Err(e) => return e.report(diagnostics),
        },
        (Value::Float(a), Value::Float(b)) => Value::Float(op.apply_float(a, b)),
        (left, right) => {
            return ParseError::TypeMismatch { operator: operator.kind,
                                              left:     left.kind_name(),
                                              right:    right.kind_name(), }.report(diagnostics);
        },
    };

    log::trace!("reduced {left} {op} {right} = {result}");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::Span;

    fn reduce(left: Value, symbol: &str, right: Value) -> ParseResult<Value> {
        let mut diagnostics = Diagnostics::new();
        let token = Token::new(TokenKind::Operator, Span::new(0, symbol.len()));
        apply(left, right, token, symbol.as_bytes(), &mut diagnostics)
    }

    #[test]
    fn integer_division_truncates_toward_zero() {
        assert_eq!(reduce(Value::Integer(7), "/", Value::Integer(2)),
                   Ok(Value::Integer(3)));
        assert_eq!(reduce(Value::Integer(-7), "/", Value::Integer(2)),
                   Ok(Value::Integer(-3)));
    }

    #[test]
    fn mixed_operands_promote_either_side() {
        assert_eq!(reduce(Value::Float(2.5), "+", Value::Integer(1)),
                   Ok(Value::Float(3.5)));
        assert_eq!(reduce(Value::Integer(1), "-", Value::Float(0.5)),
                   Ok(Value::Float(0.5)));
    }

    #[test]
    fn float_division_by_zero_is_not_an_error() {
        assert_eq!(reduce(Value::Float(1.0), "/", Value::Integer(0)),
                   Ok(Value::Float(f64::INFINITY)));
        let Ok(Value::Float(nan)) = reduce(Value::Float(0.0), "/", Value::Float(0.0)) else {
            panic!("expected a float");
        };
        assert!(nan.is_nan());
    }

    #[test]
    fn integer_division_by_zero_is_reported() {
        assert_eq!(reduce(Value::Integer(1), "/", Value::Integer(0)),
                   Err(ParseError::DivisionByZero));
    }

    #[test]
    fn integer_overflow_is_reported() {
        assert!(matches!(reduce(Value::Integer(i64::MAX), "+", Value::Integer(1)),
                         Err(ParseError::Overflow { operator: '+', .. })));
        assert!(matches!(reduce(Value::Integer(i64::MIN), "/", Value::Integer(-1)),
                         Err(ParseError::Overflow { operator: '/', .. })));
    }

    #[test]
    fn paren_in_operator_position_is_a_type_mismatch() {
        let mut diagnostics = Diagnostics::new();
        let paren = Token::new(TokenKind::ParenOpen, Span::new(0, 1));
        let result = apply(Value::Integer(1), Value::Integer(2), paren, b"(", &mut diagnostics);

        assert!(matches!(result, Err(ParseError::TypeMismatch { .. })));
        assert_eq!(diagnostics.render(),
                   "type mismatch: cannot apply '(' to integer and integer");
    }

    #[test]
    fn compound_operator_runs_are_unsupported() {
        assert!(matches!(reduce(Value::Integer(1), "+=", Value::Integer(2)),
                         Err(ParseError::Unsupported { .. })));
        assert!(matches!(reduce(Value::Integer(1), "%", Value::Integer(2)),
                         Err(ParseError::Unsupported { .. })));
    }

    #[test]
    fn precedence_orders_operators_below_grouping() {
        assert!(Precedence::Additive < Precedence::Multiplicative);
        assert!(Precedence::Multiplicative < Precedence::Grouping);
    }
}
