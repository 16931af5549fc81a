use crate::{
    error::{Diagnostics, ParseError, ParseResult, WithContext},
    interpreter::{
        evaluator::binary::{BinaryOperator, Precedence, apply},
        lexer::{Token, TokenKind, Tokenizer},
        value::core::Value,
    },
    source::Cursor,
};

/// Default bound on pending operands or operators in one statement.
pub const MAX_DEPTH: usize = 256;

/// Evaluates semicolon-terminated statements one at a time.
///
/// The evaluator owns the tokenizer and therefore the cursor. It holds at
/// most the current token and one token of lookahead, both read lazily, so
/// nothing past a statement's `;` is read until the next statement is
/// requested.
///
/// # Example
/// ```
/// use stackcalc::{
///     error::Diagnostics,
///     interpreter::{evaluator::core::Evaluator, value::core::Value},
///     source::Cursor,
/// };
///
/// let mut diagnostics = Diagnostics::new();
/// let mut evaluator = Evaluator::new(Cursor::new("1 + 2 * 3; (1 + 2) * 3;"));
///
/// assert_eq!(evaluator.evaluate_statement(&mut diagnostics), Ok(Some(Value::Integer(7))));
/// assert_eq!(evaluator.evaluate_statement(&mut diagnostics), Ok(Some(Value::Integer(9))));
/// assert_eq!(evaluator.evaluate_statement(&mut diagnostics), Ok(None));
/// assert!(diagnostics.is_empty());
/// ```
pub struct Evaluator<'src> {
    tokens:     Tokenizer<'src>,
    current:    Option<Token>,
    lookahead:  Option<Token>,
    max_depth:  usize,
    statements: usize,
}

impl<'src> Evaluator<'src> {
    /// Creates an evaluator reading from `cursor`.
    #[must_use]
    pub const fn new(cursor: Cursor<'src>) -> Self {
        Self { tokens:     Tokenizer::new(cursor),
               current:    None,
               lookahead:  None,
               max_depth:  MAX_DEPTH,
               statements: 0, }
    }

    /// Sets how many operands or operators a statement may hold pending.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of statements started so far.
    #[must_use]
    pub const fn statements(&self) -> usize {
        self.statements
    }

    /// Byte offset where evaluation currently stands.
    ///
    /// This is the start of the current token when one has been read, and
    /// the cursor position otherwise (for example right after a lexical
    /// error).
    #[must_use]
    pub fn position(&self) -> usize {
        self.current.map_or_else(|| self.tokens.position(), |token| token.span.start)
    }

    /// Evaluates the next statement.
    ///
    /// Returns `Ok(None)` once the input is exhausted. A statement is an
    /// expression followed by `;`; the terminator is consumed on success.
    ///
    /// # Errors
    /// Any lexical error, syntax error, unsupported construct, or integer
    /// arithmetic failure, including one raised by the statement's first
    /// token. The origin and a `statement N failed` line are pushed onto
    /// `diagnostics`.
    pub fn evaluate_statement(&mut self,
                              diagnostics: &mut Diagnostics)
                              -> ParseResult<Option<Value>> {
        let first = self.current(diagnostics);
        if let Ok(token) = first
           && token.kind == TokenKind::EndOfInput
        {
            return Ok(None);
        }

        self.statements += 1;
        let index = self.statements;
        let value = first.and_then(|token| self.statement(token, diagnostics))
                         .context(diagnostics, || format!("statement {index} failed"))?;

        log::debug!("statement {index} = {value}");
        Ok(Some(value))
    }

    /// Skips the rest of a failed statement.
    ///
    /// Tokens are discarded through the next `;` or up to the end of input.
    /// Lexical errors met along the way are ignored.
    pub fn recover(&mut self) {
        let mut discarded = Diagnostics::new();
        loop {
            match self.current(&mut discarded) {
                Ok(token) if token.kind == TokenKind::EndOfInput => break,
                Ok(token) => {
                    self.advance();
                    if token.kind == TokenKind::StatementEnd {
                        break;
                    }
                },
                Err(_) => {},
            }
        }
        log::debug!("skipped {} diagnostics while recovering", discarded.len());
    }

    fn statement(&mut self, token: Token, diagnostics: &mut Diagnostics) -> ParseResult<Value> {
        match token.kind {
            TokenKind::Integer | TokenKind::Float | TokenKind::ParenOpen => {},
            TokenKind::Identifier => return self.unsupported_statement(token, diagnostics),
            found => {
                return ParseError::UnexpectedToken { found,
                                                     text: token.text(self.tokens.source())
                                                                .to_string() }.report(diagnostics);
            },
        }

        let value = self.expression(diagnostics)?;

        let terminator = self.current(diagnostics)?;
        if terminator.kind != TokenKind::StatementEnd {
            return ParseError::ExpectedTerminator { found: terminator.kind }.report(diagnostics);
        }
        self.advance();

        Ok(value)
    }

    /// Rejects a statement that starts with a name.
    ///
    /// A name followed by another name (a type) or by `=` is the start of an
    /// assignment, which is reported as such.
    fn unsupported_statement(&mut self,
                             token: Token,
                             diagnostics: &mut Diagnostics)
                             -> ParseResult<Value> {
        let source = self.tokens.source();
        let name = token.text(source);
        let next = self.lookahead(diagnostics)?;

        let is_assignment = match next.kind {
            TokenKind::Identifier => true,
            TokenKind::Operator => next.text(source).starts_with('='),
            _ => false,
        };
        let construct = if is_assignment {
            format!("assignment to `{name}`")
        } else {
            format!("identifier `{name}`")
        };

        ParseError::Unsupported { construct }.report(diagnostics)
    }

    /// Scans and reduces one expression.
    ///
    /// Stops at the first token that cannot continue an expression, without
    /// consuming it.
    fn expression(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Value> {
        let source = self.tokens.source();
        let mut stacks = Stacks::new(self.max_depth);

        loop {
            let token = self.current(diagnostics)?;
            match token.kind {
                TokenKind::Integer | TokenKind::Float => {
                    let value = Value::parse_literal(token, source, diagnostics)?;
                    stacks.push_operand(value, diagnostics)?;
                },

                TokenKind::ParenOpen => stacks.push_operator(token, diagnostics)?,

                TokenKind::ParenClose => loop {
                    match stacks.operators.last().copied() {
                        None => {
                            return ParseError::MismatchedParentheses { detail: "')' without a matching '('" }.report(diagnostics);
                        },
                        Some(top) if top.kind == TokenKind::ParenOpen => {
                            stacks.operators.pop();
                            break;
                        },
                        Some(_) => stacks.reduce(source, diagnostics)?,
                    }
                },

                TokenKind::Operator => {
                    let Some(op) = BinaryOperator::from_token(token, source) else {
                        return ParseError::Unsupported { construct: format!("operator `{}`",
                                                                            token.text(source)) }.report(diagnostics);
                    };
                    let rank = op.precedence();

                    // Equal ranks are left pending: `1 - 2 - 3` drains as `1 - (2 - 3)`.
                    while let Some(top) = stacks.operators.last().copied() {
                        match Precedence::of(top, source) {
                            Some(Precedence::Grouping) | None => break,
                            Some(top_rank) if rank < top_rank => stacks.reduce(source, diagnostics)?,
                            Some(_) => break,
                        }
                    }
                    stacks.push_operator(token, diagnostics)?;
                },

                TokenKind::Identifier => {
                    return ParseError::Unsupported { construct: format!("identifier `{}`",
                                                                        token.text(source)) }.report(diagnostics);
                },

                _ => break,
            }
            self.advance();
        }

        stacks.drain(source, diagnostics)
    }

    fn current(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Token> {
        if let Some(token) = self.current {
            return Ok(token);
        }
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.tokens.next_token(diagnostics)?,
        };
        self.current = Some(token);
        Ok(token)
    }

    fn lookahead(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Token> {
        self.current(diagnostics)?;
        if let Some(token) = self.lookahead {
            return Ok(token);
        }
        let token = self.tokens.next_token(diagnostics)?;
        self.lookahead = Some(token);
        Ok(token)
    }

    fn advance(&mut self) {
        self.current = self.lookahead.take();
    }
}

/// Scratch stacks for one expression.
struct Stacks {
    operands:  Vec<Value>,
    operators: Vec<Token>,
    max_depth: usize,
}

impl Stacks {
    const fn new(max_depth: usize) -> Self {
        Self { operands: Vec::new(),
               operators: Vec::new(),
               max_depth }
    }

    fn push_operand(&mut self, value: Value, diagnostics: &mut Diagnostics) -> ParseResult<()> {
        if self.operands.len() >= self.max_depth {
            return ParseError::TooComplex { limit: self.max_depth }.report(diagnostics);
        }
        self.operands.push(value);
        Ok(())
    }

    fn push_operator(&mut self, token: Token, diagnostics: &mut Diagnostics) -> ParseResult<()> {
        if self.operators.len() >= self.max_depth {
            return ParseError::TooComplex { limit: self.max_depth }.report(diagnostics);
        }
        self.operators.push(token);
        Ok(())
    }

    /// Pops one operator and two operands and pushes the result.
    fn reduce(&mut self, source: &[u8], diagnostics: &mut Diagnostics) -> ParseResult<()> {
        let Some(operator) = self.operators.pop() else {
            return ParseError::BadExpression { detail: "missing operator".to_string() }.report(diagnostics);
        };
        let (Some(right), Some(left)) = (self.operands.pop(), self.operands.pop()) else {
            return ParseError::BadExpression { detail: format!("missing operand for `{}`",
                                                               operator.text(source)) }.report(diagnostics);
        };

        let result = apply(left, right, operator, source, diagnostics)?;
        self.operands.push(result);
        Ok(())
    }

    /// Reduces everything left once the scan has stopped.
    fn drain(mut self, source: &[u8], diagnostics: &mut Diagnostics) -> ParseResult<Value> {
        while let Some(top) = self.operators.last().copied()
              && !self.operands.is_empty()
        {
            if top.kind == TokenKind::ParenOpen {
                return ParseError::MismatchedParentheses { detail: "'(' is never closed" }.report(diagnostics);
            }
            self.reduce(source, diagnostics)?;
        }

        match (self.operands.as_slice(), self.operators.is_empty()) {
            ([value], true) => Ok(*value),
            (operands, _) => ParseError::BadExpression { detail: format!("{} operand(s) and {} operator(s) left over",
                                                                         operands.len(),
                                                                         self.operators.len()) }.report(diagnostics),
        }
    }
}
