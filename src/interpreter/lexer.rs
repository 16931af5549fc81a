use std::{fmt, str};

use logos::Logos;

use crate::{
    error::{Diagnostics, ParseError, ParseResult},
    source::Cursor,
};

/// Classification of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A name such as `x` or `total2`.
    Identifier,
    /// A double-quoted string, quotes included.
    String,
    /// A base-10 integer literal, optionally with a leading `-`.
    Integer,
    /// A decimal literal with a `.`, optionally with a leading `-`.
    Float,
    /// A run of operator symbols such as `+` or `<=`.
    Operator,
    /// `(`
    ParenOpen,
    /// `)`
    ParenClose,
    /// `;`
    StatementEnd,
    /// Produced once the input is exhausted, and on every read after.
    EndOfInput,
    /// A character that starts no token.
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "identifier",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Operator => "operator",
            Self::ParenOpen => "'('",
            Self::ParenClose => "')'",
            Self::StatementEnd => "';'",
            Self::EndOfInput => "end of input",
            Self::Unknown => "unknown token",
        };
        f.write_str(name)
    }
}

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end:   usize,
}

impl Span {
    /// Creates a span from `start` up to, not including, `end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-length span.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A classified lexical unit.
///
/// Tokens do not own their text; it is recovered from the source with
/// [`Token::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Where it is.
    pub span: Span,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the source text covered by this token.
    ///
    /// `source` may be a `str` or raw bytes. A span that is out of range or
    /// not valid UTF-8 yields an empty string.
    ///
    /// # Example
    /// ```
    /// use stackcalc::interpreter::lexer::{Span, Token, TokenKind};
    ///
    /// let token = Token::new(TokenKind::Float, Span::new(4, 8));
    /// assert_eq!(token.text("1 + 2.25;"), "2.25");
    /// assert_eq!(token.text(b"1 + 2.25;"), "2.25");
    /// ```
    #[must_use]
    pub fn text<'a, S>(&self, source: &'a S) -> &'a str
        where S: AsRef<[u8]> + ?Sized
    {
        source.as_ref()
              .get(self.span.start..self.span.end)
              .and_then(|bytes| str::from_utf8(bytes).ok())
              .unwrap_or_default()
    }
}

/// Words the language reserves for constructs it does not implement.
pub const RESERVED_WORDS: [&str; 7] = ["if", "else", "while", "for", "let", "fn", "return"];

/// Raw lexeme recognised at the cursor.
///
/// Only the first lexeme of the remaining input is ever taken; whitespace is
/// skipped by the cursor beforehand. Lexing runs over raw bytes so invalid
/// UTF-8 surfaces as an ordinary lexing error.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(source = [u8])]
enum Lexeme {
    #[token("if")]
    #[token("else")]
    #[token("while")]
    #[token("for")]
    #[token("let")]
    #[token("fn")]
    #[token("return")]
    Reserved,
    #[regex("[a-zA-Z][a-zA-Z0-9]*")]
    Identifier,
    #[token("\"", scan_string)]
    String(Quote),
    #[regex("-?[0-9]+")]
    Integer,
    #[regex(r"-?[0-9]+\.[0-9]*")]
    Float,
    #[regex(r"[+\-*/=%&|<>!^~]+")]
    Operator,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(";")]
    StatementEnd,
}

/// Whether a string literal found its closing quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Closed,
    Unclosed,
}

/// Consumes a string body after the opening quote.
///
/// A backslash escapes the byte that follows it, so `\"` does not end the
/// literal. Without a closing quote the rest of the input is consumed.
fn scan_string(lex: &mut logos::Lexer<Lexeme>) -> Quote {
    let mut escaped = false;
    for (offset, &byte) in lex.remainder().iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' => escaped = true,
            b'"' => {
                lex.bump(offset + 1);
                return Quote::Closed;
            },
            _ => {},
        }
    }
    lex.bump(lex.remainder().len());
    Quote::Unclosed
}

/// Decodes the character at the front of `bytes` and its width in bytes.
///
/// Bytes that do not start a valid UTF-8 sequence decode as the replacement
/// character with a width of one.
fn leading_character(bytes: &[u8]) -> (char, usize) {
    let prefix = &bytes[..bytes.len().min(4)];
    let valid = match str::from_utf8(prefix) {
        Ok(text) => text,
        Err(e) => str::from_utf8(&prefix[..e.valid_up_to()]).unwrap_or_default(),
    };
    valid.chars()
         .next()
         .map_or((char::REPLACEMENT_CHARACTER, 1), |c| (c, c.len_utf8()))
}

/// Produces tokens on demand from a cursor.
pub struct Tokenizer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer reading from `cursor`.
    #[must_use]
    pub const fn new(cursor: Cursor<'src>) -> Self {
        Self { cursor }
    }

    /// The bytes being tokenized.
    #[must_use]
    pub const fn source(&self) -> &'src [u8] {
        self.cursor.text()
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Reads the next token.
    ///
    /// Leading whitespace is skipped. The cursor always ends up past the
    /// consumed text, including when an error is returned, so scanning can
    /// resume after a failure.
    ///
    /// # Errors
    /// - `UnexpectedCharacter` for a character that starts no token, including
    ///   a byte that is not valid UTF-8.
    /// - `UnterminatedString` when a string runs into the end of input.
    /// - `Unsupported` for reserved words.
    ///
    /// # Example
    /// ```
    /// use stackcalc::{
    ///     error::Diagnostics,
    ///     interpreter::lexer::{TokenKind, Tokenizer},
    ///     source::Cursor,
    /// };
    ///
    /// let mut diagnostics = Diagnostics::new();
    /// let mut tokens = Tokenizer::new(Cursor::new("  -12 * 3.5;"));
    ///
    /// let token = tokens.next_token(&mut diagnostics).unwrap();
    /// assert_eq!(token.kind, TokenKind::Integer);
    /// assert_eq!(token.text(tokens.source()), "-12");
    /// ```
    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Token> {
        self.cursor.skip_while(|byte| byte.is_ascii_whitespace());

        let start = self.cursor.position();
        let rest = self.cursor.rest();
        let Some(&byte) = rest.first() else {
            return Ok(Token::new(TokenKind::EndOfInput, Span::new(start, start)));
        };

        let mut lexer = Lexeme::lexer(rest);
        let Some(Ok(lexeme)) = lexer.next() else {
            let (character, width) = leading_character(rest);
            let span = Span::new(start, start + width);
            self.cursor.advance(width);
            return ParseError::UnexpectedCharacter { token: Token::new(TokenKind::Unknown, span),
                                                     character,
                                                     byte }.report(diagnostics);
        };

        let span = Span::new(start + lexer.span().start, start + lexer.span().end);
        self.cursor.advance(lexer.span().end);

        let kind = match lexeme {
            Lexeme::Reserved => {
                let word = String::from_utf8_lossy(lexer.slice());
                return ParseError::Unsupported { construct: format!("keyword `{word}`") }.report(diagnostics);
            },
            Lexeme::String(Quote::Unclosed) => {
                let token = Token::new(TokenKind::String, span);
                return ParseError::UnterminatedString { token }.report(diagnostics);
            },
            Lexeme::Identifier => TokenKind::Identifier,
            Lexeme::String(Quote::Closed) => TokenKind::String,
            Lexeme::Integer => TokenKind::Integer,
            Lexeme::Float => TokenKind::Float,
            Lexeme::Operator => TokenKind::Operator,
            Lexeme::ParenOpen => TokenKind::ParenOpen,
            Lexeme::ParenClose => TokenKind::ParenClose,
            Lexeme::StatementEnd => TokenKind::StatementEnd,
        };

        let token = Token::new(kind, span);
        log::trace!("token {kind} `{}` at {}", token.text(self.source()), span.start);
        Ok(token)
    }
}
