/// Diagnostic chains.
///
/// Defines `Diagnostics`, the ordered, append-only list of messages that a
/// failing operation and every caller it unwinds through add context to. The
/// chain is rendered with the most recently pushed message first.
pub mod diagnostics;
/// Lexing and evaluation errors.
///
/// Defines all error kinds that can occur while tokenizing a source or
/// reducing its statements. Every kind is recoverable at the statement
/// boundary.
pub mod parse_error;
/// Source loading errors.
///
/// Raised when a program file cannot be read or is not valid UTF-8 text.
pub mod source_error;

pub use diagnostics::{Diagnostics, WithContext};
pub use parse_error::{ParseError, ParseResult};
pub use source_error::SourceError;
