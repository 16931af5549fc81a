//! # stackcalc
//!
//! stackcalc evaluates semicolon-terminated arithmetic statements written
//! with integer and floating-point literals, `+ - * /`, and parentheses. Each
//! statement is reduced directly from the token stream with an operand stack
//! and an operator stack; no syntax tree is built.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::Diagnostics,
    interpreter::{evaluator::core::Evaluator, value::core::Value},
    source::Cursor,
};

/// Runs programs from the command line.
///
/// This module opens a source, evaluates its statements in order, prints
/// each result, and renders the diagnostic chain together with a line and
/// column when a statement fails.
///
/// # Responsibilities
/// - Maps command-line settings onto `RunOptions`.
/// - Stops at the first failure, or skips to the next statement on request.
/// - Turns the outcome into a process exit code.
pub mod driver;
/// Provides error types and the diagnostic chain.
///
/// This module defines every failure that can be raised while reading,
/// tokenizing, or evaluating a program, and the `Diagnostics` chain that
/// collects a message from the failing operation and from each caller it
/// unwinds through.
///
/// # Responsibilities
/// - Defines error enums for lexical, syntax, arithmetic, and I/O failures.
/// - Collects context messages and renders them most recent first.
pub mod error;
/// Tokenizes and evaluates statements.
///
/// This module ties together the lexer, the stack-based evaluator, and the
/// value type.
///
/// # Responsibilities
/// - Classifies tokens at a cursor.
/// - Reduces statements according to operator precedence.
/// - Promotes mixed integer and float operands.
pub mod interpreter;
/// Program text and the cursor that walks it.
///
/// This module loads a file into memory, exposes a byte cursor with peek,
/// read, and skip operations, and maps byte offsets back to line and column.
pub mod source;

/// Evaluates every statement in `source` and returns their values in order.
///
/// Evaluation stops at the first failing statement.
///
/// # Errors
/// Returns the diagnostic chain of the failing statement.
///
/// # Examples
/// ```
/// use stackcalc::{evaluate, interpreter::value::core::Value};
///
/// let values = evaluate("1 + 2 * (3 - 1);\n4.0 / 2;\n").unwrap();
/// assert_eq!(values, [Value::Integer(5), Value::Float(2.0)]);
///
/// // A missing terminator is a syntax error.
/// let diagnostics = evaluate("1 + 2").unwrap_err();
/// assert_eq!(diagnostics.render(),
///            "statement 1 failed\n - expected semicolon, found end of input");
/// ```
pub fn evaluate(source: &str) -> Result<Vec<Value>, Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let mut evaluator = Evaluator::new(Cursor::new(source));
    let mut values = Vec::new();

    while let Ok(Some(value)) = evaluator.evaluate_statement(&mut diagnostics) {
        values.push(value);
    }

    if diagnostics.is_empty() {
        Ok(values)
    } else {
        Err(diagnostics)
    }
}
