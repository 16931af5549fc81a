use std::{
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use crate::{
    error::Diagnostics,
    interpreter::{
        evaluator::core::{Evaluator, MAX_DEPTH},
        lexer::{TokenKind, Tokenizer},
    },
    source::Source,
};

/// Settings for one run of the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Continue with the next statement after a failing one.
    pub keep_going: bool,
    /// Print the token stream instead of evaluating it.
    pub dump_tokens: bool,
    /// Do not print statement results.
    pub quiet: bool,
    /// Bound on pending operands or operators per statement.
    pub max_depth: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { keep_going:  false,
               dump_tokens: false,
               quiet:       false,
               max_depth:   MAX_DEPTH, }
    }
}

/// Opens and runs the program at `path`.
///
/// Results go to standard output and failures to standard error. The exit
/// code is non-zero if the file cannot be opened or any statement fails.
#[must_use]
pub fn run(path: &Path, options: &RunOptions) -> ExitCode {
    let source = match Source::open(path) {
        Ok(source) => source,
        Err(e) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.push(e.to_string());
            diagnostics.push("failed to open source");
            eprintln!("error: {diagnostics}");
            return ExitCode::FAILURE;
        },
    };

    run_to_exit_code(&source, options)
}

/// Runs an in-memory source against the standard streams.
#[must_use]
pub fn run_to_exit_code(source: &Source, options: &RunOptions) -> ExitCode {
    let stdout = io::stdout();
    let stderr = io::stderr();

    match run_source(source, options, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: failed to write output: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Evaluates every statement of `source`.
///
/// Each result is written to `out` on its own line unless `options.quiet`
/// is set. A failure is written to `err` as the rendered diagnostic chain
/// followed by the location where evaluation stopped. With
/// `options.keep_going` the rest of the failed statement is skipped and
/// evaluation continues.
///
/// Returns `Ok(true)` if every statement succeeded.
///
/// # Example
/// ```
/// use stackcalc::{driver::{RunOptions, run_source}, source::Source};
///
/// let source = Source::from_text("demo", "1 + 2;\n4.0 / 2;\n");
/// let mut out = Vec::new();
/// let mut err = Vec::new();
///
/// let ok = run_source(&source, &RunOptions::default(), &mut out, &mut err).unwrap();
/// assert!(ok);
/// assert_eq!(String::from_utf8(out).unwrap(), "3\n2.0\n");
/// ```
pub fn run_source<W, E>(source: &Source,
                        options: &RunOptions,
                        out: &mut W,
                        err: &mut E)
                        -> io::Result<bool>
    where W: Write,
          E: Write
{
    if options.dump_tokens {
        return dump_tokens(source, out, err);
    }

    let mut diagnostics = Diagnostics::new();
    let mut evaluator = Evaluator::new(source.cursor()).with_max_depth(options.max_depth);
    let mut succeeded = true;

    loop {
        match evaluator.evaluate_statement(&mut diagnostics) {
            Ok(Some(value)) => {
                if !options.quiet {
                    writeln!(out, "{value}")?;
                }
            },
            Ok(None) => break,
            Err(_) => {
                succeeded = false;
                report(source, &diagnostics, evaluator.position(), err)?;
                diagnostics.clear();
                if !options.keep_going {
                    break;
                }
                evaluator.recover();
            },
        }
    }

    log::debug!("{} statement(s) evaluated from {}", evaluator.statements(), source.name());
    Ok(succeeded)
}

/// Writes one `[kind "text"]` line per token, up to the first error.
fn dump_tokens<W, E>(source: &Source, out: &mut W, err: &mut E) -> io::Result<bool>
    where W: Write,
          E: Write
{
    let mut diagnostics = Diagnostics::new();
    let mut tokens = Tokenizer::new(source.cursor());

    loop {
        match tokens.next_token(&mut diagnostics) {
            Ok(token) if token.kind == TokenKind::EndOfInput => return Ok(true),
            Ok(token) => writeln!(out, "[{:?} \"{}\"]", token.kind, token.text(source.bytes()))?,
            Err(_) => {
                report(source, &diagnostics, tokens.position(), err)?;
                return Ok(false);
            },
        }
    }
}

fn report<E>(source: &Source, diagnostics: &Diagnostics, offset: usize, err: &mut E) -> io::Result<()>
    where E: Write
{
    writeln!(err, "error: {diagnostics}")?;
    writeln!(err, "  --> {}:{}", source.name(), source.location(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_text(text: &str, options: &RunOptions) -> (bool, String, String) {
        let source = Source::from_text("test", text);
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run_source(&source, options, &mut out, &mut err).unwrap();
        (ok,
         String::from_utf8(out).unwrap(),
         String::from_utf8(err).unwrap())
    }

    #[test]
    fn failure_reports_chain_and_location() {
        let (ok, out, err) = run_text("1;\n2 + (3;\n", &RunOptions::default());

        assert!(!ok);
        assert_eq!(out, "1\n");
        assert_eq!(err,
                   "error: statement 2 failed\n - mismatched parentheses: '(' is never closed\n  --> test:2:7\n");
    }

    #[test]
    fn keep_going_reports_every_failure() {
        let options = RunOptions { keep_going: true,
                                   ..RunOptions::default() };
        let (ok, out, err) = run_text("1;\n2 +;\n3;\nx;\n4;", &options);

        assert!(!ok);
        assert_eq!(out, "1\n3\n4\n");
        assert_eq!(err.matches("error:").count(), 2);
        assert!(err.contains("identifier `x`: not implemented"));
    }

    #[test]
    fn quiet_suppresses_results() {
        let options = RunOptions { quiet: true,
                                   ..RunOptions::default() };
        let (ok, out, err) = run_text("1; 2;", &options);

        assert!(ok);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn token_dump_lists_kinds_and_text() {
        let options = RunOptions { dump_tokens: true,
                                   ..RunOptions::default() };
        let (ok, out, _) = run_text("(-1 + 2.5) ;", &options);

        assert!(ok);
        assert_eq!(out,
                   "[ParenOpen \"(\"]\n[Integer \"-1\"]\n[Operator \"+\"]\n[Float \"2.5\"]\n[ParenClose \")\"]\n[StatementEnd \";\"]\n");
    }
}
