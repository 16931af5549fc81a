use std::fmt;

use crate::error::ParseError;

/// Separator written between two rendered messages.
pub const DELIMITER: &str = "\n - ";

/// An ordered chain of error messages.
///
/// The operation where a failure originates pushes the error's own message;
/// every caller it unwinds through may push one more line of context. The
/// chain is owned by whoever drives the evaluation and can be cleared and
/// reused for the next independent run.
///
/// # Example
/// ```
/// use stackcalc::error::Diagnostics;
///
/// let mut diagnostics = Diagnostics::new();
/// diagnostics.push("unexpected character '@' (0x40)");
/// diagnostics.push("statement 2 failed");
///
/// assert_eq!(diagnostics.render(),
///            "statement 2 failed\n - unexpected character '@' (0x40)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self { messages: Vec::new() }
    }

    /// Appends a message to the chain.
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Returns `true` when no failure has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of recorded messages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    /// Iterates over the messages in the order they were pushed.
    pub fn messages(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Renders the chain, most recently pushed message first.
    ///
    /// Messages are joined with [`DELIMITER`], so the earliest message (the
    /// point where the failure started) comes last.
    #[must_use]
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        for (i, message) in self.messages.iter().rev().enumerate() {
            if i > 0 {
                rendered.push_str(DELIMITER);
            }
            rendered.push_str(message);
        }
        rendered
    }

    /// Forgets every message so the chain can be reused.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Adds a line of context to a failing result as it propagates.
pub trait WithContext {
    /// Pushes `message()` onto `diagnostics` if `self` is an error.
    ///
    /// The closure only runs on failure.
    #[must_use]
    fn context<F>(self, diagnostics: &mut Diagnostics, message: F) -> Self
        where F: FnOnce() -> String;
}

impl<T> WithContext for Result<T, ParseError> {
    fn context<F>(self, diagnostics: &mut Diagnostics, message: F) -> Self
        where F: FnOnce() -> String
    {
        if self.is_err() {
            diagnostics.push(message());
        }
        self
    }
}
