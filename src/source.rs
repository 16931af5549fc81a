use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::error::SourceError;

/// A program text together with the name it is reported under.
///
/// The whole file is read into memory on [`Source::open`] and kept as raw
/// bytes. Bytes that are not valid UTF-8 are left for the tokenizer to
/// report; the text is released when the `Source` is dropped.
#[derive(Debug, Clone)]
pub struct Source {
    name:  String,
    bytes: Vec<u8>,
}

impl Source {
    /// Reads a program from disk.
    ///
    /// # Errors
    /// Returns `SourceError::Io` if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SourceError::Io { path: PathBuf::from(path),
                                                                      source })?;

        log::debug!("opened {} ({} bytes)", path.display(), bytes.len());

        Ok(Self { name: path.display().to_string(),
                  bytes })
    }

    /// Wraps program text that did not come from a file.
    ///
    /// # Example
    /// ```
    /// use stackcalc::source::Source;
    ///
    /// let source = Source::from_text("<expression>", "1 + 2;");
    /// assert_eq!(source.name(), "<expression>");
    /// assert_eq!(source.bytes(), b"1 + 2;");
    /// ```
    pub fn from_text(name: impl Into<String>, text: impl Into<Vec<u8>>) -> Self {
        Self { name:  name.into(),
               bytes: text.into(), }
    }

    /// The name used in error reports, usually the file path.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full program text, not necessarily valid UTF-8.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a fresh cursor positioned at the first byte.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.bytes)
    }

    /// Computes the line and column of a byte offset.
    ///
    /// The text is re-read from the start up to `offset`, counting newlines
    /// for the line and bytes since the last newline for the column. Both are
    /// 1-based. Offsets past the end resolve to the end of the text.
    ///
    /// # Example
    /// ```
    /// use stackcalc::source::{Location, Source};
    ///
    /// let source = Source::from_text("test", "1;\n22 + 3;\n");
    /// assert_eq!(source.location(0), Location { line: 1, column: 1 });
    /// assert_eq!(source.location(6), Location { line: 2, column: 4 });
    /// ```
    #[must_use]
    pub fn location(&self, offset: usize) -> Location {
        let mut cursor = self.cursor();
        let mut location = Location { line: 1, column: 1 };

        while cursor.position() < offset {
            match cursor.read_byte() {
                Some(b'\n') => {
                    location.line += 1;
                    location.column = 1;
                },
                Some(_) => location.column += 1,
                None => break,
            }
        }

        location
    }
}

/// A 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Line number, starting at 1.
    pub line:   usize,
    /// Byte column within the line, starting at 1.
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A read position inside a program text.
///
/// The cursor walks raw bytes, so it never fails on invalid UTF-8. End of
/// input is reported as `None` rather than a sentinel byte.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    text: &'src [u8],
    pos:  usize,
}

impl<'src> Cursor<'src> {
    /// Creates a cursor at the start of `text`.
    #[must_use]
    pub fn new<S>(text: &'src S) -> Self
        where S: AsRef<[u8]> + ?Sized
    {
        Self { text: text.as_ref(),
               pos:  0, }
    }

    /// The complete text the cursor walks over.
    #[must_use]
    pub const fn text(&self) -> &'src [u8] {
        self.text
    }

    /// Current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` once every byte has been consumed.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Returns the byte under the cursor without consuming it.
    #[must_use]
    pub fn peek_byte(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    /// Consumes and returns the byte under the cursor.
    ///
    /// # Example
    /// ```
    /// use stackcalc::source::Cursor;
    ///
    /// let mut cursor = Cursor::new("ab");
    /// assert_eq!(cursor.read_byte(), Some(b'a'));
    /// assert_eq!(cursor.read_byte(), Some(b'b'));
    /// assert_eq!(cursor.read_byte(), None);
    /// assert!(cursor.at_end());
    /// ```
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Some(byte)
    }

    /// Consumes bytes while `predicate` holds.
    pub fn skip_while<P>(&mut self, mut predicate: P)
        where P: FnMut(u8) -> bool
    {
        while let Some(byte) = self.peek_byte()
              && predicate(byte)
        {
            self.pos += 1;
        }
    }

    /// The unread part of the text.
    #[must_use]
    pub fn rest(&self) -> &'src [u8] {
        self.text.get(self.pos..).unwrap_or_default()
    }

    /// Moves the cursor `count` bytes forward, stopping at the end.
    pub fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.text.len());
    }
}
