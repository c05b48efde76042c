//! Line index for (line, column) to byte offset conversion

/// A 1-based source position as reported by the block parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Line number, starting at 1
    pub line: usize,
    /// Column number in bytes, starting at 1
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Start offsets of every line in a piece of source text.
///
/// `\n`, `\r`, `\r\n` and `\n\r` each terminate a line, so documents with
/// mixed line endings index the same way as uniform ones. Two identical
/// terminators in a row (`\n\n`, `\r\r`) end two lines.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Build the index with a single forward scan
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut seen_cr = false;
        let mut seen_lf = false;

        for (i, byte) in text.bytes().enumerate() {
            match byte {
                b'\n' => {
                    if seen_lf {
                        line_starts.push(i);
                        seen_cr = false;
                    }
                    seen_lf = true;
                }
                b'\r' => {
                    if seen_cr {
                        line_starts.push(i);
                        seen_lf = false;
                    }
                    seen_cr = true;
                }
                _ => {
                    if seen_cr || seen_lf {
                        line_starts.push(i);
                        seen_cr = false;
                        seen_lf = false;
                    }
                }
            }
        }

        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of indexed lines. A trailing terminator does not open a new line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset at which a 1-based line starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|idx| self.line_starts.get(idx))
            .copied()
    }

    /// Convert a 1-based position to a 0-based byte offset.
    ///
    /// Lines past the end of the index resolve to the end of the text.
    pub fn offset(&self, pos: Position) -> usize {
        match self.line_start(pos.line) {
            Some(start) => start + pos.column.saturating_sub(1),
            None => self.len,
        }
    }

    /// Convert a byte offset back into a 1-based position
    pub fn position(&self, offset: usize) -> Position {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Position::new(idx + 1, offset - self.line_starts[idx] + 1)
    }

    /// Inclusive offset of the last byte of a 1-based line, terminator included.
    ///
    /// The final line ends one byte before the end of the text.
    pub fn line_end(&self, line: usize) -> usize {
        let next = if line < self.line_starts.len() {
            self.line_starts[line]
        } else {
            self.len
        };
        next.saturating_sub(1)
    }
}
