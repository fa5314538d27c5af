// Line addressing over the document text
// The engine never owns the document; it receives a complete text on every
// render and derives line boundaries from it. Offsets are byte offsets into
// the UTF-8 text, aligned to character boundaries by construction.

/// Precomputed line boundaries for one immutable text snapshot.
///
/// Lines are delimited by `\n`; the trailing fragment after the last newline
/// counts as a line, so every text has at least one line.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of each line.
    starts: Vec<usize>,
    /// Total text length in bytes.
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        for (pos, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(pos + 1);
            }
        }
        LineIndex {
            starts,
            len: text.len(),
        }
    }

    /// Number of lines, always at least 1.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Zero-based line containing the given byte offset.
    ///
    /// Offsets past the end address the last line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insertion) => insertion - 1,
        }
    }

    /// Byte offset of the first character of a line, if the line exists.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// Byte offset just past the last character of a line, excluding the
    /// newline delimiter.
    pub fn line_end(&self, line: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let end = match self.starts.get(line + 1) {
            Some(next_start) => next_start - 1,
            None => self.len,
        };
        Some(end.max(start))
    }
}

/// Content of a line, excluding the newline delimiter.
pub fn line_text<'a>(text: &'a str, index: &LineIndex, line: usize) -> Option<&'a str> {
    let start = index.line_start(line)?;
    let end = index.line_end(line)?;
    text.get(start..end)
}
