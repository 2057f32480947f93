//! Source Location Utilities
//!
//! A [`Location`] names a point inside a chunked input: which chunk, and
//! which byte column within it. The ordering over locations is what the
//! error tracker uses to decide which failure got farther.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A position inside a sequence of input chunks
#[derive(Debug, Clone)]
pub struct Location {
    /// Index of the chunk (0-based)
    pub chunk_index: usize,
    /// Byte offset inside the chunk (0-based)
    pub column: usize,
    /// Text of the chunk the position refers to
    pub chunk_text: Arc<str>,
}

impl Location {
    /// Create a new location
    #[inline]
    pub fn new(chunk_index: usize, column: usize, chunk_text: Arc<str>) -> Self {
        Self {
            chunk_index,
            column,
            chunk_text,
        }
    }

    /// Create a location at the start of an empty input
    pub fn start() -> Self {
        Self::new(0, 0, Arc::from(""))
    }

    /// Line number (1-based)
    #[inline]
    pub fn line(&self) -> usize {
        self.chunk_index + 1
    }

    /// Column number (1-based, counted in characters)
    pub fn char_column(&self) -> usize {
        let end = floor_char_boundary(&self.chunk_text, self.column);
        self.chunk_text[..end].chars().count() + 1
    }

    /// The chunk text with line terminators removed
    pub fn line_text(&self) -> &str {
        self.chunk_text.trim_end_matches(['\n', '\r'])
    }

    /// Render the chunk with a caret under this location
    ///
    /// Control characters are escaped so the caret lines up with what
    /// a terminal shows.
    pub fn format_with_caret(&self) -> String {
        let text = self.line_text();
        let split = floor_char_boundary(text, self.column);
        let before: String = text[..split].escape_debug().collect();
        let after: String = text[split..].escape_debug().collect();

        let mut out = String::with_capacity(before.len() + after.len() + split + 2);
        out.push_str(&before);
        out.push_str(&after);
        out.push('\n');
        for _ in 0..before.chars().count() {
            out.push(' ');
        }
        out.push('^');
        out
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.chunk_index == other.chunk_index && self.column == other.column
    }
}

impl Eq for Location {}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.chunk_index, self.column).cmp(&(other.chunk_index, other.column))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line(), self.char_column())
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::start()
    }
}
