//! Text buffer implementation using ropey
//!
//! Provides efficient text storage and manipulation for large files
//! with O(log n) insert/delete operations. Line endings are normalized to
//! `\n` on the way in, so every line separator is exactly one char.

use crate::markdown::syntax::LineSource;
use crate::utils::normalize_newlines;
use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

/// Text buffer wrapping ropey::Rope
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    /// The underlying rope data structure
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty text buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from a string
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_newlines(text)),
        }
    }

    /// Get total character count
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get total line count
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get a line without its line break
    pub fn line_without_newline(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        if line_idx + 1 < self.rope.len_lines() {
            // Every line but the last ends in exactly one break char
            len = len.saturating_sub(1);
        }
        Some(line.slice(..len).to_string())
    }

    /// Char offset of the first char of a line
    pub fn line_to_char(&self, line_idx: usize) -> usize {
        self.rope.line_to_char(line_idx.min(self.rope.len_lines()))
    }

    /// Line containing a char offset, clamped to the buffer
    pub fn char_to_line(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.rope.len_chars()))
    }

    /// Insert text at character position. Returns the number of chars
    /// inserted after line ending normalization.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> usize {
        let idx = char_idx.min(self.rope.len_chars());
        let text = normalize_newlines(text);
        if text.is_empty() {
            return 0;
        }
        self.rope.insert(idx, &text);
        text.chars().count()
    }

    /// Delete a range of characters
    pub fn delete(&mut self, range: Range<usize>) {
        let start = range.start.min(self.rope.len_chars());
        let end = range.end.min(self.rope.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Get the entire buffer contents as a string
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

impl LineSource for TextBuffer {
    fn line_count(&self) -> usize {
        self.len_lines()
    }

    fn line_text(&self, line: usize) -> Cow<'_, str> {
        Cow::Owned(self.line_without_newline(line).unwrap_or_default())
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_to_char(line)
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        self.char_to_line(offset)
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_chars(), 0);
        assert_eq!(buf.len_lines(), 1); // Rope always has at least 1 line
        assert_eq!(buf.line_text(0), "");
    }

    #[test]
    fn test_from_str_normalizes_line_endings() {
        let buf = TextBuffer::from_str("Hello\r\nWorld\rAgain");
        assert_eq!(buf.len_lines(), 3);
        assert_eq!(buf.to_string(), "Hello\nWorld\nAgain");
        assert_eq!(buf.line_without_newline(0), Some("Hello".to_string()));
        assert_eq!(buf.line_without_newline(2), Some("Again".to_string()));
        assert_eq!(buf.line_without_newline(3), None);
    }

    #[test]
    fn test_insert() {
        let mut buf = TextBuffer::from_str("Hello World");
        assert_eq!(buf.insert(5, ","), 1);
        assert_eq!(buf.to_string(), "Hello, World");
        assert_eq!(buf.insert(0, ""), 0);
        assert_eq!(buf.insert(99, "!\r\n"), 2);
        assert_eq!(buf.to_string(), "Hello, World!\n");
    }

    #[test]
    fn test_delete() {
        let mut buf = TextBuffer::from_str("Hello, World");
        buf.delete(5..7);
        assert_eq!(buf.to_string(), "Hello World");
        buf.delete(20..30);
        assert_eq!(buf.to_string(), "Hello World");
    }

    #[test]
    fn test_line_offsets() {
        let buf = TextBuffer::from_str("Line 1\nÅäö\nLine 3");

        assert_eq!(buf.line_start(0), 0);
        assert_eq!(buf.line_start(1), 7);
        assert_eq!(buf.line_start(2), 11);
        assert_eq!(buf.line_of_offset(10), 1);
        assert_eq!(buf.line_of_offset(99), 2);
    }

    #[test]
    fn test_trailing_newline_gives_empty_last_line() {
        let buf = TextBuffer::from_str("a\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_text(1), "");
        assert_eq!(buf.line_start(1), 2);
    }
}
