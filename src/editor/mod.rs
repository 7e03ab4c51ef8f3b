//! Editor module for mdlive
//!
//! A reference host for the annotator:
//! - Text buffer management (using ropey)
//! - Caret tracking
//! - Edit and caret notifications forwarded to the annotator
//!
//! Real editors embed the annotator the same way: they own the text and the
//! caret, and report every change through the annotator's hooks.

pub mod buffer;

pub use buffer::TextBuffer;

use crate::markdown::syntax::{InlineAnnotator, LineSource, LineStyles, StyleSink};
use std::ops::Range;

/// Text buffer, caret and annotator wired to a styling sink
pub struct LiveEditor<K: StyleSink = LineStyles> {
    /// The text buffer
    buffer: TextBuffer,
    /// Absolute char offset of the caret
    caret: usize,
    annotator: InlineAnnotator,
    sink: K,
}

impl LiveEditor<LineStyles> {
    /// Create an editor keeping annotations in memory
    pub fn new(content: &str) -> Self {
        Self::with_sink(content, InlineAnnotator::new(), LineStyles::new())
    }
}

impl<K: StyleSink> LiveEditor<K> {
    /// Create an editor and style the whole document once
    pub fn with_sink(content: &str, annotator: InlineAnnotator, sink: K) -> Self {
        let mut editor = Self {
            buffer: TextBuffer::from_str(content),
            caret: 0,
            annotator,
            sink,
        };
        editor.rehighlight();
        editor
    }

    /// Get the text buffer reference
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn annotator(&self) -> &InlineAnnotator {
        &self.annotator
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Absolute char offset of the caret
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Line containing the caret
    pub fn caret_line(&self) -> usize {
        self.buffer.line_of_offset(self.caret)
    }

    /// Move the caret, restyling the line it left and the line it entered
    pub fn set_caret(&mut self, offset: usize) {
        let previous_line = self.caret_line();
        self.caret = offset.min(self.buffer.len_chars());
        let current_line = self.caret_line();

        self.annotator.set_caret(self.caret);
        self.annotator
            .on_caret_moved(&self.buffer, previous_line, current_line, &mut self.sink);
    }

    /// Insert text at a char offset; a caret at or after it moves along
    pub fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.buffer.len_chars());
        let first_line = self.buffer.char_to_line(at);
        let inserted = self.buffer.insert(at, text);
        if inserted == 0 {
            return;
        }
        if self.caret >= at {
            self.caret += inserted;
        }
        log::debug!("Inserted {} chars at {} (line {})", inserted, at, first_line);
        self.text_changed(first_line);
    }

    /// Insert text at the caret
    pub fn type_text(&mut self, text: &str) {
        self.insert(self.caret, text);
    }

    /// Delete a char range; a caret inside it moves to its start
    pub fn delete(&mut self, range: Range<usize>) {
        let len = self.buffer.len_chars();
        let (start, end) = (range.start.min(len), range.end.min(len));
        if start >= end {
            return;
        }
        let first_line = self.buffer.char_to_line(start);
        self.buffer.delete(start..end);
        if self.caret >= end {
            self.caret -= end - start;
        } else if self.caret > start {
            self.caret = start;
        }
        log::debug!("Deleted chars {}..{} (line {})", start, end, first_line);
        self.text_changed(first_line);
    }

    /// Replace a char range with text
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let start = range.start;
        self.delete(range);
        self.insert(start, text);
    }

    /// Restyle the whole document
    pub fn rehighlight(&mut self) {
        self.annotator.set_caret(self.caret);
        self.annotator.rehighlight(&self.buffer, &mut self.sink);
    }

    fn text_changed(&mut self, first_line: usize) {
        self.annotator.set_caret(self.caret);
        self.annotator
            .on_text_changed(&self.buffer, first_line, &mut self.sink);
    }
}
